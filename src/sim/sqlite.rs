//! SQLite-backed generic SIM phonebook.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};

use crate::types::SimEntryId;

use super::{CapacityModel, SimEntry, SimProperties, SimResult, SimStorage};

/// Card geometry written on first open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SimGeometry {
    /// Total entry slots; `None` models a card that has not reported yet.
    pub capacity: Option<usize>,
    /// Alphatag budget in storage units.
    pub max_name_len: Option<usize>,
    /// Max dial-string length.
    pub max_number_len: Option<usize>,
    /// Max email length.
    pub max_email_len: Option<usize>,
}

impl SimGeometry {
    /// Typical 2G SIM: 250 entries, 14-unit tags, 20-digit numbers.
    pub fn classic() -> Self {
        Self {
            capacity: Some(250),
            max_name_len: Some(14),
            max_number_len: Some(20),
            max_email_len: None,
        }
    }
}

/// Generic SIM storage stored in a SQLite database.
pub struct SqliteSimStorage {
    conn: Connection,
}

impl SqliteSimStorage {
    /// Opens or creates a SIM image at `path`.
    ///
    /// `geometry` is only recorded when the image is new.
    pub fn open(path: impl AsRef<Path>, geometry: SimGeometry) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn, geometry)
    }

    /// Opens an in-memory SIM image.
    pub fn open_in_memory(geometry: SimGeometry) -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn, geometry)
    }

    fn init_connection(conn: Connection, geometry: SimGeometry) -> SimResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.execute(
            "INSERT OR IGNORE INTO sim_meta
                (id, capacity, max_name_len, max_number_len, max_email_len)
             VALUES (1, ?1, ?2, ?3, ?4)",
            params![
                geometry.capacity.map(|v| v as i64),
                geometry.max_name_len.map(|v| v as i64),
                geometry.max_number_len.map(|v| v as i64),
                geometry.max_email_len.map(|v| v as i64),
            ],
        )?;
        Ok(Self { conn })
    }

    /// Overwrites the recorded geometry.
    pub fn set_geometry(&mut self, geometry: SimGeometry) -> SimResult<()> {
        self.conn.execute(
            "UPDATE sim_meta
             SET capacity = ?1, max_name_len = ?2, max_number_len = ?3, max_email_len = ?4
             WHERE id = 1",
            params![
                geometry.capacity.map(|v| v as i64),
                geometry.max_name_len.map(|v| v as i64),
                geometry.max_number_len.map(|v| v as i64),
                geometry.max_email_len.map(|v| v as i64),
            ],
        )?;
        Ok(())
    }

    /// Number of stored entries.
    pub fn count(&self) -> SimResult<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM adn", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    fn geometry(&self) -> SimResult<SimGeometry> {
        let row = self
            .conn
            .query_row(
                "SELECT capacity, max_name_len, max_number_len, max_email_len
                 FROM sim_meta WHERE id = 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, Option<i64>>(0)?,
                        row.get::<_, Option<i64>>(1)?,
                        row.get::<_, Option<i64>>(2)?,
                        row.get::<_, Option<i64>>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((capacity, name, number, email)) = row else {
            return Ok(SimGeometry::default());
        };
        let as_len = |v: Option<i64>| v.filter(|n| *n >= 0).map(|n| n as usize);
        Ok(SimGeometry {
            capacity: as_len(capacity),
            max_name_len: as_len(name),
            max_number_len: as_len(number),
            max_email_len: as_len(email),
        })
    }

    fn free_entries(&self) -> SimResult<Option<usize>> {
        let geometry = self.geometry()?;
        let used = self.count()?;
        Ok(geometry.capacity.map(|cap| cap.saturating_sub(used)))
    }
}

impl SimStorage for SqliteSimStorage {
    fn capacity_model(&self) -> CapacityModel {
        CapacityModel::Generic
    }

    fn properties(&mut self) -> SimResult<SimProperties> {
        let geometry = self.geometry()?;
        Ok(SimProperties {
            capacity: geometry.capacity,
            free_entries: self.free_entries()?,
            max_name_len: geometry.max_name_len,
            max_number_len: geometry.max_number_len,
            max_email_len: geometry.max_email_len,
        })
    }

    fn live_free_entries(&mut self) -> SimResult<Option<usize>> {
        self.free_entries()
    }

    fn entries(&mut self) -> SimResult<Vec<SimEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT tag, number FROM adn ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok(SimEntry {
                tag: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                number: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn insert(&mut self, tag: &str, number: &str) -> SimResult<Option<SimEntryId>> {
        if self.free_entries()? == Some(0) {
            return Ok(None);
        }
        self.conn.execute(
            "INSERT INTO adn(tag, number) VALUES (?1, ?2)",
            params![tag, number],
        )?;
        Ok(Some(self.conn.last_insert_rowid() as SimEntryId))
    }

    fn delete(&mut self, tag: &str, number: &str) -> SimResult<usize> {
        let count = self.conn.execute(
            "DELETE FROM adn WHERE id = (
                SELECT id FROM adn WHERE tag = ?1 AND number = ?2 ORDER BY id ASC LIMIT 1
             )",
            params![tag, number],
        )?;
        Ok(count)
    }
}
