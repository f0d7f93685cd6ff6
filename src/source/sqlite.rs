//! SQLite-backed contacts database.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};

use crate::{
    contact::{ContactRecord, FieldRow},
    types::{ContactId, FieldKind, RawContactId},
};

use super::{ContactSource, SourceResult};

/// Contacts database with `contacts`, `raw_contacts`, and `data` tables.
pub struct SqliteContactSource {
    conn: Connection,
}

impl SqliteContactSource {
    /// Opens or creates the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> SourceResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory database.
    pub fn open_in_memory() -> SourceResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> SourceResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    /// Inserts a contact backed by one raw contact.
    pub fn add_contact(
        &mut self,
        display_name: Option<&str>,
        numbers: &[&str],
        emails: &[&str],
    ) -> SourceResult<ContactId> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO contacts(display_name) VALUES (?1)",
            params![display_name],
        )?;
        let contact_id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO raw_contacts(contact_id) VALUES (?1)",
            params![contact_id],
        )?;
        let raw_id = tx.last_insert_rowid();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO data(raw_contact_id, mimetype, data1) VALUES (?1, ?2, ?3)",
            )?;
            if let Some(name) = display_name {
                stmt.execute(params![raw_id, FieldKind::Name.mimetype(), name])?;
            }
            for number in numbers {
                stmt.execute(params![raw_id, FieldKind::Phone.mimetype(), number])?;
            }
            for email in emails {
                stmt.execute(params![raw_id, FieldKind::Email.mimetype(), email])?;
            }
        }
        tx.commit()?;
        Ok(contact_id)
    }

    /// Adds another raw contact to an existing contact.
    pub fn add_raw_contact(&mut self, contact_id: ContactId) -> SourceResult<RawContactId> {
        self.conn.execute(
            "INSERT INTO raw_contacts(contact_id) VALUES (?1)",
            params![contact_id],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Appends one data row.
    pub fn add_field(
        &mut self,
        raw_contact_id: RawContactId,
        kind: &FieldKind,
        data: Option<&str>,
    ) -> SourceResult<()> {
        self.conn.execute(
            "INSERT INTO data(raw_contact_id, mimetype, data1) VALUES (?1, ?2, ?3)",
            params![raw_contact_id, kind.mimetype(), data],
        )?;
        Ok(())
    }
}

impl ContactSource for SqliteContactSource {
    fn field_rows(&mut self) -> SourceResult<Option<Vec<FieldRow>>> {
        let mut stmt = self.conn.prepare(
            "SELECT raw_contact_id, mimetype, data1 FROM data
             WHERE mimetype = ?1 OR mimetype = ?2 OR mimetype = ?3
             ORDER BY raw_contact_id ASC, id ASC",
        )?;
        let rows = stmt.query_map(
            params![
                FieldKind::Phone.mimetype(),
                FieldKind::Email.mimetype(),
                FieldKind::Name.mimetype(),
            ],
            |row| {
                let mime: String = row.get(1)?;
                Ok(FieldRow {
                    raw_contact_id: row.get(0)?,
                    kind: FieldKind::from_mimetype(&mime),
                    data: row.get(2)?,
                })
            },
        )?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(Some(out))
    }

    fn load_contact(&mut self, id: ContactId) -> SourceResult<Option<ContactRecord>> {
        let display_name: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT display_name FROM contacts WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(display_name) = display_name else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT d.mimetype, d.data1 FROM data d
             JOIN raw_contacts r ON d.raw_contact_id = r.id
             WHERE r.contact_id = ?1
             ORDER BY r.id ASC, d.id ASC",
        )?;
        let rows = stmt.query_map(params![id], |row| {
            let mime: String = row.get(0)?;
            let data: Option<String> = row.get(1)?;
            Ok((FieldKind::from_mimetype(&mime), data))
        })?;

        let mut numbers = Vec::new();
        let mut emails = Vec::new();
        for row in rows {
            match row? {
                (FieldKind::Phone, Some(number)) => numbers.push(number),
                (FieldKind::Email, Some(email)) => emails.push(email),
                _ => {}
            }
        }

        Ok(Some(ContactRecord::new(display_name, numbers, emails)))
    }
}
