//! GSM 7-bit alphabet classification (3GPP TS 23.038 section 6.2.1).
//!
//! Both lookup tables are built on first use and are immutable afterwards.

use std::sync::LazyLock;

use hashbrown::HashMap;

/// Default alphabet, indexed by septet value 0x00..=0x7F.
///
/// Position 0x1B is the escape to the extension table and holds a
/// placeholder that never appears in real text.
const DEFAULT_ALPHABET: &str = concat!(
    "@\u{a3}$\u{a5}\u{e8}\u{e9}\u{f9}\u{ec}\u{f2}\u{c7}\n\u{d8}\u{f8}\r\u{c5}\u{e5}",
    "\u{394}_\u{3a6}\u{393}\u{39b}\u{3a9}\u{3a0}\u{3a8}\u{3a3}",
    "\u{398}\u{39e}\u{ffff}\u{c6}\u{e6}\u{df}\u{c9}",
    " !\"#\u{a4}%&'()*+,-./",
    "0123456789:;<=>?",
    "\u{a1}ABCDEFGHIJKLMNO",
    "PQRSTUVWXYZ\u{c4}\u{d6}\u{d1}\u{dc}\u{a7}",
    "\u{bf}abcdefghijklmno",
    "pqrstuvwxyz\u{e4}\u{f6}\u{f1}\u{fc}\u{e0}",
);

/// Single-shift extension table entries as (septet, char).
const EXTENSION_TABLE: [(u8, char); 10] = [
    (0x0A, '\u{0c}'),
    (0x14, '^'),
    (0x28, '{'),
    (0x29, '}'),
    (0x2F, '\\'),
    (0x3C, '['),
    (0x3D, '~'),
    (0x3E, ']'),
    (0x40, '|'),
    (0x65, '\u{20ac}'),
];

/// Reverse lookup tables from char to septet.
#[derive(Debug)]
pub struct GsmTables {
    default: HashMap<char, u8>,
    extension: HashMap<char, u8>,
}

static TABLES: LazyLock<GsmTables> = LazyLock::new(GsmTables::build);

impl GsmTables {
    fn build() -> Self {
        let default = DEFAULT_ALPHABET
            .chars()
            .enumerate()
            .map(|(septet, c)| (c, septet as u8))
            .collect();
        let extension = EXTENSION_TABLE.iter().map(|&(septet, c)| (c, septet)).collect();
        Self { default, extension }
    }

    /// Process-wide tables.
    pub fn get() -> &'static GsmTables {
        &TABLES
    }

    /// Septet of `c` in the default alphabet.
    pub fn default_septet(&self, c: char) -> Option<u8> {
        self.default.get(&c).copied()
    }

    /// Septet of `c` in the extension table (to be preceded by an escape).
    pub fn extension_septet(&self, c: char) -> Option<u8> {
        self.extension.get(&c).copied()
    }

    /// True if `c` appears in either table.
    pub fn contains(&self, c: char) -> bool {
        self.default.contains_key(&c) || self.extension.contains_key(&c)
    }
}

/// Returns true when every char of `text` is GSM-encodable. Empty text is GSM.
pub fn is_gsm_alphabet_only(text: &str) -> bool {
    let tables = GsmTables::get();
    text.chars().all(|c| tables.contains(c))
}

/// Alphatag encoding picked for a whole string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagEncoding {
    /// One unit per char.
    Gsm7,
    /// One flag unit plus two units per char.
    Ucs2,
}

impl TagEncoding {
    /// Classifies `text`; one non-GSM char forces UCS-2 for all of it.
    pub fn of(text: &str) -> Self {
        if is_gsm_alphabet_only(text) {
            Self::Gsm7
        } else {
            Self::Ucs2
        }
    }

    /// Storage units `text` occupies under this encoding.
    pub fn units(self, text: &str) -> usize {
        let chars = text.chars().count();
        match self {
            Self::Gsm7 => chars,
            Self::Ucs2 => 1 + 2 * chars,
        }
    }

    /// Max chars that fit in `max_tag_len` units.
    pub fn char_budget(self, max_tag_len: usize) -> usize {
        match self {
            Self::Gsm7 => max_tag_len,
            Self::Ucs2 => max_tag_len.saturating_sub(1) / 2,
        }
    }
}

/// Storage units `text` needs in an alphatag.
pub fn tag_units(text: &str) -> usize {
    TagEncoding::of(text).units(text)
}
