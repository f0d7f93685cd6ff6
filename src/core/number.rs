//! Dial-string normalization for SIM writes.

/// Pause character kept in dial strings.
pub const PAUSE: char = ',';
/// Wait character; doubles as our multi-number separator and is stripped.
pub const WAIT: char = ';';
/// Wildcard character kept in dial strings.
pub const WILD: char = 'N';

/// True for chars that carry dialing meaning rather than formatting.
pub fn is_non_separator(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '*' | '#' | '+' | WILD | WAIT | PAUSE)
}

/// Strips formatting and `;` from `number` before it is written.
pub fn normalize_number(number: &str) -> String {
    number
        .chars()
        .filter(|&c| is_non_separator(c) && c != WAIT)
        .collect()
}
