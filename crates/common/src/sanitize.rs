//! Transport-boundary input cleaning.
//!
//! Request bodies pass through here before reaching a service. Services still
//! bind every value as a query parameter; this only keeps markup and quoting
//! characters out of stored text.

const STRIPPED: &[char] = &['<', '>', '"', '\'', ';', '\\', '`'];

/// Strip HTML/SQL-significant characters and ASCII control characters, then trim.
pub fn clean(input: &str) -> String {
    input
        .chars()
        .filter(|c| !STRIPPED.contains(c) && !c.is_ascii_control())
        .collect::<String>()
        .trim()
        .to_string()
}

/// `clean` for optional fields; blank results collapse to `None`.
pub fn clean_opt(input: Option<&str>) -> Option<String> {
    input.map(clean).filter(|s| !s.is_empty())
}
