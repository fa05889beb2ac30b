//! Configuration access port trait.

use crate::domain::error::MizanError;

/// Sectioned key/value settings. Numeric getters distinguish an absent key
/// (`Ok(None)`) from one that is present but unparseable (`Err`).
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    fn get_f64(&self, section: &str, key: &str) -> Result<Option<f64>, MizanError> {
        parse_value(self.get_string(section, key), section, key, "expected a number")
    }

    fn get_usize(&self, section: &str, key: &str) -> Result<Option<usize>, MizanError> {
        parse_value(
            self.get_string(section, key),
            section,
            key,
            "expected a non-negative integer",
        )
    }
}

fn parse_value<T: std::str::FromStr>(
    raw: Option<String>,
    section: &str,
    key: &str,
    expected: &str,
) -> Result<Option<T>, MizanError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(|_| MizanError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{}, got '{}'", expected, s),
        }),
    }
}
