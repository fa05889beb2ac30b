//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    /// An adapter with no sections; every lookup falls back to defaults.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::MizanError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[data]
dir = /srv/market-data

[scanner]
tickers = AAPL,MSFT
min_bars = 50
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("data", "dir"),
            Some("/srv/market-data".to_string())
        );
        assert_eq!(
            adapter.get_string("scanner", "tickers"),
            Some("AAPL,MSFT".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[scanner]\nmin_bars = 50\n").unwrap();
        assert_eq!(adapter.get_string("scanner", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_usize_parses_value() {
        let adapter = FileConfigAdapter::from_string("[scanner]\nworkers = 4\n").unwrap();
        assert_eq!(adapter.get_usize("scanner", "workers").unwrap(), Some(4));
        assert_eq!(adapter.get_usize("scanner", "missing").unwrap(), None);
    }

    #[test]
    fn get_usize_rejects_negative() {
        let adapter = FileConfigAdapter::from_string("[scanner]\nworkers = -1\n").unwrap();
        assert!(matches!(
            adapter.get_usize("scanner", "workers"),
            Err(MizanError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn get_f64_parses_value() {
        let adapter =
            FileConfigAdapter::from_string("[compliance]\nmax_debt_ratio = 0.3\n").unwrap();
        assert_eq!(
            adapter.get_f64("compliance", "max_debt_ratio").unwrap(),
            Some(0.3)
        );
    }

    #[test]
    fn get_f64_rejects_non_numeric() {
        let adapter =
            FileConfigAdapter::from_string("[compliance]\nmax_debt_ratio = a third\n").unwrap();
        let err = adapter.get_f64("compliance", "max_debt_ratio").unwrap_err();
        assert!(err.to_string().contains("a third"));
    }

    #[test]
    fn empty_adapter_has_no_values() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("data", "dir"), None);
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[analysis]\nlookback_months = 18\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_usize("analysis", "lookback_months").unwrap(),
            Some(18)
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/mizan.ini");
        assert!(result.is_err());
    }
}
