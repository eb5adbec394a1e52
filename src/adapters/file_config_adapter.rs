//! INI file configuration adapter.

use crate::domain::error::TradescopeError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

/// Section/key lookups over an INI file. Keys set to an empty value read as
/// missing.
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TradescopeError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| TradescopeError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, TradescopeError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| TradescopeError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config
            .get(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.get_string(section, key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.get_string(section, key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.get_string(section, key)
            .and_then(|v| Self::parse_bool(&v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    const SAMPLE: &str = r#"
[input]
trades = data/trades.csv

[performance]
current_balance = 11000.0
total_pnl = 1000
winning_trades = 12

[analytics]
timezone = +02:00

[report]
output = out/report.json
pretty = yes
top_symbols = 5
"#;

    #[test]
    fn from_string_parses_config() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(
            adapter.get_string("input", "trades"),
            Some("data/trades.csv".to_string())
        );
        assert_eq!(
            adapter.get_string("analytics", "timezone"),
            Some("+02:00".to_string())
        );
    }

    #[test]
    fn has_and_get_path() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert!(adapter.has("performance", "winning_trades"));
        assert!(!adapter.has("performance", "losing_trades"));
        assert_eq!(
            adapter.get_path("report", "output"),
            Some(std::path::PathBuf::from("out/report.json"))
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_string("input", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_value_or_default() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_int("report", "top_symbols", 10), 5);
        assert_eq!(adapter.get_int("report", "missing", 42), 42);
        assert_eq!(adapter.get_int("input", "trades", 7), 7);
    }

    #[test]
    fn get_double_returns_value_or_default() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_double("performance", "current_balance", 0.0), 11000.0);
        assert_eq!(adapter.get_double("performance", "total_pnl", 0.0), 1000.0);
        assert_eq!(adapter.get_double("performance", "missing", 99.9), 99.9);
        assert_eq!(adapter.get_double("input", "trades", 1.5), 1.5);
    }

    #[test]
    fn get_bool_accepts_common_spellings() {
        let adapter =
            FileConfigAdapter::from_string("[report]\na = true\nb = yes\nc = 1\nd = no\ne = 0\n")
                .unwrap();
        assert!(adapter.get_bool("report", "a", false));
        assert!(adapter.get_bool("report", "b", false));
        assert!(adapter.get_bool("report", "c", false));
        assert!(!adapter.get_bool("report", "d", true));
        assert!(!adapter.get_bool("report", "e", true));
    }

    #[test]
    fn get_bool_returns_default_for_missing_or_garbage() {
        let adapter = FileConfigAdapter::from_string("[report]\npretty = maybe\n").unwrap();
        assert!(adapter.get_bool("report", "pretty", true));
        assert!(!adapter.get_bool("report", "missing", false));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config(SAMPLE);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("report", "output"),
            Some("out/report.json".to_string())
        );
        assert!(adapter.get_bool("report", "pretty", false));
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(matches!(
            result,
            Err(TradescopeError::ConfigParse { file, .. }) if file == "/nonexistent/path/config.ini"
        ));
    }

    #[test]
    fn empty_values_read_as_missing() {
        let adapter = FileConfigAdapter::from_string("[input]\ntrades =\n").unwrap();
        assert_eq!(adapter.get_string("input", "trades"), None);
        assert_eq!(adapter.get_double("input", "trades", 3.0), 3.0);
    }
}
