//! INI-style configuration lookup.
//!
//! Values are addressed by `[section] key`. Implementations trim values and
//! treat an empty value as absent, so `get_string` returning `Some` always
//! means the user set something.

use std::path::PathBuf;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;

    fn has(&self, section: &str, key: &str) -> bool {
        self.get_string(section, key).is_some()
    }

    fn get_path(&self, section: &str, key: &str) -> Option<PathBuf> {
        self.get_string(section, key).map(PathBuf::from)
    }
}
