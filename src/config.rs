use std::{fs, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::utils;

const DEFAULT_BIND: &str = "127.0.0.1:5000";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_path: Option<PathBuf>,
    pub log_json: bool,
    pub seed_demo_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND.to_string(),
            database_path: None,
            log_json: false,
            seed_demo_data: true,
        }
    }
}

impl AppConfig {
    /// Reads `config.json` from the data root, then applies `BOOKING_*`
    /// environment overrides. A missing or unreadable file falls back to
    /// defaults.
    pub fn load() -> Self {
        let path = utils::config_path();
        let mut config = match read_config(&path) {
            Ok(config) => config,
            Err(err) => {
                // runs before the tracing subscriber exists
                eprintln!("ignoring unreadable config {}: {err}", path.display());
                AppConfig::default()
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(utils::database_path)
    }

    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("BOOKING_BIND").filter(|v| !v.trim().is_empty()) {
            self.bind_addr = bind.trim().to_string();
        }
        if let Some(path) = lookup("BOOKING_DATABASE").filter(|v| !v.trim().is_empty()) {
            self.database_path = Some(PathBuf::from(path.trim()));
        }
        if let Some(flag) = lookup("BOOKING_LOG_JSON").and_then(|v| parse_flag(&v)) {
            self.log_json = flag;
        }
        if let Some(flag) = lookup("BOOKING_SEED_DEMO").and_then(|v| parse_flag(&v)) {
            self.seed_demo_data = flag;
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn read_config(path: &Path) -> Result<AppConfig, String> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = fs::read_to_string(path).map_err(|err| err.to_string())?;
    serde_json::from_str(&contents).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().expect("tempdir");
        let config = read_config(&dir.path().join("config.json")).expect("read config");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind_addr, "127.0.0.1:5000");
        assert!(config.seed_demo_data);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "bind_addr": "0.0.0.0:8080", "log_json": true }"#)
            .expect("write config");

        let config = read_config(&path).expect("read config");
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert!(config.log_json);
        assert!(config.database_path.is_none());
        assert!(config.seed_demo_data);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").expect("write config");
        assert!(read_config(&path).is_err());
    }

    #[test]
    fn environment_overrides_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("BOOKING_BIND", " 0.0.0.0:9000 "),
            ("BOOKING_DATABASE", "/tmp/bookings.sqlite"),
            ("BOOKING_LOG_JSON", "yes"),
            ("BOOKING_SEED_DEMO", "0"),
        ]);
        let mut config = AppConfig::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/bookings.sqlite")
        );
        assert!(config.log_json);
        assert!(!config.seed_demo_data);
    }

    #[test]
    fn unparseable_flags_are_ignored() {
        let mut config = AppConfig::default();
        config.apply_env(|key| (key == "BOOKING_LOG_JSON").then(|| "maybe".to_string()));
        assert!(!config.log_json);
    }
}
