use crate::config::*;
use crate::error::{Error, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub ledger: LedgerConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn load(env: &str) -> Result<Self> {
        Self::load_from("config", env)
    }

    /// Layer `{dir}/default`, `{dir}/{env}` and `POINTS__*` variables. Both files are optional.
    pub fn load_from(dir: &str, env: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name(&format!("{}/default", dir)).required(false))
            .add_source(File::with_name(&format!("{}/{}", dir, env)).required(false))
            .add_source(Environment::with_prefix("POINTS").separator("__"))
            .build()
            .map_err(|e| Error::ConfigError(e.to_string()))?;

        config.try_deserialize()
            .map_err(|e| Error::ConfigError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let config = AppConfig::load_from("does/not/exist", "test").unwrap();

        assert_eq!(config.server.bind_address, "0.0.0.0:8800");
        assert!(config.ledger.verify_invariants);
        assert!(config.ledger.seed_records.is_empty());
        assert_eq!(config.logging.filter, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_shipped_defaults_parse() {
        let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/config");
        let config = AppConfig::load_from(dir, "test").unwrap();

        assert_eq!(config.server.bind_address, "0.0.0.0:8800");
        assert!(config.ledger.verify_invariants);
    }
}
