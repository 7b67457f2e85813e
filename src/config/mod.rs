use serde::{Deserialize, Serialize};

pub mod ledger;
pub mod loader;
pub mod server;

pub use ledger::LedgerConfig;
pub use loader::AppConfig;
pub use server::ServerConfig;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: "info".to_string(),
            json: false,
        }
    }
}
