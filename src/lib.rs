pub mod types;
pub mod settlement;
pub mod invariants;
pub mod core;
pub mod error;
pub mod config;
pub mod observability;
pub mod api;

pub use crate::core::PointsEngine;
pub use error::{Error, Result};
pub use settlement::{Ledger, PayerPoints, Record, SpendAllocator};
pub use types::{Payer, Points, Timestamp};

// Environment variable naming the config overlay to load on top of config/default
pub const CONFIG_ENV_VAR: &str = "POINTS_ENV";
