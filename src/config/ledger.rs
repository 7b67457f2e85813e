use serde::{Deserialize, Serialize};
use crate::settlement::record::Record;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Re-check balance consistency on every spend before committing it.
    pub verify_invariants: bool,
    /// Bulk-loaded at startup. May include negative adjustments.
    pub seed_records: Vec<Record>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            verify_invariants: true,
            seed_records: Vec::new(),
        }
    }
}
