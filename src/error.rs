use thiserror::Error;
use crate::types::{Payer, Points};

#[derive(Error, Debug)]
pub enum Error {
    // Spend Errors
    #[error("Point value to debit must be greater than zero: {amount}")]
    InvalidSpendAmount { amount: Points },

    #[error("Insufficient point balance: requested={requested}, available={available}")]
    InsufficientTotalBalance {
        requested: Points,
        available: Points,
    },

    #[error("Spend allocation failed: requested={requested}, unallocated={unallocated}")]
    SpendAllocationError {
        requested: Points,
        unallocated: Points,
    },

    // Record Errors
    #[error("Payer {payer} has insufficient points: balance={balance}, delta={delta}")]
    InsufficientPayerBalance {
        payer: Payer,
        balance: Points,
        delta: Points,
    },

    #[error("Payer {payer} balance would overflow: balance={balance}, delta={delta}")]
    PointsOverflow {
        payer: Payer,
        balance: Points,
        delta: Points,
    },

    #[error("Total point balance exceeds the representable range: {total}")]
    TotalBalanceOverflow { total: i128 },

    #[error("Payer name must not be empty")]
    EmptyPayer,

    // Invariant Errors
    #[error("Invariant violation: {0}")]
    InvariantViolation(InvariantViolation),

    // System Errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Telemetry error: {0}")]
    TelemetryError(String),
}

impl Error {
    /// Rejections a caller can fix by changing the request, as opposed to faults in the ledger itself.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::InvalidSpendAmount { .. }
                | Error::InsufficientTotalBalance { .. }
                | Error::InsufficientPayerBalance { .. }
                | Error::PointsOverflow { .. }
                | Error::EmptyPayer
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone)]
pub struct InvariantViolation {
    pub invariant: &'static str,
    pub details: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.invariant, self.details)
    }
}
