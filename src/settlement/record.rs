use crate::types::{Payer, Points, Timestamp};
use serde::{Deserialize, Serialize};

/// A dated point delta attributed to one payer.
///
/// Payer and timestamp are fixed at creation. Points only move toward zero, and only
/// through a spend allocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    payer: Payer,
    points: Points,
    timestamp: Timestamp,
}

impl Record {
    pub fn new(payer: impl Into<Payer>, points: impl Into<Points>, timestamp: Timestamp) -> Self {
        Record {
            payer: payer.into(),
            points: points.into(),
            timestamp,
        }
    }

    pub fn payer(&self) -> &Payer {
        &self.payer
    }

    pub fn points(&self) -> Points {
        self.points
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Spent down to nothing and eligible for pruning. Negative adjustments never qualify.
    pub fn is_exhausted(&self) -> bool {
        self.points.is_zero()
    }

    pub(crate) fn debit(&mut self, amount: Points) {
        debug_assert!(!amount.is_negative() && amount <= self.points);
        self.points -= amount;
    }
}
