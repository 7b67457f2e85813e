use crate::error::Result;
use crate::settlement::balance_book::PayerPoints;
use crate::settlement::ledger::Ledger;
use crate::types::{Payer, Points, Timestamp};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle that serializes ledger operations behind one lock.
///
/// Each operation holds the lock from start to finish. Mutations take the write side;
/// listings take the read side, so they never observe a spend half-applied.
#[derive(Clone)]
pub struct PointsEngine {
    ledger: Arc<RwLock<Ledger>>,
}

impl PointsEngine {
    pub fn new(ledger: Ledger) -> Self {
        PointsEngine {
            ledger: Arc::new(RwLock::new(ledger)),
        }
    }

    pub async fn add_record(&self, payer: Payer, points: Points, timestamp: Timestamp) -> Result<Points> {
        let mut ledger = self.ledger.write().await;
        ledger.add_record(payer, points, timestamp)
    }

    pub async fn spend_points(&self, amount: Points) -> Result<Vec<PayerPoints>> {
        let mut ledger = self.ledger.write().await;
        ledger.spend_points(amount)
    }

    pub async fn list_balances(&self) -> Vec<PayerPoints> {
        let ledger = self.ledger.read().await;
        ledger.list_balances()
    }

    pub async fn total_balance(&self) -> Result<Points> {
        self.ledger.read().await.total_balance()
    }

    /// Run the full consistency suite under the read lock.
    pub async fn verify(&self) -> Result<()> {
        self.ledger.read().await.verify()
    }
}
