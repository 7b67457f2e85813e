use crate::error::{Error, Result};
use crate::invariants::checks::InvariantChecks;
use crate::observability::metrics;
use crate::settlement::allocator::SpendAllocator;
use crate::settlement::balance_book::{BalanceBook, PayerPoints};
use crate::settlement::record::Record;
use crate::types::{Payer, Points, Timestamp};

/// Authoritative owner of point records and the per-payer balance aggregate.
#[derive(Clone, Debug)]
pub struct Ledger {
    records: Vec<Record>,
    balances: BalanceBook,
    verify_invariants: bool,
}

impl Default for Ledger {
    fn default() -> Self {
        Ledger::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Ledger {
            records: Vec::new(),
            balances: BalanceBook::new(),
            verify_invariants: true,
        }
    }

    /// Bulk-load records, recomputing balances from them.
    ///
    /// Unlike `add_record`, this accepts records that leave a payer negative. It exists for
    /// imports and fixtures.
    pub fn with_records(records: Vec<Record>) -> Self {
        let balances = BalanceBook::from_records(&records);
        metrics::OUTSTANDING_RECORDS.set(records.len() as i64);

        tracing::info!(
            records = records.len(),
            payers = balances.len(),
            total = %balances.wide_total(),
            "Ledger loaded"
        );

        Ledger {
            records,
            balances,
            verify_invariants: true,
        }
    }

    pub fn verify_invariants(mut self, enabled: bool) -> Self {
        self.verify_invariants = enabled;
        self
    }

    pub fn add_record(&mut self, payer: Payer, points: Points, timestamp: Timestamp) -> Result<Points> {
        if payer.is_blank() {
            metrics::RECORDS_REJECTED.inc();
            return Err(Error::EmptyPayer);
        }

        let balance = self.balances.get(&payer);
        let Some(projected) = self.balances.projected(&payer, points) else {
            metrics::RECORDS_REJECTED.inc();
            tracing::warn!(
                payer = %payer,
                balance = %balance,
                points = %points,
                "Record rejected: payer balance would overflow"
            );
            return Err(Error::PointsOverflow {
                payer,
                balance,
                delta: points,
            });
        };
        if projected.is_negative() {
            metrics::RECORDS_REJECTED.inc();
            tracing::warn!(
                payer = %payer,
                balance = %balance,
                points = %points,
                "Record rejected: payer balance would go negative"
            );
            return Err(Error::InsufficientPayerBalance {
                payer,
                balance,
                delta: points,
            });
        }

        let new_balance = self.balances.apply(&payer, points);
        self.records.push(Record::new(payer.clone(), points, timestamp));

        metrics::RECORDS_ADDED.inc();
        metrics::OUTSTANDING_RECORDS.set(self.records.len() as i64);
        tracing::info!(
            payer = %payer,
            points = %points,
            timestamp = %timestamp,
            balance = %new_balance,
            "Record added"
        );

        Ok(new_balance)
    }

    pub fn spend_points(&mut self, amount: Points) -> Result<Vec<PayerPoints>> {
        let _span = crate::observability::tracing::trace_spend(amount).entered();
        let timer = metrics::SPEND_LATENCY.start_timer();

        let result = self.try_spend(amount);
        timer.observe_duration();

        match &result {
            Ok(debits) => {
                metrics::SPENDS_EXECUTED.inc();
                metrics::POINTS_SPENT.inc_by(amount.to_i64() as u64);
                tracing::info!(payers = debits.len(), "Points spent");
            }
            Err(e) if e.is_rejection() => {
                metrics::SPENDS_REJECTED.inc();
                tracing::warn!(error = %e, "Spend rejected");
            }
            Err(e) => {
                metrics::SPENDS_REJECTED.inc();
                tracing::error!(error = %e, "Spend failed");
            }
        }

        result
    }

    fn try_spend(&mut self, amount: Points) -> Result<Vec<PayerPoints>> {
        if !amount.is_positive() {
            return Err(Error::InvalidSpendAmount { amount });
        }

        if !self.has_sufficient_balance(amount) {
            // Short of a positive amount, so the total is below i64::MAX
            let available = self.balances.total().unwrap_or_default();
            return Err(Error::InsufficientTotalBalance {
                requested: amount,
                available,
            });
        }

        let allocation = SpendAllocator::allocate(amount, &self.records)?;
        if self.verify_invariants {
            InvariantChecks::check_spend_conservation(amount, allocation.total_debited())?;
        }

        // Stage the new state so nothing is committed unless every check passes
        let mut balances = self.balances.clone();
        for debit in &allocation.debits {
            balances.apply(&debit.payer, debit.points);
        }
        let (records, pruned) = Self::prune_exhausted(allocation.records);

        if self.verify_invariants {
            InvariantChecks::check_balance_consistency(&records, &balances)?;
            InvariantChecks::check_debits_within_balances(&allocation.debits, &balances)?;
        }

        self.records = records;
        self.balances = balances;

        metrics::RECORDS_PRUNED.inc_by(pruned as u64);
        metrics::OUTSTANDING_RECORDS.set(self.records.len() as i64);
        tracing::debug!(pruned, outstanding = self.records.len(), "Exhausted records pruned");

        Ok(allocation.debits)
    }

    /// Drop records spent down to exactly zero, keeping the order of the rest.
    fn prune_exhausted(mut records: Vec<Record>) -> (Vec<Record>, usize) {
        let before = records.len();
        records.retain(|r| !r.is_exhausted());
        let pruned = before - records.len();
        (records, pruned)
    }

    /// Current per-payer balances, sorted by payer.
    pub fn list_balances(&self) -> Vec<PayerPoints> {
        self.balances.to_vec()
    }

    pub fn balance_of(&self, payer: &Payer) -> Points {
        self.balances.get(payer)
    }

    /// Sum of all balances. Fails when the pool is larger than `Points` can hold.
    pub fn total_balance(&self) -> Result<Points> {
        self.balances.total().ok_or_else(|| Error::TotalBalanceOverflow {
            total: self.balances.wide_total(),
        })
    }

    pub fn has_sufficient_balance(&self, amount: Points) -> bool {
        self.balances.covers(amount)
    }

    /// Live records, in ledger order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Run every consistency check against the current state.
    pub fn verify(&self) -> Result<()> {
        InvariantChecks::check_balance_consistency(&self.records, &self.balances)?;
        InvariantChecks::check_no_negative_balances(&self.balances)
    }
}
