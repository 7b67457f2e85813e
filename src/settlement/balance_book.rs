use crate::settlement::record::Record;
use crate::types::{Payer, Points};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-payer balance, returned by listings and spends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayerPoints {
    pub payer: Payer,
    pub points: Points,
}

/// Cached per-payer sums over the live record set.
///
/// Keyed by a `BTreeMap` so listings come out in payer order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BalanceBook {
    balances: BTreeMap<Payer, Points>,
}

impl BalanceBook {
    pub fn new() -> Self {
        BalanceBook {
            balances: BTreeMap::new(),
        }
    }

    /// Rebuild the aggregate from scratch.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut book = BalanceBook::new();
        for record in records {
            book.apply(record.payer(), record.points());
        }
        book
    }

    pub fn get(&self, payer: &Payer) -> Points {
        self.balances.get(payer).copied().unwrap_or_default()
    }

    /// Balance `payer` would have after `delta`, without applying it. `None` on overflow.
    pub fn projected(&self, payer: &Payer, delta: Points) -> Option<Points> {
        self.get(payer).checked_add(delta)
    }

    /// Apply `delta`, saturating at the i64 bounds. Callers that must not saturate check
    /// `projected` first.
    pub fn apply(&mut self, payer: &Payer, delta: Points) -> Points {
        let balance = self.balances.entry(payer.clone()).or_default();
        *balance = balance.saturating_add(delta);
        *balance
    }

    /// Sum of all balances, accumulated wide so no partial sum can overflow.
    pub fn wide_total(&self) -> i128 {
        self.balances.values().map(|p| i128::from(p.to_i64())).sum()
    }

    /// Sum of all balances, `None` if it does not fit in `Points`.
    pub fn total(&self) -> Option<Points> {
        i64::try_from(self.wide_total()).ok().map(Points::from_i64)
    }

    /// Whether the pool holds at least `amount`, even when the total itself is out of range.
    pub fn covers(&self, amount: Points) -> bool {
        self.wide_total() >= i128::from(amount.to_i64())
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Payer, Points)> {
        self.balances.iter().map(|(payer, points)| (payer, *points))
    }

    pub fn to_vec(&self) -> Vec<PayerPoints> {
        self.iter()
            .map(|(payer, points)| PayerPoints {
                payer: payer.clone(),
                points,
            })
            .collect()
    }
}
