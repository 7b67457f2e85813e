use crate::error::{Error, Result};
use crate::settlement::balance_book::{BalanceBook, PayerPoints};
use crate::settlement::record::Record;
use crate::types::{Payer, Points};

/// Outcome of a successful allocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Allocation {
    /// The full record set, time-sorted, with debited points applied.
    pub records: Vec<Record>,
    /// Per-payer debits as negative magnitudes, in order of first touch.
    pub debits: Vec<PayerPoints>,
}

impl Allocation {
    pub fn total_debited(&self) -> Points {
        self.debits.iter().map(|d| d.points).sum()
    }
}

/// Greedy oldest-first spend allocation.
pub struct SpendAllocator;

impl SpendAllocator {
    /// Sort records by timestamp, ties in input order.
    pub fn sort_by_timestamp(records: &[Record]) -> Vec<Record> {
        let mut sorted = records.to_vec();
        sorted.sort_by_key(|r| r.timestamp());
        sorted
    }

    /// Debit `amount` from a scratch copy of `records`, oldest first.
    ///
    /// Records with non-positive points contribute nothing. A payer is never debited
    /// past its spendable balance (the sum of its records, clamped at zero), so negative
    /// adjustments cannot be bypassed by draining an older earn record.
    pub fn allocate(amount: Points, records: &[Record]) -> Result<Allocation> {
        let mut sorted = Self::sort_by_timestamp(records);
        let mut headroom = BalanceBook::from_records(records);
        let mut debits: Vec<PayerPoints> = Vec::new();
        let mut remaining = amount;

        for record in sorted.iter_mut() {
            if !remaining.is_positive() {
                break;
            }
            if !record.points().is_positive() {
                continue;
            }

            let available = headroom.get(record.payer()).non_negative();
            let take = record.points().min(remaining).min(available);
            if take.is_zero() {
                continue;
            }

            record.debit(take);
            headroom.apply(record.payer(), -take);
            Self::accumulate(&mut debits, record.payer(), -take);
            remaining -= take;
        }

        if remaining.is_positive() {
            return Err(Error::SpendAllocationError {
                requested: amount,
                unallocated: remaining,
            });
        }

        Ok(Allocation {
            records: sorted,
            debits,
        })
    }

    fn accumulate(debits: &mut Vec<PayerPoints>, payer: &Payer, delta: Points) {
        match debits.iter_mut().find(|d| &d.payer == payer) {
            Some(entry) => entry.points += delta,
            None => debits.push(PayerPoints {
                payer: payer.clone(),
                points: delta,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Timestamp;

    fn record(payer: &str, points: i64, t: i64) -> Record {
        Record::new(payer, points, Timestamp::from_millis(t))
    }

    fn debit(payer: &str, points: i64) -> PayerPoints {
        PayerPoints {
            payer: Payer::from(payer),
            points: Points::from_i64(points),
        }
    }

    #[test]
    fn test_oldest_records_are_exhausted_first() {
        let records = vec![
            record("Z", 10_000, 3),
            record("X", 100, 1),
            record("Y", 200, 2),
        ];

        let allocation = SpendAllocator::allocate(Points::from_i64(5_000), &records).unwrap();

        assert_eq!(
            allocation.debits,
            vec![debit("X", -100), debit("Y", -200), debit("Z", -4_700)]
        );
        assert_eq!(allocation.total_debited(), Points::from_i64(-5_000));

        let remaining: Vec<i64> = allocation.records.iter().map(|r| r.points().to_i64()).collect();
        assert_eq!(remaining, vec![0, 0, 5_300]);
    }

    #[test]
    fn test_input_is_left_untouched() {
        let records = vec![record("X", 100, 1), record("Y", 200, 2)];
        let before = records.clone();

        SpendAllocator::allocate(Points::from_i64(150), &records).unwrap();

        assert_eq!(records, before);
    }

    #[test]
    fn test_equal_timestamps_keep_input_order() {
        let records = vec![record("B", 50, 7), record("A", 50, 7), record("C", 50, 1)];

        let allocation = SpendAllocator::allocate(Points::from_i64(75), &records).unwrap();

        assert_eq!(allocation.debits, vec![debit("C", -50), debit("B", -25)]);
        let order: Vec<&str> = allocation.records.iter().map(|r| r.payer().as_str()).collect();
        assert_eq!(order, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_repeated_payer_debits_are_merged() {
        let records = vec![
            record("DANNON", 100, 1),
            record("UNILEVER", 100, 2),
            record("DANNON", 100, 3),
        ];

        let allocation = SpendAllocator::allocate(Points::from_i64(250), &records).unwrap();

        assert_eq!(allocation.debits, vec![debit("DANNON", -200), debit("UNILEVER", -50)]);
    }

    #[test]
    fn test_negative_adjustment_caps_payer_debit() {
        // DANNON nets to 100 even though its oldest record holds 300.
        let records = vec![
            record("DANNON", 300, 1),
            record("UNILEVER", 200, 2),
            record("DANNON", -200, 3),
            record("MILLER COORS", 10_000, 4),
        ];

        let allocation = SpendAllocator::allocate(Points::from_i64(5_000), &records).unwrap();

        assert_eq!(
            allocation.debits,
            vec![debit("DANNON", -100), debit("UNILEVER", -200), debit("MILLER COORS", -4_700)]
        );
        let after = BalanceBook::from_records(&allocation.records);
        assert_eq!(after.get(&"DANNON".into()), Points::zero());
    }

    #[test]
    fn test_non_positive_records_are_skipped() {
        let records = vec![record("A", 0, 1), record("B", -10, 2), record("B", 60, 3)];

        let allocation = SpendAllocator::allocate(Points::from_i64(50), &records).unwrap();

        assert_eq!(allocation.debits, vec![debit("B", -50)]);
    }

    #[test]
    fn test_shortfall_is_an_allocation_error() {
        let records = vec![record("A", 40, 1), record("B", 30, 2)];

        let err = SpendAllocator::allocate(Points::from_i64(100), &records).unwrap_err();

        match err {
            Error::SpendAllocationError { requested, unallocated } => {
                assert_eq!(requested, Points::from_i64(100));
                assert_eq!(unallocated, Points::from_i64(30));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_sort_handles_empty_and_single() {
        assert!(SpendAllocator::sort_by_timestamp(&[]).is_empty());
        assert_eq!(SpendAllocator::sort_by_timestamp(&[record("A", 1, 5)]).len(), 1);
    }
}
