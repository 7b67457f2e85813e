use points_ledger::settlement::BalanceBook;
use points_ledger::{Error, Ledger, Payer, Points, Record, SpendAllocator, Timestamp};
use proptest::prelude::*;
use std::collections::HashSet;

const PAYERS: [&str; 4] = ["DANNON", "UNILEVER", "MILLER COORS", "YOPLAIT"];

#[derive(Clone, Debug)]
enum Op {
    Add { payer: usize, points: i64, t: i64 },
    Spend(i64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0usize..PAYERS.len(), -300i64..1_000, 0i64..100)
            .prop_map(|(payer, points, t)| Op::Add { payer, points, t }),
        1 => (-50i64..1_500).prop_map(Op::Spend),
    ]
}

fn seed_strategy() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec((0usize..PAYERS.len(), -500i64..2_000, 0i64..50), 0..20).prop_map(|rows| {
        rows.into_iter()
            .map(|(payer, points, t)| Record::new(PAYERS[payer], points, Timestamp::from_millis(t)))
            .collect()
    })
}

fn assert_unchanged(before: &Ledger, after: &Ledger) -> Result<(), TestCaseError> {
    prop_assert_eq!(before.records(), after.records());
    prop_assert_eq!(before.list_balances(), after.list_balances());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn ledger_invariants_hold_across_operations(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut ledger = Ledger::new();

        for op in ops {
            let before = ledger.clone();

            match op {
                Op::Add { payer, points, t } => {
                    let payer = Payer::from(PAYERS[payer]);
                    let points = Points::from_i64(points);
                    match ledger.add_record(payer.clone(), points, Timestamp::from_millis(t)) {
                        Ok(balance) => {
                            prop_assert_eq!(balance, before.balance_of(&payer) + points);
                            prop_assert_eq!(ledger.records().len(), before.records().len() + 1);
                            for other in PAYERS.iter().map(|p| Payer::from(*p)).filter(|p| p != &payer) {
                                prop_assert_eq!(ledger.balance_of(&other), before.balance_of(&other));
                            }
                        }
                        Err(Error::InsufficientPayerBalance { .. }) => {
                            prop_assert!((before.balance_of(&payer) + points).is_negative());
                            assert_unchanged(&before, &ledger)?;
                        }
                        Err(e) => prop_assert!(false, "unexpected add error: {}", e),
                    }
                }
                Op::Spend(amount) => {
                    let requested = Points::from_i64(amount);
                    match ledger.spend_points(requested) {
                        Ok(debits) => {
                            // Conservation
                            prop_assert_eq!(before.total_balance().unwrap() - ledger.total_balance().unwrap(), requested);
                            let debited: Points = debits.iter().map(|d| d.points).sum();
                            prop_assert_eq!(debited, -requested);

                            let mut seen = HashSet::new();
                            for d in &debits {
                                prop_assert!(d.points.is_negative());
                                prop_assert!(seen.insert(d.payer.clone()));
                                prop_assert_eq!(ledger.balance_of(&d.payer), before.balance_of(&d.payer) + d.points);
                            }

                            // Pruning leaves no exhausted records behind
                            prop_assert!(ledger.records().iter().all(|r| !r.is_exhausted()));
                        }
                        Err(Error::InvalidSpendAmount { .. }) => {
                            prop_assert!(amount <= 0);
                            assert_unchanged(&before, &ledger)?;
                        }
                        Err(Error::InsufficientTotalBalance { .. }) => {
                            prop_assert!(!before.has_sufficient_balance(requested));
                            assert_unchanged(&before, &ledger)?;
                        }
                        Err(e) => prop_assert!(false, "unexpected spend error: {}", e),
                    }
                }
            }

            // Balance consistency and non-negativity after every call
            prop_assert!(ledger.verify().is_ok());
            prop_assert_eq!(ledger.list_balances(), ledger.list_balances());
        }
    }

    #[test]
    fn incremental_balances_match_recomputation(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut ledger = Ledger::new();

        for op in ops {
            match op {
                Op::Add { payer, points, t } => {
                    let _ = ledger.add_record(PAYERS[payer].into(), Points::from_i64(points), Timestamp::from_millis(t));
                }
                Op::Spend(amount) => {
                    let _ = ledger.spend_points(Points::from_i64(amount));
                }
            }
        }

        let recomputed = BalanceBook::from_records(ledger.records());
        for payer in PAYERS.iter().map(|p| Payer::from(*p)) {
            prop_assert_eq!(recomputed.get(&payer), ledger.balance_of(&payer));
        }

        // Reloading the live records reproduces the same listing, minus payers that netted to zero
        let reloaded = Ledger::with_records(ledger.records().to_vec());
        let nonzero: Vec<_> = ledger.list_balances().into_iter().filter(|p| !p.points.is_zero()).collect();
        let reloaded_nonzero: Vec<_> = reloaded.list_balances().into_iter().filter(|p| !p.points.is_zero()).collect();
        prop_assert_eq!(nonzero, reloaded_nonzero);
    }

    #[test]
    fn seeded_spends_never_overdraw_a_payer(seed in seed_strategy(), amount in 1i64..5_000) {
        let mut ledger = Ledger::with_records(seed);
        let requested = Points::from_i64(amount);
        prop_assume!(ledger.has_sufficient_balance(requested));
        let before = ledger.clone();

        let debits = ledger.spend_points(requested).unwrap();

        let debited: Points = debits.iter().map(|d| d.points).sum();
        prop_assert_eq!(debited, -requested);
        for d in &debits {
            prop_assert!(d.points.abs() <= before.balance_of(&d.payer).non_negative());
            prop_assert!(!ledger.balance_of(&d.payer).is_negative());
        }
    }

    #[test]
    fn allocation_is_deterministic(seed in seed_strategy(), amount in 1i64..3_000) {
        let first = SpendAllocator::allocate(Points::from_i64(amount), &seed);
        let second = SpendAllocator::allocate(Points::from_i64(amount), &seed);

        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(_), Err(_)) => {}
            (a, b) => prop_assert!(false, "diverging outcomes: {:?} vs {:?}", a.is_ok(), b.is_ok()),
        }
    }
}
