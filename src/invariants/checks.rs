use crate::error::{Error, InvariantViolation, Result};
use crate::settlement::balance_book::{BalanceBook, PayerPoints};
use crate::settlement::record::Record;
use crate::types::Points;

pub struct InvariantChecks;

impl InvariantChecks {
    /// Check that the cached aggregate matches a recomputation from the records
    pub fn check_balance_consistency(records: &[Record], balances: &BalanceBook) -> Result<()> {
        let recomputed = BalanceBook::from_records(records);

        for (payer, cached) in balances.iter() {
            let actual = recomputed.get(payer);
            if cached != actual {
                return Err(Error::InvariantViolation(InvariantViolation {
                    invariant: "balance_consistency",
                    details: format!(
                        "Payer {} cached balance {} but records sum to {}",
                        payer, cached, actual
                    ),
                }));
            }
        }

        // A payer can be absent from the cache only if its records net to zero
        for (payer, actual) in recomputed.iter() {
            if !actual.is_zero() && balances.get(payer) != actual {
                return Err(Error::InvariantViolation(InvariantViolation {
                    invariant: "balance_consistency",
                    details: format!("Payer {} has records summing to {} but no cached balance", payer, actual),
                }));
            }
        }

        Ok(())
    }

    /// Check no payer balance is negative
    pub fn check_no_negative_balances(balances: &BalanceBook) -> Result<()> {
        for (payer, balance) in balances.iter() {
            if balance.is_negative() {
                return Err(Error::InvariantViolation(InvariantViolation {
                    invariant: "non_negative_balance",
                    details: format!("Payer {} has negative balance: {}", payer, balance),
                }));
            }
        }

        Ok(())
    }

    /// Check a spend debited exactly the requested amount
    pub fn check_spend_conservation(requested: Points, debited: Points) -> Result<()> {
        if debited != -requested {
            return Err(Error::InvariantViolation(InvariantViolation {
                invariant: "spend_conservation",
                details: format!("Spend of {} debited {}", requested, debited),
            }));
        }

        Ok(())
    }

    /// Check every debited payer ends the spend at or above zero
    pub fn check_debits_within_balances(debits: &[PayerPoints], balances: &BalanceBook) -> Result<()> {
        for debit in debits {
            if debit.points.is_positive() {
                return Err(Error::InvariantViolation(InvariantViolation {
                    invariant: "debit_sign",
                    details: format!("Payer {} was credited {} by a spend", debit.payer, debit.points),
                }));
            }

            let after = balances.get(&debit.payer);
            if after.is_negative() {
                return Err(Error::InvariantViolation(InvariantViolation {
                    invariant: "non_negative_balance",
                    details: format!(
                        "Spend drives payer {} to {} (debit {})",
                        debit.payer, after, debit.points
                    ),
                }));
            }
        }

        Ok(())
    }
}
