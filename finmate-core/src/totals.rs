//! Income/expense aggregation over canonical transactions.
//!
//! `Totals` is a commutative monoid: `Totals::default()` is the identity and
//! `merge` is associative, so partial sums computed over any split of a
//! batch combine to the same result in any order.
//!
//! Sums saturate at `Decimal::MAX` instead of panicking on overflow. A
//! saturated total is still reported; associativity holds for every batch
//! whose sums stay in range.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::iter::Sum;

use crate::transaction::CanonicalTransaction;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of positive amounts
    pub income: Decimal,
    /// Magnitude of the sum of negative amounts (always >= 0)
    pub expense: Decimal,
    pub income_count: usize,
    pub expense_count: usize,
}

impl Totals {
    pub fn from_transactions<'a>(txns: impl IntoIterator<Item = &'a CanonicalTransaction>) -> Self {
        txns.into_iter().fold(Totals::default(), Totals::record)
    }

    /// Fold step: returns the totals with one more transaction counted.
    /// The split follows the sign of `signed_amount`; a zero amount is
    /// not counted.
    pub fn record(self, tx: &CanonicalTransaction) -> Self {
        let amount = tx.signed_amount;
        let one = if amount > Decimal::ZERO {
            Totals {
                income: amount,
                income_count: 1,
                ..Totals::default()
            }
        } else if amount < Decimal::ZERO {
            Totals {
                expense: -amount,
                expense_count: 1,
                ..Totals::default()
            }
        } else {
            return self;
        };
        self.merge(one)
    }

    /// Saturating: both sums are non-negative, so an overflow clamps to
    /// `Decimal::MAX`.
    pub fn merge(self, other: Totals) -> Self {
        Totals {
            income: self.income.saturating_add(other.income),
            expense: self.expense.saturating_add(other.expense),
            income_count: self.income_count.saturating_add(other.income_count),
            expense_count: self.expense_count.saturating_add(other.expense_count),
        }
    }

    /// Net savings: income minus expense
    pub fn net(&self) -> Decimal {
        self.income - self.expense
    }

    pub fn count(&self) -> usize {
        self.income_count + self.expense_count
    }
}

impl<'a> Sum<&'a CanonicalTransaction> for Totals {
    fn sum<I: Iterator<Item = &'a CanonicalTransaction>>(iter: I) -> Self {
        Totals::from_transactions(iter)
    }
}

impl Sum<Totals> for Totals {
    fn sum<I: Iterator<Item = Totals>>(iter: I) -> Self {
        iter.fold(Totals::default(), Totals::merge)
    }
}

impl<'a> FromIterator<&'a CanonicalTransaction> for Totals {
    fn from_iter<I: IntoIterator<Item = &'a CanonicalTransaction>>(iter: I) -> Self {
        Totals::from_transactions(iter)
    }
}
