//! Canonical signed transactions produced from statement rows

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Flow direction, derived solely from the sign of the amount
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    #[serde(rename = "income")]
    Income,
    #[serde(rename = "expense")]
    Expense,
}

impl Direction {
    /// `None` for zero: a zero flow has no direction.
    pub fn from_amount(amount: Decimal) -> Option<Self> {
        if amount > Decimal::ZERO {
            Some(Direction::Income)
        } else if amount < Decimal::ZERO {
            Some(Direction::Expense)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::Income => "income",
            Direction::Expense => "expense",
        }
    }
}

/// A real money movement: resolved date and nonzero signed amount
///
/// Deserialization goes through [`CanonicalTransaction::new`], so a zero
/// amount or a `direction` that disagrees with the sign is rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "TransactionRecord")]
pub struct CanonicalTransaction {
    pub date: NaiveDate,
    pub description: String,
    /// Positive = inflow, negative = outflow
    pub signed_amount: Decimal,
    pub direction: Direction,
}

/// Wire shape of a transaction, checked before it becomes canonical
#[derive(Deserialize)]
struct TransactionRecord {
    date: NaiveDate,
    description: String,
    signed_amount: Decimal,
    direction: Direction,
}

impl TryFrom<TransactionRecord> for CanonicalTransaction {
    type Error = String;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        let tx = CanonicalTransaction::new(record.date, record.description, record.signed_amount)
            .ok_or_else(|| "signed_amount must be nonzero".to_string())?;
        if tx.direction != record.direction {
            return Err(format!(
                "direction '{}' does not match signed_amount {}",
                record.direction.label(),
                tx.signed_amount
            ));
        }
        Ok(tx)
    }
}

impl CanonicalTransaction {
    /// Build a transaction, refusing zero amounts.
    pub fn new(date: NaiveDate, description: impl Into<String>, signed_amount: Decimal) -> Option<Self> {
        let direction = Direction::from_amount(signed_amount)?;
        Some(Self {
            date,
            description: description.into(),
            signed_amount,
            direction,
        })
    }

    pub fn is_income(&self) -> bool {
        self.direction == Direction::Income
    }

    pub fn is_expense(&self) -> bool {
        self.direction == Direction::Expense
    }

    /// Get the absolute amount
    pub fn abs_amount(&self) -> Decimal {
        self.signed_amount.abs()
    }
}
