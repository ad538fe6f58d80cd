//! Row classifier: inclusion predicate and direction.
//!
//! A row is a transaction iff its date resolved and its signed amount is
//! nonzero. Description text never takes part in the decision, so an
//! opening-balance line with no flow drops out as `zero_amount`.

use chrono::NaiveDate;
use finmate_core::{CanonicalTransaction, Direction};
use rust_decimal::Decimal;

use crate::types::{ExclusionReason, Outcome, ParsedDate};

/// Decision without the row's text attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Included { date: NaiveDate, direction: Direction },
    Excluded(ExclusionReason),
}

pub fn classify(parsed_date: ParsedDate, signed_amount: Decimal) -> Verdict {
    let direction = Direction::from_amount(signed_amount);
    match (parsed_date, direction) {
        (ParsedDate::Resolved(date), Some(direction)) => Verdict::Included { date, direction },
        (ParsedDate::Resolved(_), None) => Verdict::Excluded(ExclusionReason::ZeroAmount),
        (ParsedDate::Unparseable, Some(_)) => Verdict::Excluded(ExclusionReason::UnparseableDate),
        (ParsedDate::Unparseable, None) => {
            Verdict::Excluded(ExclusionReason::UnparseableDateAndZeroAmount)
        }
    }
}

/// `classify`, building the transaction for included rows.
pub fn classify_row(description: &str, parsed_date: ParsedDate, signed_amount: Decimal) -> Outcome {
    match classify(parsed_date, signed_amount) {
        Verdict::Included { date, .. } => {
            match CanonicalTransaction::new(date, description, signed_amount) {
                Some(tx) => Outcome::Included(tx),
                None => Outcome::Excluded(ExclusionReason::ZeroAmount),
            }
        }
        Verdict::Excluded(reason) => Outcome::Excluded(reason),
    }
}
