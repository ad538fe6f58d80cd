//! Amount normalizer: withdrawal/deposit columns into one signed amount.
//!
//! Coercion is lenient on purpose: a blank or malformed cell counts as
//! zero and never stops a row from being processed.

use finmate_core::{Cell, parse_decimal};
use rust_decimal::Decimal;

/// Default substitution for one cell: blank or non-numeric → 0.
pub fn coerce_cell(cell: &Cell) -> Decimal {
    match cell {
        Cell::Blank => Decimal::ZERO,
        Cell::Number(n) => *n,
        Cell::Text(s) => parse_decimal(s).unwrap_or(Decimal::ZERO),
    }
}

/// `|deposit| - |withdrawal|`.
///
/// Absolute values come first so statements that already store
/// withdrawals as negatives are not double-negated. A row carrying both
/// columns nets to their difference.
pub fn normalize(withdrawal: &Cell, deposit: &Cell) -> Decimal {
    coerce_cell(deposit).abs() - coerce_cell(withdrawal).abs()
}
