//! Batch normalization: raw rows in, canonical transactions and
//! diagnostics out.
//!
//! Every row is handled on its own (date resolution, amount
//! normalization, classification), so the sequential and parallel paths
//! produce identical, input-ordered output.

use anyhow::Result;
use finmate_core::{CanonicalTransaction, RawRow, Totals};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::amount::normalize;
use crate::classify::classify_row;
use crate::dates::DateResolver;
use crate::types::{Exclusion, Outcome, ParsedDate};

/// Output of a batch run, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedStatement {
    pub transactions: Vec<CanonicalTransaction>,
    pub excluded: Vec<Exclusion>,
}

impl NormalizedStatement {
    fn from_outcomes(rows: &[RawRow], outcomes: impl IntoIterator<Item = (usize, Outcome)>) -> Self {
        let mut out = NormalizedStatement::default();
        for (row_index, outcome) in outcomes {
            match outcome {
                Outcome::Included(tx) => out.transactions.push(tx),
                Outcome::Excluded(reason) => {
                    let row = &rows[row_index];
                    debug!(row = row_index, reason = reason.label(), date = %row.date, "row excluded");
                    out.excluded.push(Exclusion {
                        row_index,
                        raw_date: row.date.clone(),
                        description: row.description.clone(),
                        reason,
                    });
                }
            }
        }
        debug!(
            included = out.transactions.len(),
            excluded = out.excluded.len(),
            "normalized statement"
        );
        out
    }

    pub fn totals(&self) -> Totals {
        Totals::from_transactions(&self.transactions)
    }
}

/// Reduce partial sums computed in parallel.
pub fn parallel_totals(txns: &[CanonicalTransaction]) -> Totals {
    txns.par_iter()
        .fold(Totals::default, |acc, tx| acc.record(tx))
        .reduce(Totals::default, Totals::merge)
}

/// Per-row explanation of every step of the decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowTrace {
    pub row_index: usize,
    pub raw_date: String,
    pub description: String,
    /// Pattern of the winning date format, if any
    pub date_format: Option<&'static str>,
    pub parsed_date: ParsedDate,
    pub signed_amount: Decimal,
    pub outcome: Outcome,
}

impl RowTrace {
    pub fn should_include(&self) -> bool {
        matches!(self.outcome, Outcome::Included(_))
    }

    /// `income`, `expense` or `zero`, from the amount alone.
    pub fn type_label(&self) -> &'static str {
        if self.signed_amount > Decimal::ZERO {
            "income"
        } else if self.signed_amount < Decimal::ZERO {
            "expense"
        } else {
            "zero"
        }
    }
}

/// Stateless row processor. Holds only the compiled date table.
#[derive(Debug, Clone)]
pub struct StatementNormalizer {
    resolver: DateResolver,
}

impl StatementNormalizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            resolver: DateResolver::new()?,
        })
    }

    pub fn resolver(&self) -> &DateResolver {
        &self.resolver
    }

    pub fn process_row(&self, row: &RawRow) -> Outcome {
        let parsed_date = self.resolver.resolve(&row.date);
        let signed_amount = normalize(&row.withdrawal, &row.deposit);
        classify_row(&row.description, parsed_date, signed_amount)
    }

    pub fn normalize_rows(&self, rows: &[RawRow]) -> NormalizedStatement {
        let outcomes = rows
            .iter()
            .enumerate()
            .map(|(i, row)| (i, self.process_row(row)));
        NormalizedStatement::from_outcomes(rows, outcomes)
    }

    /// Same result as `normalize_rows`, with rows processed on the rayon pool.
    pub fn normalize_rows_parallel(&self, rows: &[RawRow]) -> NormalizedStatement {
        let outcomes: Vec<(usize, Outcome)> = rows
            .par_iter()
            .enumerate()
            .map(|(i, row)| (i, self.process_row(row)))
            .collect();
        NormalizedStatement::from_outcomes(rows, outcomes)
    }

    pub fn trace_row(&self, row_index: usize, row: &RawRow) -> RowTrace {
        let resolved = self.resolver.resolve_with_format(&row.date);
        let parsed_date: ParsedDate = resolved.as_ref().map(|(d, _)| *d).into();
        let signed_amount = normalize(&row.withdrawal, &row.deposit);
        RowTrace {
            row_index,
            raw_date: row.date.clone(),
            description: row.description.clone(),
            date_format: resolved.map(|(_, f)| f.pattern()),
            parsed_date,
            signed_amount,
            outcome: classify_row(&row.description, parsed_date, signed_amount),
        }
    }

    pub fn trace_rows(&self, rows: &[RawRow]) -> Vec<RowTrace> {
        rows.iter()
            .enumerate()
            .map(|(i, row)| self.trace_row(i, row))
            .collect()
    }
}
