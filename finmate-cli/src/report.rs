//! Text and JSON rendering of a normalized statement.

use finmate_core::{CanonicalTransaction, Totals};
use finmate_ingest::{Exclusion, NormalizedStatement, ParsedDate, RowTrace};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt::Write;

/// `+₹75000`, `-₹734`, `₹0`
pub fn signed_money(symbol: &str, amount: Decimal) -> String {
    let sign = if amount > Decimal::ZERO {
        "+"
    } else if amount < Decimal::ZERO {
        "-"
    } else {
        ""
    };
    format!("{sign}{symbol}{}", amount.abs())
}

pub fn money(symbol: &str, amount: Decimal) -> String {
    if amount < Decimal::ZERO {
        format!("-{symbol}{}", amount.abs())
    } else {
        format!("{symbol}{amount}")
    }
}

#[derive(Debug, Serialize)]
pub struct TotalsView {
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
    pub transaction_count: usize,
}

impl From<Totals> for TotalsView {
    fn from(t: Totals) -> Self {
        Self {
            income: t.income,
            expense: t.expense,
            net: t.net(),
            transaction_count: t.count(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub transactions: &'a [CanonicalTransaction],
    pub excluded: &'a [Exclusion],
    pub totals: TotalsView,
}

pub fn json_report(statement: &NormalizedStatement, totals: Totals) -> JsonReport<'_> {
    JsonReport {
        transactions: &statement.transactions,
        excluded: &statement.excluded,
        totals: totals.into(),
    }
}

pub fn render_text(statement: &NormalizedStatement, totals: Totals, symbol: &str) -> String {
    let mut s = String::new();

    let _ = writeln!(s, "Transactions ({})", statement.transactions.len());
    for tx in &statement.transactions {
        let _ = writeln!(
            s,
            "  {}  {:<32} {:>14}  {}",
            tx.date,
            tx.description,
            signed_money(symbol, tx.signed_amount),
            tx.direction.label()
        );
    }

    if !statement.excluded.is_empty() {
        let _ = writeln!(s, "\nExcluded rows ({})", statement.excluded.len());
        for ex in &statement.excluded {
            let _ = writeln!(
                s,
                "  row {:<4} {:<12} {:<32} {}",
                ex.row_index + 1,
                format!("'{}'", ex.raw_date),
                ex.description,
                ex.reason.label()
            );
        }
    }

    let _ = writeln!(s, "\nSummary");
    let _ = writeln!(s, "  Total transactions: {}", totals.count());
    let _ = writeln!(s, "  Total income:       {}", money(symbol, totals.income));
    let _ = writeln!(s, "  Total expenses:     {}", money(symbol, totals.expense));
    let _ = writeln!(s, "  Net savings:        {}", money(symbol, totals.net()));
    s
}

/// Row-by-row account of each decision.
pub fn render_traces(traces: &[RowTrace]) -> String {
    let mut s = String::new();
    for t in traces {
        let _ = writeln!(s, "Row {}: {}", t.row_index + 1, t.description);
        match (t.parsed_date, t.date_format) {
            (ParsedDate::Resolved(d), Some(f)) => {
                let _ = writeln!(s, "  Date: '{}' -> {} ({})", t.raw_date, d, f);
            }
            _ => {
                let _ = writeln!(s, "  Date: '{}' -> unparseable", t.raw_date);
            }
        }
        let _ = writeln!(s, "  Amount: {}", t.signed_amount);
        let _ = writeln!(s, "  Should include: {}", t.should_include());
        let _ = writeln!(s, "  Transaction type: {}", t.type_label());
        let _ = writeln!(s);
    }
    s
}
