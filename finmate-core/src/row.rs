//! Raw statement rows as handed over by an upstream table reader.
//!
//! Rows are column-addressable by five fields. Numeric columns may be
//! blank, numeric, or arbitrary text; nothing here decides what a cell
//! is worth, that is the amount normalizer's job.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::str::FromStr;

/// One numeric-or-blank cell of a statement row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cell {
    #[default]
    Blank,
    Number(Decimal),
    /// Anything that was not a number at the source (kept verbatim).
    Text(String),
}

impl Cell {
    pub fn is_blank(&self) -> bool {
        matches!(self, Cell::Blank)
    }
}

impl From<Decimal> for Cell {
    fn from(value: Decimal) -> Self {
        Cell::Number(value)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Cell::Number(Decimal::from(value))
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(Decimal::from(value))
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<Option<Decimal>> for Cell {
    fn from(value: Option<Decimal>) -> Self {
        value.map(Cell::Number).unwrap_or(Cell::Blank)
    }
}

impl From<Value> for Cell {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Cell::Blank,
            Value::Number(n) => {
                // With arbitrary precision enabled this is the number's source text.
                let text = n.to_string();
                match parse_decimal(&text) {
                    Some(d) => Cell::Number(d),
                    None => Cell::Text(text),
                }
            }
            Value::String(s) => Cell::Text(s),
            other => Cell::Text(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Cell::from)
    }
}

impl Serialize for Cell {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Cell::Blank => serializer.serialize_none(),
            Cell::Number(d) => match serde_json::Number::from_str(&d.to_string()) {
                Ok(n) => n.serialize(serializer),
                Err(_) => serializer.serialize_str(&d.to_string()),
            },
            Cell::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Parse a plain decimal (`-12.50`, `+3`) or scientific (`1.5e3`) literal.
///
/// Surrounding whitespace is ignored. Grouping separators (`,` or `_`) and currency
/// symbols are not accepted.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() || text.contains('_') {
        return None;
    }
    Decimal::from_str(text)
        .ok()
        .or_else(|| Decimal::from_scientific(text).ok())
}

/// One unprocessed statement line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    #[serde(default, alias = "Date")]
    pub date: String,
    #[serde(default, alias = "Description")]
    pub description: String,
    #[serde(default, alias = "Withdrawal")]
    pub withdrawal: Cell,
    #[serde(default, alias = "Deposit")]
    pub deposit: Cell,
    /// Running balance; carried through but never used for decisions.
    #[serde(default, alias = "Balance")]
    pub balance: Cell,
}

impl RawRow {
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        withdrawal: impl Into<Cell>,
        deposit: impl Into<Cell>,
        balance: impl Into<Cell>,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            withdrawal: withdrawal.into(),
            deposit: deposit.into(),
            balance: balance.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_decimal_forms() {
        assert_eq!(parse_decimal("734"), Some(dec!(734)));
        assert_eq!(parse_decimal(" -12.50 "), Some(dec!(-12.50)));
        assert_eq!(parse_decimal("1.5e3"), Some(dec!(1500)));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("1,234.00"), None);
        assert_eq!(parse_decimal("₹734"), None);
        assert_eq!(parse_decimal("n/a"), None);
        assert_eq!(parse_decimal("7_3_4"), None);
        assert_eq!(parse_decimal("1_000"), None);
    }

    #[test]
    fn test_row_from_json_keeps_exact_decimals() {
        let json = r#"{"date":"01-Jan-25","description":"SALARY CRED","withdrawal":null,"deposit":75000.10,"balance":85000.10}"#;
        let row: RawRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.withdrawal, Cell::Blank);
        assert_eq!(row.deposit, Cell::Number(dec!(75000.10)));
        assert_eq!(row.balance, Cell::Number(dec!(85000.10)));
    }

    #[test]
    fn test_row_accepts_capitalized_columns_and_missing_fields() {
        let json = r#"{"Date":"02-Jan-25","Description":"MakeMyTrip","Withdrawal":"734"}"#;
        let row: RawRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.date, "02-Jan-25");
        assert_eq!(row.withdrawal, Cell::Text("734".to_string()));
        assert!(row.deposit.is_blank());
        assert!(row.balance.is_blank());
    }

    #[test]
    fn test_non_numeric_json_values_become_text() {
        let cell: Cell = serde_json::from_str("true").unwrap();
        assert_eq!(cell, Cell::Text("true".to_string()));
        let cell: Cell = serde_json::from_str("[1,2]").unwrap();
        assert_eq!(cell, Cell::Text("[1,2]".to_string()));
    }

    #[test]
    fn test_cell_serializes_as_json_number() {
        let row = RawRow::new("01-Jan-25", "x", dec!(12.30), Cell::Blank, "oops");
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains(r#""withdrawal":12.30"#), "{json}");
        assert!(json.contains(r#""deposit":null"#), "{json}");
        assert!(json.contains(r#""balance":"oops""#), "{json}");
    }
}
