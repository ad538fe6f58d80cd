use chrono::NaiveDate;
use finmate_core::CanonicalTransaction;
use serde::{Deserialize, Serialize};

/// Result of date resolution. `Unparseable` is a normal outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParsedDate {
    Resolved(NaiveDate),
    Unparseable,
}

impl ParsedDate {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            ParsedDate::Resolved(d) => Some(*d),
            ParsedDate::Unparseable => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ParsedDate::Resolved(_))
    }
}

impl From<Option<NaiveDate>> for ParsedDate {
    fn from(value: Option<NaiveDate>) -> Self {
        value.map(ParsedDate::Resolved).unwrap_or(ParsedDate::Unparseable)
    }
}

/// Why a row did not become a transaction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ExclusionReason {
    #[serde(rename = "unparseable_date")]
    UnparseableDate,
    #[serde(rename = "zero_amount")]
    ZeroAmount,
    #[serde(rename = "unparseable_date_and_zero_amount")]
    UnparseableDateAndZeroAmount,
}

impl ExclusionReason {
    pub fn has_unparseable_date(&self) -> bool {
        matches!(
            self,
            ExclusionReason::UnparseableDate | ExclusionReason::UnparseableDateAndZeroAmount
        )
    }

    pub fn has_zero_amount(&self) -> bool {
        matches!(
            self,
            ExclusionReason::ZeroAmount | ExclusionReason::UnparseableDateAndZeroAmount
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExclusionReason::UnparseableDate => "unparseable_date",
            ExclusionReason::ZeroAmount => "zero_amount",
            ExclusionReason::UnparseableDateAndZeroAmount => "unparseable_date_and_zero_amount",
        }
    }
}

/// Per-row decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Included(CanonicalTransaction),
    Excluded(ExclusionReason),
}

/// A dropped row, kept for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exclusion {
    /// Zero-based position in the input batch
    pub row_index: usize,
    pub raw_date: String,
    pub description: String,
    pub reason: ExclusionReason,
}
