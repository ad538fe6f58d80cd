//! finmate-ingest: turns already-tabular statement rows into canonical
//! signed transactions (date resolution, amount normalization, filtering).

pub mod amount;
pub mod classify;
pub mod dates;
pub mod pipeline;
pub mod types;

pub use amount::{coerce_cell, normalize};
pub use classify::{Verdict, classify, classify_row};
pub use dates::{DATE_FORMATS, DateFormat, DateResolver};
pub use pipeline::{NormalizedStatement, RowTrace, StatementNormalizer, parallel_totals};
pub use types::{Exclusion, ExclusionReason, Outcome, ParsedDate};
