//! finmate-core: shared statement-row and transaction types for Finmate

pub mod row;
pub mod totals;
pub mod transaction;

pub use row::{Cell, RawRow, parse_decimal};
pub use totals::Totals;
pub use transaction::{CanonicalTransaction, Direction};
