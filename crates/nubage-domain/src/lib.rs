//! nubage-domain
//!
//! Pure domain models (Transaction, Period, Ledger).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod common;
pub mod ledger;
pub mod period;
pub mod transaction;

pub use common::*;
pub use ledger::*;
pub use period::*;
pub use transaction::*;
