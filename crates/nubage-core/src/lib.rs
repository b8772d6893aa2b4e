//! nubage-core
//!
//! Business logic for Nubage: period aggregation, category registry and the
//! ledger controller. Depends on nubage-domain. No CLI, no terminal I/O; disk
//! access goes through the [`storage::LedgerStorage`] trait.

pub mod aggregation_service;
pub mod category_service;
pub mod error;
pub mod ledger_service;
pub mod storage;
pub mod time;
pub mod transaction_service;


pub use aggregation_service::*;
pub use category_service::*;
pub use error::*;
pub use ledger_service::*;
pub use storage::{ledger_warnings, LedgerStorage, SaveOutcome};
pub use time::{Clock, SystemClock};
pub use transaction_service::*;
