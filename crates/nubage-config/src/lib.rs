//! nubage-config
//!
//! User preferences for the ledger shell and their on-disk persistence.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{ConfigManager, CONFIG_FILE_NAME};
pub use model::Config;
