#![doc(test(attr(deny(warnings))))]

//! Nubage records recurring income and expenses and projects them onto
//! hourly, daily, weekly, monthly and yearly figures.
//!
//! The ledger logic lives in the `nubage-*` crates; this crate wires them
//! into a command shell.

pub mod cli;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Nubage tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
