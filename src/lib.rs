#![doc(test(attr(deny(warnings))))]

//! Hisab Core offers the budgeting primitives behind the HisabKitab
//! workflows: category/transaction aggregation, receipt text extraction,
//! report derivation, and JSON persistence.

pub mod config;
pub mod engine;
pub mod errors;
pub mod ledger;
pub mod receipt;
pub mod reports;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Hisab Core tracing initialized.");
    });
}
