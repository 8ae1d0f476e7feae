#![doc(test(attr(deny(warnings))))]

//! fintrack aggregates payables, receivables, and transactions into
//! dashboard KPIs and category-grouped reports, and drives the command line.

pub mod cli;
pub mod errors;
pub mod utils;

pub use fintrack_config as config;
pub use fintrack_core as engine;
pub use fintrack_domain as domain;
pub use fintrack_storage_json as storage;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("fintrack tracing initialized.");
    });
}
