#![feature(int_roundings)]
//! Savings Core offers the record-keeping and planning primitives behind a
//! small shared savings tracker: contribution logging, aggregated totals,
//! a persisted savings target, and the derived monthly-contribution
//! suggestion.

pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod export;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Savings Core tracing initialized.");
    });
}
