//! DualSub library root.
//!
//! A dual-language subtitle middleware: fetch two monolingual subtitle
//! files from upstream catalogs, salvage their encoding, verify their
//! language, parse and ad-scrub the cues, merge them by time alignment,
//! and serialize one bilingual SRT.

/// Package version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub type Result<T> = error::DualSubResult<T>;

pub mod services;
