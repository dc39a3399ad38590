//! Core subtitle processing: the CPU-only part of the pipeline.
//!
//! Everything in this module is synchronous and pure — raw bytes and
//! strings in, values out, no I/O and no shared mutable state. The
//! orchestrator in [`crate::services`] drives these stages in order:
//! decode ([`encoding`]), verify ([`language`]), parse ([`formats`]),
//! merge ([`merge`]), serialize ([`formats::srt`]).

pub mod encoding;
pub mod formats;
pub mod language;
pub mod merge;
