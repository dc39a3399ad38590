//! Command handlers, one module per CLI subcommand.

pub mod detect_encoding_command;
pub mod fetch_command;
pub mod merge_command;
