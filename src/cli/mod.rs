//! CLI command handlers

pub mod commands;

pub use commands::{serve, to_json, to_xlsx};
