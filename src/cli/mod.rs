//! CLI command handlers

pub mod commands;

pub use commands::{export, login, options, report, serve, watch, ExportFormat};
