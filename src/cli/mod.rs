//! Command-line interface for local invocation
//!
//! Runs operation envelopes against a live tenant from a terminal, the same way the
//! deployed handler would run them.

pub mod commands;
pub mod error;

pub use error::CliError;
