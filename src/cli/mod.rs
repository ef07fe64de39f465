//! Command handlers for the non-interactive subcommands
//!
//! Each handler writes its report to the given writer so the binary can
//! pass stdout and tests can pass a buffer.

pub mod config;
pub mod doctor;
pub mod lookup;

pub use config::ConfigAction;
pub use doctor::run_doctor;
pub use lookup::{run_lookup, write_history_table};
