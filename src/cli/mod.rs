//! Command-line interface for media-minder.
//!
//! This module provides CLI commands for running the reconciliation
//! daemon, one-shot sync passes, bulk rebuilds, and catalog status.

mod commands;

pub use commands::{Cli, Commands, run_command};
