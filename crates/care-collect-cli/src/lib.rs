//! Command-line presentation layer for Care Collect.
//!
//! - [`cli`]: argument definitions
//! - [`settings`]: configuration file and environment overrides
//! - [`commands`]: command handlers over the record store

pub mod cli;
pub mod commands;
pub mod settings;
