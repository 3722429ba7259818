//! Core constants shared across gost crates.
//!
//! This crate provides:
//! - Default configuration values
//! - Error classification labels for logging
//! - Common project metadata

pub mod defaults;
pub mod errors;

pub use defaults::*;
pub use errors::*;

/// Project name.
pub const PROJECT_NAME: &str = "gost-rs";
/// Project version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
