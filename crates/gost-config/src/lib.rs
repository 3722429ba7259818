//! Configuration loading, validation, and CLI overrides.
//!
//! A config file has three sections:
//!
//! ```toml
//! [forward]
//! listen = "0.0.0.0:8080"
//! target = "10.0.0.5:80"
//! source_addrs = ["192.0.2.10", "192.0.2.11"]
//!
//! [tcp]
//! dial_timeout_secs = 5
//! keepalive_secs = 180
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Only `forward.listen` and `forward.target` are required.

mod cli;
mod defaults;
mod loader;
mod types;
mod validate;

pub use cli::{CliOverrides, apply_overrides};
pub use loader::{ConfigError, load_config};
pub use types::*;
pub use validate::validate_config;
