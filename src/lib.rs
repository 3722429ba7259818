//! # gost-rs
//!
//! The TCP transport layer of a tunneling proxy, plus a port forwarder
//! built on top of it.
//!
//! ## Crates
//!
//! - [`gost_core`] - Shared defaults and error labels
//! - [`gost_config`] - Configuration loading, validation and CLI overrides
//! - [`gost_transport`] - Transporter/Chain contracts, resilient TCP dialing,
//!   keep-alive listener
//! - [`gost_forward`] - Port forwarder

pub use gost_config as config;
pub use gost_core as core;
pub use gost_forward as forward;
pub use gost_transport as transport;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use gost_config::{Config, load_config, validate_config};
    pub use gost_forward::{CancellationToken, ForwardError, run_with_shutdown};
    pub use gost_transport::{
        BoxConnection, Chain, DialOptions, KeepAliveListener, Listener, TcpTransporter,
        TransportError, Transporter,
    };
}
