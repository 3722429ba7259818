//! TCP port forwarder for gost-rs.
//!
//! Every connection accepted on `forward.listen` (with TCP keep-alive) is
//! dialed through to `forward.target` using the TCP transporter, honoring the
//! configured source addresses, and bytes are relayed until either side
//! closes or the connection goes idle.

pub mod cli;
pub mod error;
pub mod relay;
pub mod server;
mod tracker;

pub use cli::ForwardArgs;
pub use error::ForwardError;
pub use server::{run_with_shutdown, serve};
pub use tokio_util::sync::CancellationToken;
