//! Upstream proxy chain contract.
//!
//! A chain owns hop selection and the protocol spoken to each hop. The
//! transporter only hands it the destination plus the dial preferences it must
//! apply at the hop that performs the real connect.

use crate::BoxFuture;
use crate::connection::BoxConnection;
use crate::error::TransportError;
use crate::options::ChainDialOptions;

/// Dials a destination through one or more proxy hops.
pub trait Chain: Send + Sync + 'static {
    /// Connect to `addr` (`host:port`) through the chain.
    fn dial<'a>(
        &'a self,
        addr: &'a str,
        options: ChainDialOptions,
    ) -> BoxFuture<'a, Result<BoxConnection, TransportError>>;
}
