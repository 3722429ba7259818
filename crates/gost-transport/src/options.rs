//! Dial-time and handshake-time options.
//!
//! Options are materialized once per call and are read-only afterwards.
//! Either build them field by field:
//!
//! ```
//! use std::time::Duration;
//! use gost_transport::DialOptions;
//!
//! let opts = DialOptions::new()
//!     .timeout(Duration::from_secs(3))
//!     .source_addrs(["192.0.2.10", "192.0.2.11"]);
//! assert_eq!(opts.source_addrs_list().len(), 2);
//! ```
//!
//! or materialize them from an ordered list of [`DialOption`] values, where a
//! later option for the same field replaces an earlier one.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::chain::Chain;

/// One recognized dial option.
#[derive(Clone)]
pub enum DialOption {
    /// Delegate the dial to an upstream proxy chain.
    Chain(Arc<dyn Chain>),
    /// Connect timeout per attempt. Zero means "use the transporter default".
    Timeout(Duration),
    /// Ordered local source addresses to try.
    SourceAddrs(Vec<String>),
}

impl fmt::Debug for DialOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chain(_) => f.write_str("Chain(..)"),
            Self::Timeout(t) => f.debug_tuple("Timeout").field(t).finish(),
            Self::SourceAddrs(a) => f.debug_tuple("SourceAddrs").field(a).finish(),
        }
    }
}

/// Options for a single [`Transporter::dial`](crate::Transporter::dial) call.
#[derive(Clone, Default)]
pub struct DialOptions {
    chain: Option<Arc<dyn Chain>>,
    timeout: Option<Duration>,
    source_addrs: Vec<String>,
}

impl DialOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `options` in order; the last option for a field wins.
    pub fn from_options(options: impl IntoIterator<Item = DialOption>) -> Self {
        options
            .into_iter()
            .fold(Self::default(), |opts, option| opts.with(option))
    }

    /// Apply a single option.
    pub fn with(self, option: DialOption) -> Self {
        match option {
            DialOption::Chain(chain) => self.chain(chain),
            DialOption::Timeout(timeout) => self.timeout(timeout),
            DialOption::SourceAddrs(addrs) => self.source_addrs(addrs),
        }
    }

    pub fn chain(mut self, chain: Arc<dyn Chain>) -> Self {
        self.chain = Some(chain);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replace the source address list.
    pub fn source_addrs<I, S>(mut self, addrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_addrs = addrs.into_iter().map(Into::into).collect();
        self
    }

    /// Append one source address after the ones already configured.
    pub fn source_addr(mut self, addr: impl Into<String>) -> Self {
        self.source_addrs.push(addr.into());
        self
    }

    pub fn chain_ref(&self) -> Option<&Arc<dyn Chain>> {
        self.chain.as_ref()
    }

    /// The explicitly requested timeout, if any (zero counts as unset).
    pub fn timeout_value(&self) -> Option<Duration> {
        self.timeout.filter(|t| !t.is_zero())
    }

    /// Effective per-attempt timeout: the explicit value if non-zero, else `default`.
    pub fn effective_timeout(&self, default: Duration) -> Duration {
        self.timeout_value().unwrap_or(default)
    }

    pub fn source_addrs_list(&self) -> &[String] {
        &self.source_addrs
    }
}

impl FromIterator<DialOption> for DialOptions {
    fn from_iter<T: IntoIterator<Item = DialOption>>(iter: T) -> Self {
        Self::from_options(iter)
    }
}

impl fmt::Debug for DialOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialOptions")
            .field("chain", &self.chain.is_some())
            .field("timeout", &self.timeout)
            .field("source_addrs", &self.source_addrs)
            .finish()
    }
}

/// Options forwarded to [`Chain::dial`] when a dial is delegated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainDialOptions {
    /// Source addresses in caller order, for the hop that performs the real connect.
    pub source_addrs: Vec<String>,
    /// The caller's explicit timeout, if one was set.
    pub timeout: Option<Duration>,
}

impl From<&DialOptions> for ChainDialOptions {
    fn from(opts: &DialOptions) -> Self {
        Self {
            source_addrs: opts.source_addrs.clone(),
            timeout: opts.timeout_value(),
        }
    }
}

/// Options for [`Transporter::handshake`](crate::Transporter::handshake).
///
/// Plain TCP ignores them; TLS-like transports read the server name and bound
/// the negotiation with the timeout.
#[derive(Debug, Clone, Default)]
pub struct HandshakeOptions {
    pub server_name: Option<String>,
    pub timeout: Option<Duration>,
}

impl HandshakeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = Some(name.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
