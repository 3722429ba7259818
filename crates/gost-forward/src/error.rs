//! Error types for the forwarder.

use gost_config::ConfigError;
use gost_transport::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("transport: {0}")]
    Transport(#[from] TransportError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl ForwardError {
    /// Stable classification label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => gost_core::ERROR_CONFIG,
            Self::Transport(e) => e.kind(),
            Self::Io(_) => gost_core::ERROR_IO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_the_wrapped_error() {
        let err = ForwardError::from(TransportError::ListenerClosed);
        assert_eq!(err.kind(), gost_core::ERROR_CLOSED);
        let err = ForwardError::from(ConfigError::UnsupportedFormat);
        assert_eq!(err.kind(), gost_core::ERROR_CONFIG);
    }
}
