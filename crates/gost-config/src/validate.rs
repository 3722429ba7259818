//! Configuration validation logic.

use crate::Config;
use crate::loader::ConfigError;

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.forward.listen.trim().is_empty() {
        return Err(ConfigError::Validation("forward.listen is empty".into()));
    }
    if config.forward.target.trim().is_empty() {
        return Err(ConfigError::Validation("forward.target is empty".into()));
    }
    if let Some(idx) = config
        .forward
        .source_addrs
        .iter()
        .position(|addr| addr.trim().is_empty())
    {
        return Err(ConfigError::Validation(format!(
            "forward.source_addrs[{idx}] is empty"
        )));
    }
    if config.forward.relay_buffer_size < 1024 {
        return Err(ConfigError::Validation(
            "forward.relay_buffer_size must be >= 1024".into(),
        ));
    }
    if config.forward.relay_buffer_size > 1024 * 1024 {
        return Err(ConfigError::Validation(
            "forward.relay_buffer_size must be <= 1MB".into(),
        ));
    }
    if config.tcp.dial_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "tcp.dial_timeout_secs must be > 0".into(),
        ));
    }
    if config.tcp.keepalive_secs == 0 {
        return Err(ConfigError::Validation(
            "tcp.keepalive_secs must be > 0".into(),
        ));
    }
    if config.tcp.backlog == 0 {
        return Err(ConfigError::Validation("tcp.backlog must be > 0".into()));
    }
    if let Some(format) = config.logging.format.as_deref()
        && !matches!(format, "json" | "pretty" | "compact")
    {
        return Err(ConfigError::Validation(
            "logging.format must be one of: json, pretty, compact".into(),
        ));
    }
    Ok(())
}
