//! CLI override definitions and application logic.

use clap::Parser;

use crate::Config;

#[derive(Debug, Clone, Parser, Default)]
pub struct CliOverrides {
    /// Override forward listen address, e.g. 0.0.0.0:8080
    #[arg(long)]
    pub listen: Option<String>,
    /// Override forward target address, e.g. 10.0.0.5:80
    #[arg(long)]
    pub target: Option<String>,
    /// Override source address list (repeatable or comma-separated)
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    pub source_addr: Option<Vec<String>>,
    /// Override dial timeout per attempt (seconds)
    #[arg(long)]
    pub dial_timeout_secs: Option<u64>,
    /// Override TCP keep-alive period (seconds)
    #[arg(long)]
    pub keepalive_secs: Option<u64>,
    /// Override forwarded connection idle timeout (seconds, 0 = never)
    #[arg(long)]
    pub idle_timeout_secs: Option<u64>,
    /// Override SO_REUSEPORT on dialing sockets
    #[arg(long)]
    pub reuse_port: Option<bool>,
    /// Override log level (trace/debug/info/warn/error)
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Apply command-line overrides on top of a loaded config.
pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) {
    if let Some(v) = &overrides.listen {
        config.forward.listen = v.clone();
    }
    if let Some(v) = &overrides.target {
        config.forward.target = v.clone();
    }
    if let Some(v) = &overrides.source_addr {
        config.forward.source_addrs = v.clone();
    }
    if let Some(v) = overrides.dial_timeout_secs {
        config.tcp.dial_timeout_secs = v;
    }
    if let Some(v) = overrides.keepalive_secs {
        config.tcp.keepalive_secs = v;
    }
    if let Some(v) = overrides.idle_timeout_secs {
        config.forward.idle_timeout_secs = v;
    }
    if let Some(v) = overrides.reuse_port {
        config.tcp.reuse_port = v;
    }
    if let Some(v) = &overrides.log_level {
        config.logging.level = Some(v.clone());
    }
}
