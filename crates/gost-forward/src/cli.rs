//! CLI module for the forwarder.
//!
//! Usable as a standalone entry point or as the `forward` subcommand of the
//! unified gost-rs CLI.

use std::io;
use std::path::PathBuf;

use clap::Parser;
use gost_config::{
    CliOverrides, Config, ForwardConfig, LoggingConfig, apply_overrides, load_config,
    validate_config,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{CancellationToken, run_with_shutdown};

/// Forwarder CLI arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "gost-forward", version, about = "Forward TCP connections to a fixed target")]
pub struct ForwardArgs {
    /// Config file path (json/jsonc/yaml/toml). Without it, --listen and --target are required.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: CliOverrides,
}

/// Build the effective config from the optional file plus overrides.
pub fn resolve_config(args: &ForwardArgs) -> Result<Config, gost_config::ConfigError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::new(ForwardConfig::new("", "")),
    };
    apply_overrides(&mut config, &args.overrides);
    validate_config(&config)?;
    Ok(config)
}

/// Run the forwarder with the given arguments until SIGINT/SIGTERM.
pub async fn run(args: ForwardArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(&args)?;
    init_tracing(&config.logging);
    info!(
        version = gost_core::VERSION,
        "{} forwarder starting",
        gost_core::PROJECT_NAME
    );

    let shutdown = CancellationToken::new();
    let shutdown_signal = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal_handler().await;
        info!("shutdown signal received");
        shutdown_signal.cancel();
    });

    run_with_shutdown(config, shutdown).await?;
    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT).
async fn shutdown_signal_handler() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// Build the `EnvFilter` directive string from the base level and per-module filters.
fn filter_directives(config: &LoggingConfig) -> String {
    let mut directives = config.level.as_deref().unwrap_or("info").to_string();
    let mut filters: Vec<_> = config.filters.iter().collect();
    filters.sort();
    for (module, level) in filters {
        directives.push_str(&format!(",{module}={level}"));
    }
    directives
}

/// Initialize the tracing subscriber from logging config.
///
/// - `level`: base level (default: info)
/// - `format`: json, pretty, or compact (default: pretty)
/// - `output`: stdout or stderr (default: stderr)
/// - `filters`: per-module level overrides
fn init_tracing(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_new(filter_directives(config)).unwrap_or_else(|_| EnvFilter::new("info"));
    let writer = match config.output.as_deref() {
        Some("stdout") => fmt::writer::BoxMakeWriter::new(io::stdout),
        _ => fmt::writer::BoxMakeWriter::new(io::stderr),
    };
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format.as_deref().unwrap_or("pretty") {
        "json" => registry.with(fmt::layer().json().with_writer(writer)).try_init(),
        "compact" => registry
            .with(fmt::layer().compact().with_writer(writer))
            .try_init(),
        _ => registry.with(fmt::layer().with_writer(writer)).try_init(),
    };
    if let Err(e) = result {
        eprintln!("tracing already initialized: {e}");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    #[test]
    fn overrides_alone_build_a_config() {
        let args = ForwardArgs::parse_from([
            "gost-forward",
            "--listen",
            "127.0.0.1:1080",
            "--target",
            "127.0.0.1:80",
            "--source-addr",
            "127.0.0.1",
        ]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.forward.listen, "127.0.0.1:1080");
        assert_eq!(config.forward.source_addrs, ["127.0.0.1"]);
        assert_eq!(config.tcp.keepalive_secs, gost_core::DEFAULT_KEEPALIVE_SECS);
    }

    #[test]
    fn missing_target_is_rejected() {
        let args = ForwardArgs::parse_from(["gost-forward", "--listen", "127.0.0.1:1080"]);
        let err = resolve_config(&args).unwrap_err();
        assert!(err.to_string().contains("forward.target is empty"));
    }

    #[test]
    fn file_values_are_overridden() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[forward]\nlisten = \"127.0.0.1:1\"\ntarget = \"127.0.0.1:2\"\n[tcp]\ndial_timeout_secs = 9"
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let args = ForwardArgs::parse_from([
            "gost-forward",
            "--config",
            &path,
            "--dial-timeout-secs",
            "3",
        ]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.forward.target, "127.0.0.1:2");
        assert_eq!(config.tcp.dial_timeout_secs, 3);
    }

    #[test]
    fn filter_directives_are_sorted() {
        let config = LoggingConfig {
            level: Some("warn".into()),
            filters: HashMap::from([
                ("gost_transport".to_string(), "trace".to_string()),
                ("gost_forward".to_string(), "debug".to_string()),
            ]),
            ..LoggingConfig::default()
        };
        assert_eq!(
            filter_directives(&config),
            "warn,gost_forward=debug,gost_transport=trace"
        );
    }
}
