//! Unified gost-rs CLI.
//!
//! - `gost-rs forward` - forward a local port to a fixed target over TCP
//!
//! The forwarder can also be embedded through the `gost_forward` crate.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// gost-rs unified CLI.
#[derive(Parser)]
#[command(
    name = "gost-rs",
    version,
    about = "TCP transport layer and port forwarder",
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forward a local port to a fixed target.
    #[command(name = "forward", alias = "fwd")]
    Forward(Box<gost_forward::ForwardArgs>),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Forward(args) => gost_forward::cli::run(*args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
