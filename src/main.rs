//! Emojify API gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                 EMOJIFY API                  │
//!                         │                                              │
//!     Client Request      │  ┌──────────┐   ┌──────────┐   ┌──────────┐ │
//!     ────────────────────┼─▶│  http    │──▶│ handlers │──▶│ backend  │─┼──▶ emojify service
//!                         │  │ server   │   │          │   │ clients  │─┼──▶ cache service
//!                         │  └──────────┘   └──────────┘   └──────────┘ │
//!                         │       │ request id, trace, CORS,            │
//!                         │       │ timeout, body limit, fault injection│
//!                         │                                              │
//!                         │  config · observability · lifecycle          │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use emojify_api::config::env::ENV_HELP;
use emojify_api::config::load_config;
use emojify_api::lifecycle::{signals, startup, Shutdown};
use emojify_api::observability::logging;

#[derive(Parser)]
#[command(name = "emojify-api", version)]
#[command(about = "HTTP gateway in front of the emojify and cache services")]
#[command(after_help = ENV_HELP)]
struct Cli {
    /// Optional TOML config file; environment variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.print_config {
        return match toml::to_string_pretty(&config) {
            Ok(rendered) => {
                print!("{}", rendered);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: failed to render config: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "emojify-api starting");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    match startup::run(config, &shutdown).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}
