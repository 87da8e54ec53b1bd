//! Kiln CLI - Main entry point

mod cli;
mod render;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Kiln - task runner for smart contract development
#[derive(Parser, Debug)]
#[command(name = "kiln")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Task to run (omit to list available tasks)
    task: Option<String>,

    /// Task parameter as KEY=VALUE (a bare KEY sets a boolean flag)
    #[arg(short = 'p', long = "param", value_name = "KEY[=VALUE]")]
    params: Vec<String>,

    /// Configuration file (default: kiln.config.json in the working directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Network to use
    #[arg(short, long)]
    network: Option<String>,

    /// Enable verbose output and debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the execution plan without running it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let code = match cli::run(args).await {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            render::error(&e);
            1
        }
    };

    std::process::exit(code);
}
