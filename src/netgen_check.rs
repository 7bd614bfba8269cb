use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::error;

use netgen::config;

/// Validate a network-configuration file and report the recognized tags.
#[derive(Parser, Debug)]
#[command(name = "netgen-check", version)]
struct Args {
    /// Network configuration file to validate
    #[arg(long)]
    config: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    match config::load(&args.config) {
        Ok(cfg) => {
            println!("{}: ok, {} tag(s)", args.config.display(), cfg.len());
            for tag in cfg.tags() {
                // Values are echoed verbatim; they land in the header as-is.
                println!("  {}={}", tag, cfg.get(tag).unwrap_or_default());
            }
        }
        Err(e) => {
            error!(config = %args.config.display(), "{e}");
            process::exit(1);
        }
    }
}
