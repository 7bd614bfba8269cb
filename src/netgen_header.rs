use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{error, info};

use netgen::{config, template};

/// Generate the network-config header from a NET_CFG_* configuration file
/// and a template with @TAG@ placeholders.
#[derive(Parser, Debug)]
#[command(name = "netgen-header", version)]
struct Args {
    /// Network configuration file (NET_CFG_<TAG>=<value> lines)
    #[arg(long)]
    config: PathBuf,

    /// Header template containing @TAG@ placeholders
    #[arg(long)]
    template: PathBuf,

    /// Path of the generated header
    #[arg(long)]
    output: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Any failure aborts before the header is written, so a broken config
    // never leaves a partial artifact for downstream compilation steps.
    let cfg = match config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(config = %args.config.display(), "{e}");
            process::exit(1);
        }
    };

    if let Err(e) = template::generate(&args.template, &args.output, &cfg) {
        error!(config = %args.config.display(), "{e}");
        process::exit(1);
    }

    info!(output = %args.output.display(), "network-config header generated");
}
