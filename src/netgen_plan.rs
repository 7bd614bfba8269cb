use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{error, info};

use netgen::manifest::Manifest;
use netgen::plan::{build_plan, BuildProfile};
use netgen::stack::NetworkStack;

/// Emit the network-services build plan as JSON for the build framework.
#[derive(Parser, Debug)]
#[command(name = "netgen-plan", version)]
struct Args {
    /// Network stack to build against
    #[arg(long)]
    stack: NetworkStack,

    /// Third-party file-import manifest
    #[arg(long, default_value = "ntp-file-import.json")]
    manifest: PathBuf,

    /// Directory the imported third-party tree was unpacked to
    #[arg(long, default_value = "./sebhbsd")]
    import_root: PathBuf,

    /// Directory holding the generated network-config header
    #[arg(long, default_value = ".")]
    config_include_dir: PathBuf,

    /// Architecture/BSP library path under the install prefix
    #[arg(long, default_value = "lib")]
    arch_lib_path: String,

    /// Write the plan here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let manifest = match Manifest::load(&args.manifest) {
        Ok(manifest) => manifest,
        Err(e) => {
            error!(manifest = %args.manifest.display(), "{e}");
            process::exit(1);
        }
    };

    let import = manifest.resolve(&args.import_root);
    let profile = BuildProfile::new(args.stack, &args.arch_lib_path);
    let plan = build_plan(&import, &profile, &args.config_include_dir);

    let json = match serde_json::to_string_pretty(&plan) {
        Ok(json) => json,
        Err(e) => {
            error!("failed to serialize build plan: {e}");
            process::exit(1);
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, json) {
                error!(output = %path.display(), "failed to write build plan: {e}");
                process::exit(1);
            }
            info!(output = %path.display(), stack = %args.stack, "build plan written");
        }
        None => println!("{json}"),
    }
}
