//! # Arena Launcher
//!
//! Entry point for the launcher binary. Parses the command line, installs the
//! tracing subscriber and runs one experiment through [`launcher::launch`].
//! Any failure is returned from `main`, so the process exits non-zero and
//! prints the error chain.

use anyhow::{Context, Result};
use clap::Parser;
use launcher::cli::Cli;
use rl::PolicyGradient;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if cli.list_envs {
        for name in rl::env::registered() {
            println!("{name}");
        }
        return Ok(());
    }

    let options = cli.options();
    tracing::info!(?options, "launching experiment");
    let report = launcher::launch(&options, PolicyGradient::new)
        .with_context(|| format!("experiment on {} failed", options.env_name))?;

    tracing::info!("Final average reward: {:.2}", report.final_average);
    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the default `info` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
