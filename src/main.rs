//! API group rewriter
//!
//! Reads YAML manifests from stdin (or `--input`), moves everything under the
//! `--from` API group to the `--to` group, and writes the result to stdout
//! (or `--output`).

use clap::Parser;
use tracing::info;

use api_group_rewriter::cli::{self, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli::init_tracing(cli.log_format);

    info!(
        from = %cli.from_api_group,
        to = %cli.to_api_group,
        "Starting API group rewrite"
    );

    cli::run(&cli)?;

    Ok(())
}
