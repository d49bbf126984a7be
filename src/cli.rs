//! Command-line surface: flags, stream wiring and logging setup

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::rewriter::{RewriteConfig, Rewriter, RunSummary};

/// Default log filter when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "info,api_group_rewriter=info";

#[derive(Debug, Parser)]
#[command(name = "api-group-rewriter")]
#[command(about = "Rewrite Kubernetes API groups in a stream of YAML manifests")]
pub struct Cli {
    /// The API group value to change from
    #[arg(long = "from", value_name = "GROUP")]
    pub from_api_group: String,

    /// The API group value to change to
    #[arg(long = "to", value_name = "GROUP")]
    pub to_api_group: String,

    /// Read manifests from a file instead of stdin
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,

    /// Write manifests to a file instead of stdout
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Log line format, written to stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Json,
    Text,
}

impl Cli {
    /// Validated groups for the rewriter
    pub fn rewrite_config(&self) -> crate::Result<RewriteConfig> {
        RewriteConfig::new(self.from_api_group.clone(), self.to_api_group.clone())
    }
}

/// Initialize tracing on stderr; stdout is reserved for manifests
pub fn init_tracing(format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init(),
    }
}

/// Open the configured streams and run the rewriter over them
pub fn run(cli: &Cli) -> anyhow::Result<RunSummary> {
    let rewriter = Rewriter::new(cli.rewrite_config()?);

    let reader: Box<dyn Read> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    Ok(rewriter.run(reader, writer)?)
}
