use clap::Parser;
use std::path::PathBuf;

/// Prospect: live dashboard backend over producer-written CSV exports.
#[derive(Debug, Parser)]
#[command(name = "prospect", version, about)]
pub struct Cli {
    /// Path to a TOML config file.
    #[arg(long, env = "PROSPECT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory the producer writes CSV exports into.
    #[arg(long, env = "PROSPECT_EXPORTS_DIR")]
    pub exports_dir: Option<PathBuf>,

    /// Host to bind the dashboard server on.
    #[arg(long, env = "PROSPECT_HOST")]
    pub host: Option<String>,

    /// Port to bind the dashboard server on.
    #[arg(long, env = "PROSPECT_PORT")]
    pub port: Option<u16>,

    /// Quiet period in milliseconds before a written file is read.
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}
