pub use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dagjose", version)]
#[command(about = "Transcode JOSE objects to and from content-addressed DAG-JOSE blocks")]
pub struct Args {
    /// Path to the config file (defaults to ~/.dagjose/config.toml)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); overrides the config file
    #[arg(long, global = true)]
    pub log_level: Option<tracing::Level>,

    #[command(subcommand)]
    pub command: crate::Command,
}
