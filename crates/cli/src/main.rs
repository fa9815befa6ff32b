//! dagjose - transcode JOSE objects to and from content-addressed
//! DAG-JOSE blocks.

// CLI modules
mod cli;
mod config;

use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer};

use cli::{args::Args, op::Op, Get, Inspect, Put, Version};
use config::Config;

command_enum! {
    (Put, Put),
    (Get, Get),
    (Inspect, Inspect),
    (Version, Version),
}

/// Logs go to stderr so stdout only ever carries command output.
fn init_tracing(log_level: tracing::Level) -> WorkerGuard {
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(log_level).into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(non_blocking_writer)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stderr_layer).init();
    guard
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match Config::load(args.config_path.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    // flag > config file > default
    let guard = init_tracing(args.log_level.unwrap_or(config.log_level));
    tracing::debug!(?config, "loaded config");

    let ctx = cli::op::OpContext::new(config);

    let code = match args.command.execute(&ctx).await {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("Error: {}", e);
            1
        }
    };

    // flush buffered logs before exiting
    drop(guard);
    std::process::exit(code);
}
