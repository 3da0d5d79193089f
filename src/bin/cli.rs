use atm::{AtmConfig, TextInterface};

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const END_COMMAND: &str = "end";

#[derive(Parser, Debug)]
#[clap(version, about, propagate_version = true)]
struct Cli {
    /// Path to a device configuration file; the built-in accounts are used when omitted
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Seconds of inactivity before the session is logged out
    #[clap(short, long, value_parser)]
    logout_seconds: Option<u64>,
}

/// Logs go to stderr so they stay out of the way of the prompt.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn prompt() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Cli::parse();

    let mut config = match &args.config {
        Some(path) => AtmConfig::read(path)?,
        None => AtmConfig::default()
    };
    if let Some(seconds) = args.logout_seconds {
        config.logout_seconds = seconds;
    }

    let (atm, shutdown) = config.build();
    let text_ui = TextInterface::new(atm);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt()?;
        let line = match lines.next_line().await.with_context(|| "failed to read command")? {
            Some(line) => line,
            None => break
        };
        if line.trim() == END_COMMAND {
            break;
        }
        println!("{}", text_ui.execute(&line));
    }

    shutdown.signal().await;
    Ok(())
}
