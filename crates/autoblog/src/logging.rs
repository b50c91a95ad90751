//! Tracing setup: console, text log file and optional JSON log file

use crate::cli::LogLevel;
use anyhow::Context;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Paths of the log files opened for this run
#[derive(Debug)]
pub struct LogFiles {
    pub text: PathBuf,
    pub json: Option<PathBuf>,
}

/// Install the global subscriber
///
/// `RUST_LOG` overrides `level` when set.
pub fn init(level: LogLevel, log_dir: &Path, json: bool) -> anyhow::Result<LogFiles> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let text_path = log_dir.join(format!("autoblog_{}.log", stamp));
    let json_path = json.then(|| log_dir.join(format!("autoblog_{}.json", stamp)));

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let text_file = fmt::layer()
        .with_writer(Mutex::new(open(&text_path)?))
        .with_ansi(false);

    let json_file = match &json_path {
        Some(path) => Some(
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(Mutex::new(open(path)?)),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(text_file)
        .with(json_file)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(LogFiles {
        text: text_path,
        json: json_path,
    })
}

fn open(path: &Path) -> anyhow::Result<File> {
    File::create(path).with_context(|| format!("Failed to create log file {}", path.display()))
}
