//! Command-line arguments

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Generate blog articles from a list of titles
#[derive(Parser, Debug)]
#[command(name = "autoblog", version, about)]
pub struct Cli {
    /// Article titles (prompted interactively when none are given)
    #[arg(value_name = "TITLE")]
    pub titles: Vec<String>,

    /// Read titles from a file, one per line (`#` starts a comment)
    #[arg(long, value_name = "PATH")]
    pub titles_file: Option<PathBuf>,

    /// Configuration file (JSON, or YAML for .yaml/.yml)
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,

    /// Output directory for generated markdown files
    #[arg(long, default_value = "./output")]
    pub outdir: PathBuf,

    /// Logging level (RUST_LOG takes precedence)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Directory for log files
    #[arg(long, default_value = "logs")]
    pub log_dir: PathBuf,

    /// Also write structured JSON logs
    #[arg(long)]
    pub log_json: bool,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Print the batch report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive for `EnvFilter`
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
