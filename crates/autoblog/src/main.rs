//! autoblog CLI - article generation from a list of titles
//!
//! Collects titles, asks for confirmation and generates one markdown
//! article per title through an OpenAI-compatible API.

mod cli;
mod handlers;
mod logging;
mod state;

use clap::Parser;
use cli::Cli;
use handlers::generate;
use state::AppState;
use tracing::{debug, error};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    match logging::init(cli.log_level, &cli.log_dir, cli.log_json) {
        Ok(files) => {
            debug!("Text log: {}", files.text.display());
            if let Some(json) = &files.json {
                debug!("JSON log: {}", json.display());
            }
        }
        Err(e) => {
            eprintln!("Failed to initialize logging: {:#}", e);
            std::process::exit(1);
        }
    }

    // Initialize application state
    let state = match AppState::new(&cli.config, &cli.outdir) {
        Ok(state) => state,
        Err(e) => {
            error!("Startup failed: {:#}", e);
            eprintln!("Failed to initialize autoblog: {:#}", e);
            std::process::exit(1);
        }
    };

    // Execute
    match generate::run(state, &cli).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
