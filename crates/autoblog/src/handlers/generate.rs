//! Generation command: collect titles, confirm, run the batch, report

use crate::cli::Cli;
use crate::handlers::{say, titles};
use crate::state::AppState;
use anyhow::Context;
use autoblog_core::{Title, TitleSet};
use autoblog_generator::{ArticleGenerator, BatchReport, GenerationResult};
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

/// Run one batch end to end and return the text to print
pub async fn run(state: AppState, cli: &Cli) -> anyhow::Result<String> {
    if !cli.json {
        print_config(&state);
    }

    let titles = gather_titles(cli)?;
    if titles.is_empty() {
        warn!("No titles entered");
        return Ok("No titles entered, nothing to do.".to_string());
    }

    if !cli.yes && !confirm(&titles, cli.json) {
        return Ok("Article generation cancelled.".to_string());
    }

    let titles = titles.into_vec();
    info!("Starting generation of {} articles", titles.len());

    let progress = progress_bar(titles.len(), cli.json);
    let bar = progress.clone();

    let AppState {
        config,
        client,
        output_dir,
    } = state;
    let generator = ArticleGenerator::from_config(client, &config)
        .with_progress(move |done, _total| bar.set_position(done as u64));

    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => warn!("Interrupted by user"),
            Err(e) => {
                warn!("Ctrl-C handler unavailable: {}", e);
                std::future::pending::<()>().await
            }
        }
    };

    let result = generator
        .generate_all_until(&titles, &output_dir, shutdown)
        .await;
    progress.finish_and_clear();

    let report = result.context("Article generation failed")?;
    info!(
        "Generation finished: {} succeeded, {} failed",
        report.succeeded(),
        report.failed()
    );

    if cli.json {
        return Ok(serde_json::to_string_pretty(&report)?);
    }

    let mut output = render_report(&report, &titles);
    if report.succeeded() > 0 {
        output.push_str(&format!(
            "\nGenerated files were saved to {}",
            output_dir.display()
        ));
    }
    Ok(output)
}

fn print_config(state: &AppState) {
    let config = &state.config;
    println!("=== autoblog settings ===");
    println!("Model: {}", config.openai.model);
    println!("Style: {}", config.prompt_settings.style);
    println!("Audience: {}", config.prompt_settings.target_audience);
    println!("Output: {}", state.output_dir.display());
    println!("{}", "=".repeat(30));
    println!();
}

/// Titles from the command line and `--titles-file`, else interactive input
fn gather_titles(cli: &Cli) -> anyhow::Result<TitleSet> {
    if cli.titles.is_empty() && cli.titles_file.is_none() {
        return titles::prompt_interactive(cli.json);
    }

    let content = match &cli.titles_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read titles file {}", path.display()))?,
        None => String::new(),
    };

    let (titles, warnings) = titles::collect_titles(&cli.titles, content.lines());
    for warning in warnings {
        eprintln!("Skipped title: {}", warning);
    }
    Ok(titles)
}

/// List the titles and ask before starting; prompts render on stderr
fn confirm(titles: &TitleSet, json: bool) -> bool {
    say(json, "\n=== Titles to generate ===");
    for (i, title) in titles.iter().enumerate() {
        say(json, format!("{:2}. {}", i + 1, title));
    }
    say(json, "=".repeat(30));

    Confirm::new()
        .with_prompt("Start generation?")
        .default(false)
        .interact()
        .unwrap_or(false)
}

fn progress_bar(total: usize, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total as u64);
    let template = "{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} articles";
    if let Ok(style) = ProgressStyle::with_template(template) {
        bar.set_style(style);
    }
    bar
}

/// Results table in input order plus counts
fn render_report(report: &BatchReport, titles: &[Title]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "", "Title", "Output / Error"]);

    for (i, entry) in report.in_order(titles).into_iter().enumerate() {
        let (mark, detail) = match &entry.result {
            GenerationResult::Success { output_path } => (
                Cell::new("✓").fg(Color::Green),
                Cell::new(output_path.display()),
            ),
            GenerationResult::Failure { error } => {
                (Cell::new("✗").fg(Color::Red), Cell::new(error).fg(Color::Red))
            }
        };
        table.add_row(vec![
            Cell::new(i + 1),
            mark,
            Cell::new(entry.title.as_str()),
            detail,
        ]);
    }

    format!(
        "=== Results ===\n{}\nSucceeded: {}, Failed: {}",
        table,
        report.succeeded(),
        report.failed()
    )
}
