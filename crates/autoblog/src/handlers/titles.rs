//! Title collection from arguments, files or an interactive prompt

use super::say;
use anyhow::Context;
use autoblog_core::{TitleError, TitleSet};
use dialoguer::Input;
use std::io::{BufRead, IsTerminal};
use tracing::warn;

/// Result of feeding one interactive input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Title accepted
    Added(String),
    /// Title invalid or duplicate
    Rejected(TitleError),
    /// Blank line, keep reading
    Skipped,
    /// Input finished (`END` or a second consecutive blank line)
    Finished,
}

/// Line-by-line title collector for interactive input
#[derive(Debug, Default)]
pub struct TitleCollector {
    titles: TitleSet,
    blank_streak: u32,
}

impl TitleCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one raw input line
    pub fn feed(&mut self, line: &str) -> LineOutcome {
        let line = line.trim();

        if line.is_empty() {
            self.blank_streak += 1;
            return if self.blank_streak >= 2 {
                LineOutcome::Finished
            } else {
                LineOutcome::Skipped
            };
        }

        if line.eq_ignore_ascii_case("END") {
            return LineOutcome::Finished;
        }

        self.blank_streak = 0;
        match self.titles.insert(line) {
            Ok(title) => LineOutcome::Added(title.to_string()),
            Err(e) => LineOutcome::Rejected(e),
        }
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn into_titles(self) -> TitleSet {
        self.titles
    }
}

/// Collect titles from command-line arguments and titles-file lines
///
/// Blank entries are skipped everywhere; `#` comments only in file lines,
/// so an argument such as `#1 Rust tip` stays a title. Rejected entries are
/// returned as warnings rather than failing the whole list.
pub fn collect_titles<A, L>(args: A, file_lines: L) -> (TitleSet, Vec<String>)
where
    A: IntoIterator,
    A::Item: AsRef<str>,
    L: IntoIterator,
    L::Item: AsRef<str>,
{
    let mut titles = TitleSet::new();
    let mut warnings = Vec::new();

    for arg in args {
        add_entry(&mut titles, &mut warnings, arg.as_ref());
    }
    for line in file_lines {
        let line = line.as_ref();
        if !line.trim_start().starts_with('#') {
            add_entry(&mut titles, &mut warnings, line);
        }
    }

    (titles, warnings)
}

fn add_entry(titles: &mut TitleSet, warnings: &mut Vec<String>, entry: &str) {
    let entry = entry.trim();
    if entry.is_empty() {
        return;
    }
    if let Err(e) = titles.insert(entry) {
        warn!("Skipping title {:?}: {}", entry, e);
        warnings.push(format!("{}: {}", entry, e));
    }
}

/// Prompt for titles until `END`, two blank lines, or end of input
///
/// With `json` set all messages go to stderr.
pub fn prompt_interactive(json: bool) -> anyhow::Result<TitleSet> {
    say(json, "Enter article titles, one per line.");
    say(json, "Finish with an empty line twice or 'END'.");
    say(json, "");

    let mut collector = TitleCollector::new();
    let interactive = std::io::stdin().is_terminal();
    let mut piped = (!interactive).then(|| std::io::stdin().lock().lines());

    loop {
        let line = if interactive {
            let prompt = format!("Title {}", collector.len() + 1);
            match Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
            {
                Ok(line) => line,
                // Ctrl-D / closed terminal ends input
                Err(_) => break,
            }
        } else {
            match piped.as_mut().and_then(|lines| lines.next()) {
                Some(line) => line.context("Failed to read title from stdin")?,
                None => break,
            }
        };

        match collector.feed(&line) {
            LineOutcome::Added(title) => say(json, format!("  → added: {}", title)),
            LineOutcome::Rejected(TitleError::Duplicate(_)) => say(
                json,
                "Warning: this title was already entered, enter a different one.",
            ),
            LineOutcome::Rejected(e) => say(json, format!("Error: {}", e)),
            LineOutcome::Skipped => {}
            LineOutcome::Finished => break,
        }
    }

    let titles = collector.into_titles();
    say(json, format!("\n{} title(s) entered.", titles.len()));
    Ok(titles)
}
