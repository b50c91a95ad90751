//! Per-title outcomes and the batch report

use autoblog_core::Title;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

/// Outcome for one title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationResult {
    Success { output_path: PathBuf },
    Failure { error: String },
}

impl GenerationResult {
    pub fn failure(error: impl Into<String>) -> Self {
        GenerationResult::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResult::Success { .. })
    }
}

/// One report row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub title: Title,
    #[serde(flatten)]
    pub result: GenerationResult,
}

/// Results of one batch, in completion order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "ReportData")]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub started_at: DateTime<Utc>,
    #[serde(with = "duration_secs")]
    pub elapsed: Duration,
    entries: Vec<ReportEntry>,
    /// Position of each title in `entries`
    #[serde(skip)]
    index: HashMap<Title, usize>,
}

/// Serialized form; the index is rebuilt on load
#[derive(Deserialize)]
struct ReportData {
    batch_id: Uuid,
    started_at: DateTime<Utc>,
    #[serde(with = "duration_secs")]
    elapsed: Duration,
    entries: Vec<ReportEntry>,
}

impl From<ReportData> for BatchReport {
    fn from(data: ReportData) -> Self {
        let mut report = Self {
            batch_id: data.batch_id,
            started_at: data.started_at,
            elapsed: data.elapsed,
            entries: Vec::with_capacity(data.entries.len()),
            index: HashMap::with_capacity(data.entries.len()),
        };
        for entry in data.entries {
            report.record(entry.title, entry.result);
        }
        report
    }
}

impl BatchReport {
    /// Start an empty report
    pub fn new() -> Self {
        Self {
            batch_id: Uuid::new_v4(),
            started_at: Utc::now(),
            elapsed: Duration::ZERO,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Append the outcome for `title`
    ///
    /// Titles are recorded once; a second record for the same title is
    /// ignored and `false` is returned.
    pub fn record(&mut self, title: Title, result: GenerationResult) -> bool {
        if self.index.contains_key(&title) {
            return false;
        }
        self.index.insert(title.clone(), self.entries.len());
        self.entries.push(ReportEntry { title, result });
        true
    }

    /// Outcome recorded for `title`
    pub fn get(&self, title: &Title) -> Option<&GenerationResult> {
        self.index.get(title).map(|&i| &self.entries[i].result)
    }

    /// Entries in completion order
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.result.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    /// Entries re-sorted to follow `titles`; titles not in the report are skipped
    pub fn in_order<'a>(&'a self, titles: &[Title]) -> Vec<&'a ReportEntry> {
        titles
            .iter()
            .filter_map(|t| self.index.get(t).map(|&i| &self.entries[i]))
            .collect()
    }
}

impl Default for BatchReport {
    fn default() -> Self {
        Self::new()
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
