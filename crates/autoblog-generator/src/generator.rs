//! Parallel article generation

use crate::client::ArticleClient;
use crate::provider::TextProvider;
use crate::report::{BatchReport, GenerationResult};
use crate::{Error, Result};
use autoblog_core::{ArticleWriter, Config, Title, MAX_THREADS};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, info_span, warn, Instrument};

/// Failure recorded when every generation attempt failed
pub const NO_CONTENT_ERROR: &str = "no valid response received from the provider";

/// Failure recorded for titles never started because of a shutdown
pub const CANCELLED_ERROR: &str = "cancelled before generation started";

/// Progress callback, called with `(completed, total)` after each title
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Drives a batch of titles through generation and output
///
/// At most `max_workers` titles are in flight at once. A failing title never
/// affects the others; only a failed connectivity probe aborts the batch.
pub struct ArticleGenerator<P> {
    client: Arc<ArticleClient<P>>,
    prompt_template: String,
    max_workers: usize,
    progress: Option<ProgressCallback>,
}

impl<P: TextProvider + 'static> ArticleGenerator<P> {
    /// Create a generator with an explicit prompt template
    ///
    /// `max_workers` is clamped to `1..=MAX_THREADS`.
    pub fn new(
        client: ArticleClient<P>,
        prompt_template: impl Into<String>,
        max_workers: usize,
    ) -> Self {
        Self {
            client: Arc::new(client),
            prompt_template: prompt_template.into(),
            max_workers: max_workers.clamp(1, MAX_THREADS),
            progress: None,
        }
    }

    /// Create a generator using the template and pool size from `config`
    pub fn from_config(client: ArticleClient<P>, config: &Config) -> Self {
        Self::new(client, config.prompt_template(), config.processing.max_threads)
    }

    /// Set progress callback
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(callback));
        self
    }

    pub fn client(&self) -> &ArticleClient<P> {
        &self.client
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Generate an article for every title and write it to `output_dir`
    pub async fn generate_all(
        &self,
        titles: &[Title],
        output_dir: impl AsRef<Path>,
    ) -> Result<BatchReport> {
        self.generate_all_until(titles, output_dir, std::future::pending())
            .await
    }

    /// Like [`generate_all`](Self::generate_all), stopping early on `shutdown`
    ///
    /// Once `shutdown` resolves no further titles are started. Titles already
    /// in flight run to completion; the rest are recorded as cancelled.
    pub async fn generate_all_until<F>(
        &self,
        titles: &[Title],
        output_dir: impl AsRef<Path>,
        shutdown: F,
    ) -> Result<BatchReport>
    where
        F: Future<Output = ()>,
    {
        if !self.client.test_connection().await {
            return Err(Error::ConnectionFailed);
        }

        let writer = ArticleWriter::prepare(output_dir)?;
        let template: Arc<str> = Arc::from(self.prompt_template.as_str());

        let mut report = BatchReport::new();
        let started = std::time::Instant::now();
        let span = info_span!("batch", batch_id = %report.batch_id);

        async {
            info!(
                "Generating {} articles with {} workers into {}",
                titles.len(),
                self.max_workers,
                writer.dir().display()
            );

            let semaphore = Arc::new(Semaphore::new(self.max_workers));
            let cancelled = Arc::new(AtomicBool::new(false));
            let mut tasks = JoinSet::new();
            let mut task_titles = HashMap::new();
            let mut seen = HashSet::new();

            for title in titles {
                if !seen.insert(title.as_str()) {
                    warn!(title = %title, "Duplicate title skipped");
                    continue;
                }

                let task = generate_one(
                    Arc::clone(&self.client),
                    writer.clone(),
                    Arc::clone(&template),
                    title.clone(),
                    Arc::clone(&semaphore),
                    Arc::clone(&cancelled),
                );
                let handle = tasks.spawn(task.instrument(info_span!("article", title = %title)));
                task_titles.insert(handle.id(), title.clone());
            }

            let total = task_titles.len();
            let mut shutdown_seen = false;
            tokio::pin!(shutdown);

            loop {
                tokio::select! {
                    biased;

                    _ = &mut shutdown, if !shutdown_seen => {
                        shutdown_seen = true;
                        warn!("Shutdown requested, no further titles will be started");
                        cancelled.store(true, Ordering::SeqCst);
                        semaphore.close();
                    }
                    next = tasks.join_next_with_id() => {
                        let Some(joined) = next else { break };

                        let (title, result) = match joined {
                            Ok((id, result)) => (task_titles.remove(&id), result),
                            Err(e) => (
                                task_titles.remove(&e.id()),
                                GenerationResult::failure(format!("unexpected error: {}", e)),
                            ),
                        };
                        let Some(title) = title else { continue };

                        log_outcome(&title, &result);
                        report.record(title, result);

                        if let Some(progress) = &self.progress {
                            progress(report.len(), total);
                        }
                    }
                }
            }
        }
        .instrument(span)
        .await;

        report.elapsed = started.elapsed();
        info!(
            "Batch finished: {} succeeded, {} failed in {:.1}s",
            report.succeeded(),
            report.failed(),
            report.elapsed.as_secs_f64()
        );

        Ok(report)
    }
}

/// Generate and write a single article once a worker slot is free
async fn generate_one<P: TextProvider>(
    client: Arc<ArticleClient<P>>,
    writer: ArticleWriter,
    template: Arc<str>,
    title: Title,
    semaphore: Arc<Semaphore>,
    cancelled: Arc<AtomicBool>,
) -> GenerationResult {
    let Ok(_permit) = semaphore.acquire_owned().await else {
        return GenerationResult::failure(CANCELLED_ERROR);
    };
    if cancelled.load(Ordering::SeqCst) {
        return GenerationResult::failure(CANCELLED_ERROR);
    }

    info!(title = %title, status = "started", "Generating article");

    let Some(content) = client.generate_article(&template, title.as_str()).await else {
        return GenerationResult::failure(NO_CONTENT_ERROR);
    };

    match writer.write(&title, &content).await {
        Ok(output_path) => GenerationResult::Success { output_path },
        Err(e) => GenerationResult::failure(e.to_string()),
    }
}

fn log_outcome(title: &Title, result: &GenerationResult) {
    match result {
        GenerationResult::Success { output_path } => info!(
            title = %title,
            status = "completed",
            output_file = %output_path.display(),
            "Article generated"
        ),
        GenerationResult::Failure { error } => error!(
            title = %title,
            status = "failed",
            error = %error,
            "Article generation failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RetryPolicy;
    use crate::error::ProviderError;
    use crate::provider::{CompletionRequest, CompletionResponse};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Echoes the prompt back as an article; behaviour keyed by prompt text
    #[derive(Default)]
    struct EchoProvider {
        probe_fails: bool,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextProvider for EchoProvider {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> std::result::Result<CompletionResponse, ProviderError> {
            let prompt = request.messages.last().unwrap().content.clone();

            if prompt == crate::prompts::PROBE_MESSAGE {
                if self.probe_fails {
                    return Err(ProviderError::RequestFailed("connection refused".into()));
                }
                return Ok(response(Some("pong")));
            }

            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.clone());

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if prompt.contains("fail") {
                return Err(ProviderError::RateLimited("slow down".into()));
            }
            if prompt.contains("panic") {
                panic!("provider exploded");
            }
            Ok(response(Some(&format!("#{}\n\n\n\nbody", prompt))))
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    fn response(content: Option<&str>) -> CompletionResponse {
        CompletionResponse {
            content: content.map(str::to_string),
            model: "echo".to_string(),
            finish_reason: None,
        }
    }

    fn titles(raw: &[&str]) -> Vec<Title> {
        raw.iter().map(|t| Title::parse(*t).unwrap()).collect()
    }

    fn generator(provider: EchoProvider, workers: usize) -> ArticleGenerator<EchoProvider> {
        let client = ArticleClient::new(provider).with_retry(RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(1),
        });
        ArticleGenerator::new(client, "{title}", workers)
    }

    #[tokio::test]
    async fn test_every_title_gets_one_result() {
        let temp_dir = TempDir::new().unwrap();
        let input = titles(&["alpha", "beta", "please fail", "gamma", "delta"]);

        let report = generator(EchoProvider::default(), 3)
            .generate_all(&input, temp_dir.path())
            .await
            .unwrap();

        assert_eq!(report.len(), input.len());
        assert_eq!(report.succeeded(), 4);
        assert_eq!(report.failed(), 1);
        for title in &input {
            assert!(report.get(title).is_some(), "missing {}", title);
        }

        assert_eq!(
            report.get(&Title::parse("please fail").unwrap()),
            Some(&GenerationResult::failure(NO_CONTENT_ERROR))
        );

        let Some(GenerationResult::Success { output_path }) =
            report.get(&Title::parse("alpha").unwrap())
        else {
            panic!("alpha should succeed");
        };
        assert!(output_path.starts_with(temp_dir.path()));
        assert!(output_path.to_string_lossy().ends_with("_alpha.md"));
        assert_eq!(
            std::fs::read_to_string(output_path).unwrap(),
            "# alpha\n\nbody"
        );
    }

    #[tokio::test]
    async fn test_probe_failure_aborts_batch() {
        let temp_dir = TempDir::new().unwrap();
        let provider = EchoProvider {
            probe_fails: true,
            ..Default::default()
        };
        let generator = generator(provider, 2);

        let err = generator
            .generate_all(&titles(&["a", "b"]), temp_dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ConnectionFailed));
        assert_eq!(generator.client().provider().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_pool_bounds_concurrency() {
        let temp_dir = TempDir::new().unwrap();
        let input: Vec<Title> = (0..12)
            .map(|i| Title::parse(format!("title {}", i)).unwrap())
            .collect();

        let generator = generator(EchoProvider::default(), 4);
        let report = generator.generate_all(&input, temp_dir.path()).await.unwrap();

        assert_eq!(report.succeeded(), 12);
        let provider = generator.client().provider();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 12);
        assert!(provider.peak.load(Ordering::SeqCst) <= 4);
    }

    #[tokio::test]
    async fn test_panicking_task_is_isolated() {
        let temp_dir = TempDir::new().unwrap();
        let input = titles(&["fine", "panic now", "also fine"]);

        let report = generator(EchoProvider::default(), 2)
            .generate_all(&input, temp_dir.path())
            .await
            .unwrap();

        assert_eq!(report.len(), 3);
        assert_eq!(report.succeeded(), 2);
        match report.get(&Title::parse("panic now").unwrap()) {
            Some(GenerationResult::Failure { error }) => {
                assert!(error.starts_with("unexpected error"), "{}", error)
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_write_failure_is_per_title() {
        let temp_dir = TempDir::new().unwrap();
        // A directory squatting on the output file name makes the write fail
        let date = chrono::Local::now().date_naive();
        let blocked = temp_dir
            .path()
            .join(autoblog_core::output_filename("blocked", date));
        std::fs::create_dir(&blocked).unwrap();

        let report = generator(EchoProvider::default(), 2)
            .generate_all(&titles(&["blocked", "open"]), temp_dir.path())
            .await
            .unwrap();

        assert_eq!(report.succeeded(), 1);
        assert!(matches!(
            report.get(&Title::parse("blocked").unwrap()),
            Some(GenerationResult::Failure { .. })
        ));
    }

    #[tokio::test]
    async fn test_shutdown_cancels_unstarted_titles() {
        let temp_dir = TempDir::new().unwrap();
        let input: Vec<Title> = (0..6)
            .map(|i| Title::parse(format!("t{}", i)).unwrap())
            .collect();

        let generator = generator(EchoProvider::default(), 1);
        let report = generator
            .generate_all_until(&input, temp_dir.path(), std::future::ready(()))
            .await
            .unwrap();

        assert_eq!(report.len(), 6);
        assert!(report
            .entries()
            .iter()
            .all(|e| e.result == GenerationResult::failure(CANCELLED_ERROR)
                || e.result.is_success()));
        assert!(report.failed() >= 5);
    }

    #[tokio::test]
    async fn test_progress_and_shared_template() {
        let temp_dir = TempDir::new().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_cb = Arc::clone(&seen);

        let client = ArticleClient::new(EchoProvider::default());
        let generator = ArticleGenerator::new(client, "Write about {title}", 2)
            .with_progress(move |done, total| seen_cb.lock().unwrap().push((done, total)));

        generator
            .generate_all(&titles(&["x", "y", "z"]), temp_dir.path())
            .await
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![(1, 3), (2, 3), (3, 3)]);

        let mut prompts = generator.client().provider().prompts.lock().unwrap().clone();
        prompts.sort();
        assert_eq!(
            prompts,
            vec!["Write about x", "Write about y", "Write about z"]
        );
    }

    #[tokio::test]
    async fn test_worker_count_is_clamped() {
        let temp_dir = TempDir::new().unwrap();
        let wide = generator(EchoProvider::default(), usize::MAX);
        assert_eq!(wide.max_workers(), MAX_THREADS);

        let report = wide
            .generate_all(&titles(&["a"]), temp_dir.path())
            .await
            .unwrap();
        assert_eq!(report.succeeded(), 1);

        assert_eq!(generator(EchoProvider::default(), 0).max_workers(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_titles_processed_once() {
        let temp_dir = TempDir::new().unwrap();
        let generator = generator(EchoProvider::default(), 2);

        let report = generator
            .generate_all(&titles(&["Intro to X", "Intro to X"]), temp_dir.path())
            .await
            .unwrap();

        assert_eq!(report.len(), 1);
        assert_eq!(generator.client().provider().calls.load(Ordering::SeqCst), 1);
    }
}
