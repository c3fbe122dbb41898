//! Review Pipeline
//!
//! Async driver around the pure per-file analyzer:
//! 1. Read each file (tokio)
//! 2. Analyze on the blocking pool under a per-file wall-clock budget
//! 3. Collect with bounded concurrency (`buffer_unordered`)
//! 4. Order by path and aggregate sequentially
//!
//! A file that cannot be read or exceeds its budget still yields a
//! `skipped` record, so a review always has one record per input file.

mod report;

pub use report::ProjectReview;

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::analyzer::assembler::{FileAnalyzer, SharedAnalyzer};
use crate::analyzer::enrich::{
    ComplexityEnricher, QualityEnricher, SecurityEnricher, SmellEnricher,
};
use crate::analyzer::extractor::ExtractorRegistry;
use crate::analyzer::language::Language;
use crate::analyzer::metrics::FileMetrics;
use crate::analyzer::scanner::{FileScanner, ScannedFile};
use crate::config::Config;
use crate::constants::pipeline::{DEFAULT_FILE_TIMEOUT_MS, FALLBACK_CONCURRENCY};
use crate::types::{ExtractionMode, FileAnalysis, Result, ScopeError};

/// Source handed to the pipeline by an external collaborator
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub content: Vec<u8>,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Bounded-concurrency review driver.
///
/// A timed-out analysis cannot be cancelled: its blocking task runs to
/// completion in the background. Each task holds one of `concurrency`
/// permits until it actually returns, so abandoned work still counts
/// against the limit and new files wait for a free slot. The per-file
/// budget starts once the slot is acquired.
pub struct ReviewPipeline {
    analyzer: SharedAnalyzer,
    concurrency: usize,
    file_timeout: Duration,
    blocking: Arc<Semaphore>,
}

impl ReviewPipeline {
    pub fn new(analyzer: SharedAnalyzer) -> Self {
        let concurrency = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(FALLBACK_CONCURRENCY);
        Self {
            analyzer,
            concurrency,
            file_timeout: Duration::from_millis(DEFAULT_FILE_TIMEOUT_MS),
            blocking: Arc::new(Semaphore::new(concurrency)),
        }
    }

    /// Analyzer and limits as described by the configuration
    pub fn from_config(config: &Config) -> Self {
        let registry =
            ExtractorRegistry::with_variable_cap(config.analysis.max_heuristic_variables);
        let mut analyzer =
            FileAnalyzer::new(registry).with_content(config.analysis.include_content);
        if config.enrich.complexity {
            analyzer = analyzer.with_enricher(ComplexityEnricher);
        }
        if config.enrich.smells {
            analyzer = analyzer.with_enricher(SmellEnricher);
        }
        if config.enrich.security {
            analyzer = analyzer.with_enricher(SecurityEnricher);
        }
        if config.enrich.quality {
            analyzer = analyzer.with_enricher(QualityEnricher);
        }

        Self::new(Arc::new(analyzer))
            .with_concurrency(config.pipeline.effective_concurrency())
            .with_file_timeout(config.pipeline.file_timeout())
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self.blocking = Arc::new(Semaphore::new(self.concurrency));
        self
    }

    pub fn with_file_timeout(mut self, timeout: Duration) -> Self {
        self.file_timeout = timeout;
        self
    }

    pub fn analyzer(&self) -> &SharedAnalyzer {
        &self.analyzer
    }

    /// Scan `scanner.root()` and review every selected file.
    pub async fn review_dir(&self, scanner: &FileScanner) -> Result<ProjectReview> {
        let root = scanner.root().to_path_buf();
        let files = scanner.scan()?;
        info!("Reviewing {} files under {}", files.len(), root.display());

        let analyses = self.review_scanned(files).await;
        Ok(ProjectReview::new(root.display().to_string(), analyses))
    }

    /// Review files already found by a scanner.
    pub async fn review_scanned(&self, files: Vec<ScannedFile>) -> Vec<FileAnalysis> {
        self.run(files, |file| async move {
            match tokio::fs::read(&file.path).await {
                Ok(content) => (file.relative, Ok(content)),
                Err(e) => (file.relative, Err(e)),
            }
        })
        .await
    }

    /// Review in-memory sources, e.g. from an upload handler.
    pub async fn review_sources(&self, root: &str, sources: Vec<SourceFile>) -> ProjectReview {
        let analyses = self
            .run(sources, |source| async move { (source.path, Ok(source.content)) })
            .await;
        ProjectReview::new(root, analyses)
    }

    async fn run<T, F, Fut>(&self, inputs: Vec<T>, load: F) -> Vec<FileAnalysis>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = (String, std::io::Result<Vec<u8>>)>,
    {
        let total = inputs.len();
        let mut stream = futures::stream::iter(inputs)
            .map(|input| {
                let analyzer = Arc::clone(&self.analyzer);
                let slots = Arc::clone(&self.blocking);
                let budget = self.file_timeout;
                let loaded = load(input);
                async move {
                    let (path, content) = loaded.await;
                    match content {
                        Ok(content) => {
                            analyze_with_budget(analyzer, slots, path, content, budget).await
                        },
                        Err(e) => {
                            warn!("Failed to read {}: {}", path, e);
                            let warning = ScopeError::Io(e).to_string();
                            skipped_record(&path, &[], warning)
                        }
                    }
                }
            })
            .buffer_unordered(self.concurrency);

        let mut analyses = Vec::with_capacity(total);
        while let Some(analysis) = stream.next().await {
            debug!(
                "[{}/{}] {} ({})",
                analyses.len() + 1,
                total,
                analysis.path,
                analysis.extraction
            );
            analyses.push(analysis);
        }

        analyses.sort_by(|a, b| a.path.cmp(&b.path));
        info!("Analyzed {} files", analyses.len());
        analyses
    }
}

/// Run one analysis on the blocking pool; past the budget the file gets a
/// metrics-only record.
///
/// The slot permit moves into the blocking task and is released only when
/// the analysis returns, even if the caller stopped waiting for it.
async fn analyze_with_budget(
    analyzer: SharedAnalyzer,
    slots: Arc<Semaphore>,
    path: String,
    content: Vec<u8>,
    budget: Duration,
) -> FileAnalysis {
    let permit = match slots.acquire_owned().await {
        Ok(permit) => permit,
        Err(closed) => {
            warn!("No analysis slot for {}: {}", path, closed);
            return skipped_record(&path, &content, closed.to_string());
        }
    };

    let content = Arc::new(content);
    let task = {
        let path = path.clone();
        let content = Arc::clone(&content);
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            analyzer.analyze_file(&path, &content)
        })
    };

    match with_timeout(budget, task, &path).await {
        Ok(Ok(analysis)) => analysis,
        Ok(Err(join_error)) => {
            warn!("Analysis task for {} failed: {}", path, join_error);
            skipped_record(&path, &content, join_error.to_string())
        }
        Err(timeout) => {
            warn!("{}", timeout);
            skipped_record(&path, &content, timeout.to_string())
        }
    }
}

/// Execute a future with a timeout
async fn with_timeout<T, F>(timeout: Duration, future: F, operation: &str) -> Result<T>
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => Ok(result),
        Err(_) => Err(ScopeError::timeout(format!("analyzing {}", operation), timeout)),
    }
}

/// Metrics-only record for a file whose analysis did not complete
fn skipped_record(path: &str, content: &[u8], warning: impl Into<String>) -> FileAnalysis {
    let language = Language::from_path(path);
    let mut record =
        FileAnalysis::empty(path, language.as_str(), content.len() as u64, ExtractionMode::Skipped)
            .with_warning(warning);

    if let Ok(text) = std::str::from_utf8(content) {
        let metrics = FileMetrics::compute(text, language);
        record.line_count = metrics.line_count;
        record.comment_count = metrics.comment_count;
        record.comment_ratio = metrics.comment_ratio;
    }
    record.summary = crate::analyzer::assembler::file_narrative(&record);
    record
}

/// Resolve the directory a review runs against
pub fn resolve_root(path: Option<&Path>) -> Result<PathBuf> {
    let root = match path {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir()?,
    };
    if !root.is_dir() {
        return Err(ScopeError::Scan(format!(
            "not a directory: {}",
            root.display()
        )));
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tempfile::TempDir;

    use super::*;
    use crate::analyzer::enrich::Enricher;
    use crate::types::{ElementKind, Insights};

    fn pipeline() -> ReviewPipeline {
        ReviewPipeline::new(Arc::new(FileAnalyzer::default())).with_concurrency(2)
    }

    #[tokio::test]
    async fn test_review_sources() {
        let review = pipeline()
            .review_sources(
                "upload",
                vec![
                    SourceFile::new("b/models.py", "class A:\n    pass\n\nclass B:\n    pass\n"),
                    SourceFile::new("a/main.go", "package main\n\nfunc main() {}\n"),
                    SourceFile::new("c/data.bin", vec![0u8, 1, 2, 3]),
                ],
            )
            .await;

        let paths: Vec<&str> = review.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, ["a/main.go", "b/models.py", "c/data.bin"]);
        assert_eq!(review.summary.file_count, 3);
        assert_eq!(review.summary.class_count, 2);
        assert_eq!(review.summary.function_count, 1);
        assert_eq!(review.files[2].extraction, ExtractionMode::Binary);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_review_dir() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/app.py"), "import os\n\ndef run():\n    pass\n").unwrap();
        fs::write(dir.path().join("src/util.lua"), "function helper()\nend\n").unwrap();

        let review = pipeline()
            .review_dir(&FileScanner::new(dir.path()))
            .await
            .unwrap();

        assert_eq!(review.files.len(), 2);
        let app = review.file("src/app.py").unwrap();
        assert_eq!(app.extraction, ExtractionMode::Syntax);
        assert_eq!(app.count(ElementKind::Import), 1);
        assert!(app.insights.as_ref().unwrap().contains_key("complexity"));
        assert_eq!(review.summary.approximate_files, 1);
    }

    struct Slow;

    impl Enricher for Slow {
        fn name(&self) -> &'static str {
            "slow"
        }

        fn enrich(&self, _analysis: &FileAnalysis, _content: &str) -> Result<Insights> {
            std::thread::sleep(Duration::from_millis(300));
            Ok(Insights::new())
        }
    }

    #[tokio::test]
    async fn test_timeout_yields_skipped_record() {
        let analyzer = FileAnalyzer::new(ExtractorRegistry::with_defaults()).with_enricher(Slow);
        let review = ReviewPipeline::new(Arc::new(analyzer))
            .with_file_timeout(Duration::from_millis(20))
            .review_sources("mem", vec![SourceFile::new("a.py", "# c\nx = 1\n")])
            .await;

        let record = &review.files[0];
        assert_eq!(record.extraction, ExtractionMode::Skipped);
        assert_eq!(record.line_count, 2);
        assert_eq!(record.comment_count, 1);
        assert!(record.elements.is_empty());
        assert!(record.warnings[0].starts_with("Timeout after"));
    }

    /// Records how many analyses overlap
    struct Gauge {
        active: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    impl Enricher for Gauge {
        fn name(&self) -> &'static str {
            "gauge"
        }

        fn enrich(&self, _analysis: &FileAnalysis, _content: &str) -> Result<Insights> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(100));
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(Insights::new())
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_abandoned_analysis_keeps_its_slot() {
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let analyzer = FileAnalyzer::new(ExtractorRegistry::with_defaults()).with_enricher(Gauge {
            active: Arc::clone(&active),
            peak: Arc::clone(&peak),
        });
        let sources = ["a.py", "b.py", "c.py"]
            .into_iter()
            .map(|path| SourceFile::new(path, "x = 1\n"))
            .collect();

        let review = ReviewPipeline::new(Arc::new(analyzer))
            .with_concurrency(1)
            .with_file_timeout(Duration::from_millis(10))
            .review_sources("mem", sources)
            .await;

        assert_eq!(review.files.len(), 3);
        assert!(
            review
                .files
                .iter()
                .all(|f| f.extraction == ExtractionMode::Skipped)
        );
        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unreadable_file_is_kept() {
        let dir = TempDir::new().unwrap();
        let missing = ScannedFile {
            path: dir.path().join("gone.rs"),
            relative: "gone.rs".to_string(),
            size: 0,
        };
        let analyses = pipeline().review_scanned(vec![missing]).await;
        assert_eq!(analyses.len(), 1);
        assert_eq!(analyses[0].extraction, ExtractionMode::Skipped);
        assert!(analyses[0].warnings[0].starts_with("IO error"));
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.enrich.complexity = false;
        config.enrich.quality = false;
        config.pipeline.concurrency = 3;
        let pipeline = ReviewPipeline::from_config(&config);
        assert_eq!(pipeline.concurrency, 3);
        assert_eq!(pipeline.analyzer().enricher_names(), ["smells", "security"]);

        let all = ReviewPipeline::from_config(&Config::default());
        assert_eq!(
            all.analyzer().enricher_names(),
            ["complexity", "smells", "security", "quality"]
        );
    }

    #[test]
    fn test_resolve_root() {
        let dir = TempDir::new().unwrap();
        assert_eq!(resolve_root(Some(dir.path())).unwrap(), dir.path());
        assert!(resolve_root(Some(&dir.path().join("missing"))).is_err());
    }
}
