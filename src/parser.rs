use rayon::prelude::*;
use std::time::Instant;
use tracing::{info, warn};

use crate::entry::{self, LogEntry};
use crate::error::FetchError;
use crate::source::LogSource;
use crate::stats::{self, PageViews, ParseSummary};

#[derive(Debug, Default)]
struct ParseBatch {
    entries: Vec<LogEntry>,
    summary: ParseSummary,
}

/// Pulls an access log from its source and answers page-view questions about it.
pub struct LogParser {
    source: Box<dyn LogSource>,
    workers: usize,
    entries: Vec<LogEntry>,
    summary: ParseSummary,
}

impl LogParser {
    pub fn new(source: impl LogSource + 'static) -> Self {
        Self::from_boxed(Box::new(source))
    }

    pub fn from_boxed(source: Box<dyn LogSource>) -> Self {
        LogParser {
            source,
            workers: default_workers(),
            entries: Vec::new(),
            summary: ParseSummary::default(),
        }
    }

    /// Caps the number of threads used to parse lines. Zero is treated as one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn summary(&self) -> ParseSummary {
        self.summary
    }

    /// Fetches the whole log and replaces the parsed entries with its contents.
    ///
    /// If the fetch fails the previously parsed entries are left untouched.
    pub async fn read_log(&mut self) -> Result<ParseSummary, FetchError> {
        let content = self.source.read_log().await?;

        let (entries, summary) = parse_lines(&content, self.workers);
        self.entries = entries;
        self.summary = summary;
        Ok(summary)
    }

    pub fn page_views(&self) -> PageViews {
        stats::page_views(&self.entries)
    }

    pub fn unique_page_views(&self) -> PageViews {
        stats::unique_page_views(&self.entries)
    }
}

pub fn default_workers() -> usize {
    std::cmp::min(num_cpus::get(), 8)
}

/// Parses every line of `content`, keeping entries in their original order.
pub fn parse_lines(content: &str, workers: usize) -> (Vec<LogEntry>, ParseSummary) {
    let start_time = Instant::now();
    info!(
        action = "start",
        component = "line_parsing",
        bytes = content.len(),
        worker_count = workers,
        "Parsing log lines"
    );

    let batch = if workers <= 1 {
        parse_sequential(content)
    } else {
        match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool.install(|| parse_parallel(content)),
            Err(e) => {
                warn!(action = "configure", component = "line_parsing", error = %e, "Falling back to global thread pool");
                parse_parallel(content)
            }
        }
    };

    info!(
        action = "complete",
        component = "line_parsing",
        lines = batch.summary.lines,
        entries = batch.summary.entries,
        blank = batch.summary.blank,
        malformed = batch.summary.malformed,
        duration_ms = start_time.elapsed().as_millis(),
        "Log lines parsed"
    );

    (batch.entries, batch.summary)
}

fn parse_line_into(mut acc: ParseBatch, line: &str) -> ParseBatch {
    acc.summary.lines += 1;
    if entry::is_blank(line) {
        acc.summary.blank += 1;
    } else if let Some(entry) = LogEntry::parse(line) {
        acc.summary.entries += 1;
        acc.entries.push(entry);
    } else {
        acc.summary.malformed += 1;
    }
    acc
}

fn parse_sequential(content: &str) -> ParseBatch {
    content.lines().fold(ParseBatch::default(), parse_line_into)
}

fn parse_parallel(content: &str) -> ParseBatch {
    // Batches come back in line order, so merging them in sequence preserves it.
    let batches: Vec<ParseBatch> = content
        .par_lines()
        .fold(ParseBatch::default, parse_line_into)
        .collect();

    let mut merged = ParseBatch::default();
    for batch in batches {
        merged.entries.extend(batch.entries);
        merged.summary.merge(batch.summary);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemorySource;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    const SCENARIO: &str = "/home 1.1.1.1\n/about 2.2.2.2\n/home 1.1.1.1\n/home 3.3.3.3\n";

    /// Serves `content` until `fail` is flipped on.
    struct FlakySource {
        content: String,
        fail: Arc<AtomicBool>,
    }

    #[async_trait]
    impl LogSource for FlakySource {
        async fn read_log(&self) -> Result<String, FetchError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(FetchError::Io {
                    path: "flaky.log".into(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
                });
            }
            Ok(self.content.clone())
        }

        fn describe(&self) -> String {
            "flaky".to_string()
        }
    }

    #[test]
    fn test_parse_lines_counts() {
        let content = "/home 1.1.1.1\ninvalid_no_space\n/about\n\n/home 2.2.2.2";
        let (entries, summary) = parse_lines(content, 1);

        assert_eq!(entries.len(), 2);
        assert_eq!(
            summary,
            ParseSummary {
                lines: 5,
                blank: 1,
                malformed: 2,
                entries: 2,
            }
        );
    }

    #[test]
    fn test_parse_lines_handles_crlf() {
        let (entries, _) = parse_lines("/home 1.1.1.1\r\n/about 2.2.2.2\r\n", 1);
        assert_eq!(entries[0].ip, "1.1.1.1");
        assert_eq!(entries[1].ip, "2.2.2.2");
    }

    #[test]
    fn test_parallel_parse_matches_sequential() {
        let content: String = (0..5_000)
            .map(|i| match i % 7 {
                0 => String::new(),
                1 => format!("/solo{i}"),
                _ => format!("/page{} 10.0.{}.{} trailing", i % 13, i % 5, i % 251),
            })
            .collect::<Vec<_>>()
            .join("\n");

        let sequential = parse_lines(&content, 1);
        let parallel = parse_lines(&content, 4);
        assert_eq!(sequential, parallel);
    }

    #[tokio::test]
    async fn test_read_log_end_to_end() {
        let mut parser = LogParser::new(InMemorySource::new("memory", SCENARIO));
        let summary = parser.read_log().await.unwrap();
        assert_eq!(summary.entries, 4);

        let views = parser.page_views();
        assert_eq!(views.len(), 2);
        assert_eq!(views["/home"], 3);
        assert_eq!(views["/about"], 1);

        let unique = parser.unique_page_views();
        assert_eq!(unique["/home"], 2);
        assert_eq!(unique["/about"], 1);
    }

    #[tokio::test]
    async fn test_read_log_tolerates_malformed_lines() {
        let content = [
            "/home 1.1.1.1",
            "invalid_no_space",
            "/about",
            "",
            "/home 2.2.2.2",
        ]
        .join("\n");
        let mut parser = LogParser::new(InMemorySource::new("memory", content));
        parser.read_log().await.unwrap();

        let views = parser.page_views();
        assert_eq!(views.len(), 1);
        assert_eq!(views["/home"], 2);

        let unique = parser.unique_page_views();
        assert_eq!(unique.len(), 1);
        assert_eq!(unique["/home"], 2);
    }

    #[tokio::test]
    async fn test_read_log_replaces_entries() {
        let mut parser =
            LogParser::new(InMemorySource::new("memory", SCENARIO)).with_workers(2);
        parser.read_log().await.unwrap();
        parser.read_log().await.unwrap();

        assert_eq!(parser.entries().len(), 4);
        assert_eq!(parser.page_views()["/home"], 3);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_entries() {
        let fail = Arc::new(AtomicBool::new(false));
        let mut parser = LogParser::new(FlakySource {
            content: SCENARIO.to_string(),
            fail: Arc::clone(&fail),
        });

        parser.read_log().await.unwrap();
        let before = parser.entries().to_vec();
        let summary_before = parser.summary();

        fail.store(true, Ordering::SeqCst);
        assert!(parser.read_log().await.is_err());
        assert_eq!(parser.entries(), before.as_slice());
        assert_eq!(parser.summary(), summary_before);

        fail.store(false, Ordering::SeqCst);
        parser.read_log().await.unwrap();
        assert_eq!(parser.entries(), before.as_slice());
        assert_eq!(parser.page_views()["/home"], 3);
    }

    #[tokio::test]
    async fn test_failed_fetch_on_fresh_parser_leaves_it_empty() {
        let mut parser = LogParser::new(FlakySource {
            content: SCENARIO.to_string(),
            fail: Arc::new(AtomicBool::new(true)),
        });

        assert!(parser.read_log().await.is_err());
        assert!(parser.entries().is_empty());
        assert!(parser.page_views().is_empty());
        assert_eq!(parser.summary(), ParseSummary::default());
    }

    #[test]
    fn test_with_workers_clamps_zero() {
        let parser = LogParser::new(InMemorySource::new("memory", "")).with_workers(0);
        assert_eq!(parser.workers, 1);
    }
}
