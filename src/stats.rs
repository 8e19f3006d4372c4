use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;

use crate::entry::LogEntry;

/// Visit counts keyed by page, in first-seen order. Missing pages have zero visits.
pub type PageViews = IndexMap<String, usize>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParseSummary {
    pub lines: usize,
    pub blank: usize,
    pub malformed: usize,
    pub entries: usize,
}

impl ParseSummary {
    pub fn merge(&mut self, other: ParseSummary) {
        self.lines += other.lines;
        self.blank += other.blank;
        self.malformed += other.malformed;
        self.entries += other.entries;
    }
}

#[derive(Debug, Serialize)]
pub struct AnalysisResult {
    pub source: String,
    pub summary: ParseSummary,
    pub page_views: PageViews,
    pub unique_page_views: PageViews,
}

/// Total hits per page.
pub fn page_views(entries: &[LogEntry]) -> PageViews {
    let mut views = PageViews::new();
    for entry in entries {
        *views.entry(entry.page.clone()).or_insert(0) += 1;
    }
    views
}

/// Distinct visitor addresses per page.
pub fn unique_page_views(entries: &[LogEntry]) -> PageViews {
    let mut visitors: IndexMap<&str, HashSet<&str>> = IndexMap::new();
    for entry in entries {
        visitors
            .entry(entry.page.as_str())
            .or_default()
            .insert(entry.ip.as_str());
    }

    visitors
        .into_iter()
        .map(|(page, ips)| (page.to_string(), ips.len()))
        .collect()
}
