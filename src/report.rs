use anyhow::{Context, Result};
use serde::Serialize;
use std::time::Instant;
use tracing::info;

use crate::args::{OutputFormat, Views};
use crate::format::{format_page_views, SortOrder};
use crate::parser::LogParser;
use crate::source::LogSource;
use crate::stats::{AnalysisResult, PageViews, ParseSummary};
use crate::Args;

pub async fn analyze_log(
    source: Box<dyn LogSource>,
    workers: Option<usize>,
) -> Result<AnalysisResult> {
    let total_start_time = Instant::now();
    let label = source.describe();
    info!(action = "start", component = "analysis", source = %label, "Starting access log analysis");

    let mut parser = LogParser::from_boxed(source);
    if let Some(workers) = workers {
        parser = parser.with_workers(workers);
    }

    let summary = parser
        .read_log()
        .await
        .with_context(|| format!("Failed to load access log from {label}"))?;

    let page_views = parser.page_views();
    let unique_page_views = parser.unique_page_views();

    info!(
        action = "complete",
        component = "analysis",
        entries = summary.entries,
        pages = page_views.len(),
        duration_ms = total_start_time.elapsed().as_millis(),
        "Analysis completed successfully"
    );

    Ok(AnalysisResult {
        source: label,
        summary,
        page_views,
        unique_page_views,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: &'static str,
    #[serde(skip)]
    pub unique: bool,
    pub lines: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub source: String,
    pub summary: ParseSummary,
    pub sections: Vec<Section>,
}

impl Report {
    /// The classic four reports: total and unique views, most to least and least to most.
    pub fn build(
        result: &AnalysisResult,
        views: Views,
        order: Option<SortOrder>,
        top: Option<usize>,
    ) -> Report {
        let orders: &[SortOrder] = match order {
            Some(SortOrder::Descending) => &[SortOrder::Descending],
            Some(SortOrder::Ascending) => &[SortOrder::Ascending],
            None => &[SortOrder::Descending, SortOrder::Ascending],
        };

        let mut sections = Vec::new();
        let mut add = |page_views: &PageViews, unique: bool| {
            for &order in orders {
                let mut lines = format_page_views(page_views, order);
                if let Some(top) = top {
                    lines.truncate(top);
                }
                sections.push(Section {
                    title: section_title(unique, order),
                    unique,
                    lines,
                });
            }
        };

        if views.total() {
            add(&result.page_views, false);
        }
        if views.unique() {
            add(&result.unique_page_views, true);
        }

        Report {
            source: result.source.clone(),
            summary: result.summary,
            sections,
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let mut previous_unique = None;
        for section in &self.sections {
            if previous_unique == Some(false) && section.unique {
                out.push('\n');
            }
            previous_unique = Some(section.unique);

            out.push_str(section.title);
            out.push('\n');
            if section.lines.is_empty() {
                out.push('\n');
            }
            for line in &section.lines {
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report")
    }
}

fn section_title(unique: bool, order: SortOrder) -> &'static str {
    match (unique, order) {
        (false, SortOrder::Descending) => "Page Views (Most to Least):",
        (false, SortOrder::Ascending) => "Page Views (Least to Most):",
        (true, SortOrder::Descending) => "Unique Page Views (Most to Least):",
        (true, SortOrder::Ascending) => "Unique Page Views (Least to Most):",
    }
}

pub fn print_analysis_results(result: &AnalysisResult, args: &Args) -> Result<()> {
    let report = Report::build(result, args.views, args.order, args.top);

    info!(
        action = "summary",
        component = "report",
        lines = result.summary.lines,
        blank = result.summary.blank,
        malformed = result.summary.malformed,
        "Skipped lines"
    );

    match args.format {
        OutputFormat::Text => print!("{}", report.to_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}
