use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use url::Url;

use crate::format::SortOrder;

#[derive(Parser, Debug)]
#[command(
    name = "pageviews",
    about = "Analyze web server access logs to find total and unique visits per page",
    version,
    long_about = None
)]
pub struct Args {
    /// Path to the access log
    #[arg(default_value = "web.log")]
    pub log: PathBuf,

    /// Fetch the access log over HTTP(S) instead of reading a local file
    #[arg(long, conflicts_with = "log")]
    pub url: Option<Url>,

    /// HTTP request timeout in seconds
    #[arg(long, requires = "url")]
    pub timeout_secs: Option<u64>,

    /// Which views to report
    #[arg(long, value_enum, default_value_t = Views::All)]
    pub views: Views,

    /// Only print one sort direction (both by default)
    #[arg(short, long, value_enum)]
    pub order: Option<SortOrder>,

    /// Number of pages to display per report
    #[arg(short, long)]
    pub top: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Number of worker threads
    #[arg(short, long)]
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Views {
    Total,
    Unique,
    All,
}

impl Views {
    pub fn total(self) -> bool {
        matches!(self, Views::Total | Views::All)
    }

    pub fn unique(self) -> bool {
        matches!(self, Views::Unique | Views::All)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
