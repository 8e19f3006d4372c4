pub mod args;
pub mod entry;
pub mod error;
pub mod format;
pub mod parser;
pub mod report;
pub mod source;
pub mod stats;
pub mod utils;

pub use args::Args;
pub use entry::LogEntry;
pub use error::FetchError;
pub use format::{format_page_views, SortOrder};
pub use parser::LogParser;
pub use report::{analyze_log, print_analysis_results, Report};
pub use source::{HttpSource, InMemorySource, LocalFileSource, LogSource};
pub use stats::{AnalysisResult, PageViews, ParseSummary};
