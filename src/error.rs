use std::path::PathBuf;

/// Errors raised while fetching raw log text from a source.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to read log file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch log from {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to fetch log from {url}: HTTP {status}")]
    Status { url: String, status: u16 },
}
