use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use url::Url;

use crate::error::FetchError;

/// Something that can hand over the complete raw text of an access log.
///
/// Location and credentials are bound when the source is constructed; callers
/// only ever ask for the content.
#[async_trait]
pub trait LogSource: Send + Sync {
    async fn read_log(&self) -> Result<String, FetchError>;

    /// Human readable location, used in logs and reports.
    fn describe(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct LocalFileSource {
    path: PathBuf,
}

impl LocalFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LocalFileSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LogSource for LocalFileSource {
    async fn read_log(&self) -> Result<String, FetchError> {
        let start_time = Instant::now();
        info!(action = "start", component = "file_source", path = ?self.path, "Reading log file");

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: self.path.clone(),
                source,
            })?;

        info!(
            action = "complete",
            component = "file_source",
            bytes = content.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "Log file read"
        );
        Ok(content)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fetches the log with a single GET. Works for CDN assets as well as object or
/// blob storage exposed through public or pre-signed URLs.
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: Url,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: Url) -> Result<Self, FetchError> {
        Self::build(url, reqwest::Client::builder())
    }

    pub fn with_timeout(url: Url, timeout: Duration) -> Result<Self, FetchError> {
        Self::build(url, reqwest::Client::builder().timeout(timeout))
    }

    fn build(url: Url, builder: reqwest::ClientBuilder) -> Result<Self, FetchError> {
        let client = builder.build().map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;
        Ok(HttpSource { url, client })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn http_error(&self, source: reqwest::Error) -> FetchError {
        FetchError::Http {
            url: self.url.to_string(),
            source,
        }
    }
}

#[async_trait]
impl LogSource for HttpSource {
    async fn read_log(&self) -> Result<String, FetchError> {
        let start_time = Instant::now();
        info!(action = "start", component = "http_source", url = %self.url, "Fetching log");

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| self.http_error(e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(action = "fetch", component = "http_source", url = %self.url, status = status.as_u16(), "Log fetch rejected");
            return Err(FetchError::Status {
                url: self.url.to_string(),
                status: status.as_u16(),
            });
        }

        let content = response.text().await.map_err(|e| self.http_error(e))?;

        info!(
            action = "complete",
            component = "http_source",
            bytes = content.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "Log fetched"
        );
        Ok(content)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

/// Log text that is already in memory.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    label: String,
    content: String,
}

impl InMemorySource {
    pub fn new(label: impl Into<String>, content: impl Into<String>) -> Self {
        InMemorySource {
            label: label.into(),
            content: content.into(),
        }
    }
}

#[async_trait]
impl LogSource for InMemorySource {
    async fn read_log(&self) -> Result<String, FetchError> {
        Ok(self.content.clone())
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}
