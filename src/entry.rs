use serde::Serialize;

/// A single page hit: the requested path and the visitor address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub page: String,
    pub ip: String,
}

impl LogEntry {
    /// Parses one access log line of the form `<page> <ip> [ignored...]`.
    ///
    /// Blank lines and lines with fewer than two whitespace-separated tokens
    /// yield `None`. Tokens past the second are ignored.
    pub fn parse(line: &str) -> Option<LogEntry> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let mut tokens = line.split_whitespace();
        let page = tokens.next()?;
        let ip = tokens.next()?;

        Some(LogEntry {
            page: page.to_string(),
            ip: ip.to_string(),
        })
    }
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
