// src/error.rs
//! Error taxonomy for the scraping pipeline.
//!
//! `Config` is always fatal. `Fetch` and `Parse` are scoped to a single race
//! candidate and the runner recovers from them, except while reading a site's
//! own index page where nothing can be discovered without it.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RrError {
    /// Malformed roster or misconfigured run parameters
    #[error("configuration error: {0}")]
    Config(String),

    /// Network/HTTP failure for one URL
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Markup did not have the expected shape
    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RrError {
    pub fn config(msg: impl Into<String>) -> Self {
        RrError::Config(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        RrError::Parse(msg.into())
    }

    pub fn fetch(url: &str, reason: impl ToString) -> Self {
        RrError::Fetch { url: s!(url), reason: reason.to_string() }
    }

    /// Whether the runner may log this and move on to the next race.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RrError::Fetch { .. } | RrError::Parse(_))
    }
}

impl From<csv::Error> for RrError {
    fn from(e: csv::Error) -> Self {
        RrError::Parse(format!("CSV: {e}"))
    }
}

pub type Result<T> = std::result::Result<T, RrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = RrError::fetch("http://example.com/x.htm", "timed out");
        assert_eq!(err.to_string(), "fetch failed for http://example.com/x.htm: timed out");
        assert_eq!(RrError::config("empty roster").to_string(), "configuration error: empty roster");
    }

    #[test]
    fn recoverable_policy() {
        assert!(RrError::parse("no <pre>").is_recoverable());
        assert!(RrError::fetch("u", "404").is_recoverable());
        assert!(!RrError::config("bad").is_recoverable());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(!RrError::from(io).is_recoverable());
    }
}
