// src/core/net.rs
//! Blocking HTTP with a per-run cookie jar.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::consts::{REQUEST_TIMEOUT_SECS, USER_AGENT};
use crate::error::{Result, RrError};

/// What the adapters need from the network. Tests substitute canned pages.
pub trait Fetch {
    fn get(&mut self, url: &str) -> Result<String>;
    fn post(&mut self, url: &str, params: &[(&str, &str)]) -> Result<String>;
}

/// One adapter run's HTTP session. Cookies set by one response are sent
/// with the next request; nothing is shared between sessions.
pub struct Session {
    client: Client,
}

impl Session {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| RrError::config(format!("HTTP client: {e}")))?;
        Ok(Self { client })
    }

    fn read(url: &str, resp: reqwest::Result<reqwest::blocking::Response>) -> Result<String> {
        let resp = resp.map_err(|e| RrError::fetch(url, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(RrError::fetch(url, format!("HTTP {status}")));
        }
        let bytes = resp.bytes().map_err(|e| RrError::fetch(url, e))?;
        Ok(decode_body(&bytes))
    }
}

impl Fetch for Session {
    fn get(&mut self, url: &str) -> Result<String> {
        logd!("GET {url}");
        Self::read(url, self.client.get(url).send())
    }

    fn post(&mut self, url: &str, params: &[(&str, &str)]) -> Result<String> {
        logd!("POST {url} ({} params)", params.len());
        Self::read(url, self.client.post(url).form(params).send())
    }
}

/// UTF-8 if it is, otherwise Latin-1 (older result pages are).
pub fn decode_body(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Resolve `href` against the page it was found on.
pub fn join_url(base: &str, href: &str) -> String {
    match reqwest::Url::parse(base).and_then(|b| b.join(href)) {
        Ok(u) => u.to_string(),
        Err(_) => s!(href),
    }
}

/// Last path segment of a URL or file path, without query.
pub fn file_name(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
