// tests/common/mod.rs
//
// Canned network and fixture helpers shared by the integration tests.
//
#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use race_results::core::Fetch;
use race_results::dates::DateRange;
use race_results::error::{Result, RrError};
use race_results::matcher::{Boundary, NameMatcher};
use race_results::roster::Member;

/// Serves pages from memory. Unknown URLs answer like a 404.
#[derive(Default)]
pub struct FakeFetch {
    gets: HashMap<String, String>,
    posts: HashMap<String, String>,
    /// `GET url` / `POST url`, in request order.
    pub requests: Vec<String>,
}

impl FakeFetch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: impl Into<String>) -> Self {
        self.gets.insert(url.to_string(), body.into());
        self
    }

    pub fn form(mut self, url: &str, body: impl Into<String>) -> Self {
        self.posts.insert(url.to_string(), body.into());
        self
    }

    pub fn times_requested(&self, url: &str) -> usize {
        self.requests.iter().filter(|r| r.ends_with(&format!(" {url}"))).count()
    }
}

impl Fetch for FakeFetch {
    fn get(&mut self, url: &str) -> Result<String> {
        self.requests.push(format!("GET {url}"));
        self.gets.get(url).cloned().ok_or_else(|| RrError::fetch(url, "HTTP 404 Not Found"))
    }

    fn post(&mut self, url: &str, _params: &[(&str, &str)]) -> Result<String> {
        self.requests.push(format!("POST {url}"));
        self.posts.get(url).cloned().ok_or_else(|| RrError::fetch(url, "HTTP 404 Not Found"))
    }
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

pub fn fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name)).unwrap()
}

pub fn days(start: (i32, u32, u32), stop: (i32, u32, u32)) -> DateRange {
    let d = |(y, m, dd): (i32, u32, u32)| NaiveDate::from_ymd_opt(y, m, dd).unwrap();
    DateRange::new(d(start), d(stop)).unwrap()
}

/// Paul Smith and Mary O'Brien, as in `fixtures/club.csv`.
pub fn club(boundary: Boundary) -> NameMatcher {
    NameMatcher::build(&[Member::new("Paul", "Smith"), Member::new("Mary", "O'Brien")], boundary).unwrap()
}
