// src/specs/coolrunning.rs
//! CoolRunning (coolrunning.com).
//!
//! CoolRunning hosts results produced by many timing companies. Each race page
//! names its producer in `<meta name="Author">`, and the layout follows from
//! that: a few produce tables, most produce plain text, some produce layouts
//! not worth parsing.
//!
//! Race files live under `/results/{yy}/{state}/` and are named after the race
//! date, e.g. `Dec9_Jingle_set1.shtml`. Long races are split into
//! `…set1.shtml`, `…set2.shtml`, … which link to each other.

use super::{collect_links, compile, matching_lines, merge_candidates, require_matcher};
use super::{CandidateRaceRef, RacePage, SourceAdapter};
use crate::config::consts::COOLRUNNING_BASE;
use crate::core::net::{file_name, join_url};
use crate::core::Fetch;
use crate::dates::DateRange;
use crate::error::{Result, RrError};
use crate::fragment::{MatchedRows, ResultFragment};
use crate::locator::{self, block_lines, first_heading, locate_result_block, Block, FormatHint, TableHint};
use crate::matcher::NameMatcher;

/// Results layout, decided by the page's author tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VendorFormat {
    /// HTML table, runner name in the second cell.
    Tabular,
    /// Fixed-width text in a `<pre>`.
    Preformatted,
    /// Known producers whose pages are skipped.
    Denylisted,
    /// Never seen before; parsed as plain text on a best-effort basis.
    Unknown,
}

const TABULAR_VENDORS: &[&str] = &["CapeCodRoadRunners"];
const PREFORMATTED_VENDORS: &[&str] =
    &["kick610", "JB Race", "gstate", "ab-mac", "FTO", "NSTC", "ndatrackxc", "wcrc", "Spitler"];
// spreadsheet exports, race series and unhandled XML layouts
const DENYLISTED_VENDORS: &[&str] =
    &["colonial", "opportunity", "Harriers", "FFAST", "lungne", "northeastracers", "sri", "WCRCSCOTT"];

pub fn classify_vendor(author: &str) -> VendorFormat {
    let author = author.trim();
    if TABULAR_VENDORS.contains(&author) {
        VendorFormat::Tabular
    } else if PREFORMATTED_VENDORS.contains(&author) {
        VendorFormat::Preformatted
    } else if DENYLISTED_VENDORS.contains(&author) {
        VendorFormat::Denylisted
    } else {
        VendorFormat::Unknown
    }
}

pub struct CoolRunning {
    states: Vec<String>,
}

impl CoolRunning {
    pub fn new(states: Vec<String>) -> Result<Self> {
        let states: Vec<String> = states
            .into_iter()
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        if states.is_empty() {
            return Err(RrError::config("CoolRunning needs at least one state"));
        }
        Ok(Self { states })
    }

    pub fn master_url(year: i32, state: &str) -> String {
        format!("{COOLRUNNING_BASE}/results/{:02}/{state}.shtml", year.rem_euclid(100))
    }

    /// `/results/yy/state/(?:Dec9_|Dec10_|…)…shtml`
    pub fn race_pattern(year: i32, state: &str, range: &DateRange) -> String {
        format!(
            r#"/results/{:02}/{}/{}[^"'<>\s]*\.shtml"#,
            year.rem_euclid(100),
            regex::escape(state),
            range.alternation("%b%-d_")
        )
    }

    fn extract_lines(&self, markup: &str, matcher: &NameMatcher) -> Result<(MatchedRows, String)> {
        let block = locate_result_block(markup, FormatHint::Preformatted)
            .ok_or_else(|| RrError::parse("no <pre> results block"))?;
        let rows = matching_lines(block_lines(&block), matcher);
        Ok((MatchedRows::Lines(rows), locator::banner(&block)))
    }

    fn extract_table(&self, markup: &str, matcher: &NameMatcher) -> Result<MatchedRows> {
        let Some(Block::StructuredTable { header_row, data_rows }) =
            locate_result_block(markup, FormatHint::Table(TableHint::Largest { min_rows: 2 }))
        else {
            return Err(RrError::parse("no results table"));
        };
        let rows = data_rows
            .into_iter()
            .filter(|r| r.len() >= 3 && matcher.matches(&r[1]))
            .collect();
        Ok(MatchedRows::Table { header: Some(header_row), rows })
    }
}

impl SourceAdapter for CoolRunning {
    fn name(&self) -> &'static str {
        "coolrunning"
    }

    fn site(&self) -> &'static str {
        "Coolrunning"
    }

    fn discover(&self, fetch: &mut dyn Fetch, range: &DateRange) -> Result<Vec<CandidateRaceRef>> {
        let mut out = Vec::new();
        for year in range.years() {
            for state in &self.states {
                let re = compile(&Self::race_pattern(year, state, range))?;
                let master = Self::master_url(year, state);
                logf!("Processing {state} ({master})");
                let markup = fetch.get(&master)?;
                merge_candidates(&mut out, collect_links(&markup, &re, |p| format!("{COOLRUNNING_BASE}{p}")));
            }
        }
        Ok(out)
    }

    fn extract(&self, page: &RacePage, matcher: Option<&NameMatcher>) -> Result<Option<ResultFragment>> {
        let matcher = require_matcher(matcher)?;
        let author = locator::author_identifier(&page.markup)?;

        let (rows, banner) = match classify_vendor(&author) {
            VendorFormat::Denylisted => {
                logf!("Skipping {author:?} results (layout not supported)");
                return Ok(None);
            }
            VendorFormat::Tabular => {
                logd!("{author:?}: table layout");
                (self.extract_table(&page.markup, matcher)?, s!())
            }
            VendorFormat::Preformatted => {
                logd!("{author:?}: plain-text layout");
                self.extract_lines(&page.markup, matcher)?
            }
            VendorFormat::Unknown => {
                logw!("Unknown results producer {author:?}, trying plain-text layout");
                self.extract_lines(&page.markup, matcher)?
            }
        };

        // Headings are only demanded of pages that produced something.
        let Some(fragment) = ResultFragment::new(s!(), rows) else {
            return Ok(None);
        };
        let name = first_heading(&page.markup, "h1").ok_or_else(|| RrError::parse("no <h1> race name"))?;
        let place = first_heading(&page.markup, "h2").ok_or_else(|| RrError::parse("no <h2> location/date"))?;

        Ok(Some(
            ResultFragment { title: name, ..fragment }
                .with_subtitle(place)
                .with_provenance(page.url.as_deref(), self.site())
                .with_banner(banner),
        ))
    }

    /// `Dec9_Jingle_set1.shtml` links `./Dec9_Jingle_set2.shtml`, `./Dec9_Jingle_set3.shtml`, …
    fn secondary_links(&self, page: &RacePage) -> Vec<String> {
        let Some(url) = page.url.as_deref() else {
            return Vec::new();
        };
        let own = file_name(url);
        let stem = own.rsplit_once('.').map_or(own, |(s, _)| s);
        let mut chars = stem.chars();
        chars.next_back();
        let base = chars.as_str();
        if base.is_empty() {
            return Vec::new();
        }

        let Ok(re) = compile(&format!(r#"href\s*=\s*["']?(\./{}\d+\.shtml)"#, regex::escape(base))) else {
            return Vec::new();
        };
        let mut out: Vec<String> = Vec::new();
        for cap in re.captures_iter(&page.markup) {
            let link = join_url(url, &cap[1]);
            if file_name(&link) != own && !out.contains(&link) {
                out.push(link);
            }
        }
        out
    }
}
