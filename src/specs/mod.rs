// src/specs/mod.rs
//! # Site adapters
//!
//! One module per results site family. Each adapter knows where that site
//! lists its races, how to turn a race page into matched rows, and what the
//! site calls itself in the provenance line.
//!
//! ## What lives here
//! - **Discovery**: reading a site's master/index page(s) and picking the race
//!   URLs inside the run's [`DateRange`]. Dates embedded in URLs are matched with
//!   [`DateRange::alternation`], never compared numerically.
//! - **Extraction**: locating the results block ([`crate::locator`]), matching
//!   lines or rows against the roster, shaping a [`ResultFragment`].
//! - **Site quirks**: vendor dispatch (CoolRunning), multi-step form search with
//!   cookies (NYRR), CSV exports (Active.com), dates hidden in the body
//!   (CompuScore).
//!
//! ## What does **not** live here
//! - Looping over candidates, error recovery, chunk following: `runner`.
//! - Writing the report: `report`.
//! - HTTP plumbing: adapters only see the [`Fetch`] trait, so fixtures can
//!   stand in for the network.
//!
//! ## Conventions
//! - `extract` returns `Ok(None)` when no row matched; it never produces an
//!   empty fragment.
//! - A page without the expected structure is `RrError::Parse`; the runner logs
//!   it and moves on. The same error from `discover` ends the run.
//! - Matching runs on the tag-stripped, entity-decoded text of a line, and that
//!   text (not the raw markup) is what lands in the report.
//! - Pages reach `extract` already tidied.

pub mod active;
pub mod bestrace;
pub mod compuscore;
pub mod coolrunning;
pub mod generic;
pub mod lmsports;
pub mod nyrr;

use chrono::NaiveDate;
use regex::Regex;

use crate::config::options::{SourceKind, SourceParams};
use crate::core::html::strip_tags_keep_ws;
use crate::core::net::{file_name, Fetch};
use crate::core::sanitize::{normalize_entities, plain_line};
use crate::core::tidy;
use crate::dates::DateRange;
use crate::error::{Result, RrError};
use crate::fragment::ResultFragment;
use crate::matcher::{Boundary, NameMatcher};

/// A race URL found during discovery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateRaceRef {
    pub url: String,
    pub display_name: String,
    pub discovered_date: Option<NaiveDate>,
}

impl CandidateRaceRef {
    /// Candidate named after its file, e.g. `121202SB5.HTM`.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let display_name = s!(file_name(&url));
        Self { url, display_name, discovered_date: None }
    }

    pub fn named(url: impl Into<String>, name: &str) -> Self {
        Self { display_name: s!(name.trim()), ..Self::new(url) }
    }

    pub fn dated(mut self, date: NaiveDate) -> Self {
        self.discovered_date = Some(date);
        self
    }
}

/// A race page ready for extraction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RacePage {
    /// Where it came from; `None` for local files.
    pub url: Option<String>,
    /// Tidied markup.
    pub markup: String,
    /// Auxiliary download that travels with the page (Active.com CSV export).
    pub attachment: Option<String>,
}

impl RacePage {
    pub fn fetched(url: &str, markup: String) -> Self {
        Self { url: Some(s!(url)), markup, attachment: None }
    }

    pub fn local(markup: String) -> Self {
        Self { url: None, markup, attachment: None }
    }
}

pub trait SourceAdapter {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Site name as printed in the provenance line.
    fn site(&self) -> &'static str;

    fn boundary(&self) -> Boundary {
        Boundary::Word
    }

    fn uses_roster(&self) -> bool {
        true
    }

    /// Race URLs inside `range`, first-seen order, no repeats.
    fn discover(&self, fetch: &mut dyn Fetch, range: &DateRange) -> Result<Vec<CandidateRaceRef>>;

    fn fetch_race(&self, fetch: &mut dyn Fetch, candidate: &CandidateRaceRef) -> Result<RacePage> {
        let raw = fetch.get(&candidate.url)?;
        Ok(RacePage::fetched(&candidate.url, tidy(&raw)))
    }

    /// Post-download date check for sites whose URLs carry no date.
    fn accepts(&self, _page: &RacePage, _range: &DateRange) -> bool {
        true
    }

    fn extract(&self, page: &RacePage, matcher: Option<&NameMatcher>) -> Result<Option<ResultFragment>>;

    /// Further pages of the same race (absolute URLs).
    fn secondary_links(&self, _page: &RacePage) -> Vec<String> {
        Vec::new()
    }
}

pub fn build_adapter(kind: SourceKind, params: &SourceParams) -> Result<Box<dyn SourceAdapter>> {
    let adapter: Box<dyn SourceAdapter> = match kind {
        SourceKind::Bestrace => Box::new(bestrace::BestRace),
        SourceKind::Coolrunning => Box::new(coolrunning::CoolRunning::new(params.states.clone())?),
        SourceKind::Compuscore => Box::new(compuscore::CompuScore),
        SourceKind::Lmsports => Box::new(lmsports::LmSports),
        SourceKind::Nyrr => {
            let team = params.team.clone().unwrap_or_default();
            Box::new(nyrr::Nyrr::new(team)?)
        }
        SourceKind::Active => {
            let location = params.location.clone().unwrap_or_default();
            Box::new(active::Active::new(location, params.radius))
        }
        SourceKind::Generic => Box::new(generic::Generic),
    };
    Ok(adapter)
}

/// The roster matcher, or a config error for adapters that cannot run without one.
pub(crate) fn require_matcher(matcher: Option<&NameMatcher>) -> Result<&NameMatcher> {
    matcher.ok_or_else(|| RrError::config("this source matches against a membership list"))
}

/// Plain text of every line that names a roster member.
pub(crate) fn matching_lines<'a, I>(lines: I, matcher: &NameMatcher) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .map(plain_line)
        .filter(|l| {
            if l.trim().is_empty() {
                return false;
            }
            match matcher.matching_member(l) {
                Some(m) => {
                    logd!("{} {}: {}", m.first_name, m.last_name, l.trim());
                    true
                }
                None => false,
            }
        })
        .collect()
}

/// Every match of `re` in `markup` resolved with `to_url`, deduplicated.
pub(crate) fn collect_links(markup: &str, re: &Regex, to_url: impl Fn(&str) -> String) -> Vec<CandidateRaceRef> {
    let mut out: Vec<CandidateRaceRef> = Vec::new();
    for m in re.find_iter(markup) {
        let url = to_url(m.as_str());
        if !out.iter().any(|c| c.url == url) {
            out.push(CandidateRaceRef::new(url));
        }
    }
    out
}

/// Append `more` to `acc`, skipping URLs already present.
pub(crate) fn merge_candidates(acc: &mut Vec<CandidateRaceRef>, more: Vec<CandidateRaceRef>) {
    for c in more {
        if !acc.iter().any(|a| a.url == c.url) {
            acc.push(c);
        }
    }
}

/// Banner written as inline markup (`<b>PLACE <u>NAME</u></b>`), flattened to text.
pub(crate) fn inline_banner(markup: &str, re: &Regex) -> Option<String> {
    let m = re.find(markup)?;
    let text = normalize_entities(&strip_tags_keep_ws(m.as_str()));
    if text.trim().is_empty() { None } else { Some(text) }
}

pub(crate) fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| RrError::config(format!("bad pattern {pattern:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Member;

    #[test]
    fn matching_lines_strip_markup() {
        let m = NameMatcher::build(&[Member::new("Mark", "Strawn")], Boundary::Word).unwrap();
        let lines = ["  1 Joe Fast   16:01", "  12 <a href=\"x\">MARK STRAWN</a>  19:40\r", ""];
        assert_eq!(matching_lines(lines, &m), vec!["  12 MARK STRAWN  19:40"]);
    }

    #[test]
    fn links_deduplicated_in_order() {
        let re = Regex::new(r"/r/\d+\.htm").unwrap();
        let got = collect_links("/r/2.htm /r/1.htm /r/2.htm", &re, |p| format!("http://h{p}"));
        let urls: Vec<_> = got.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(urls, vec!["http://h/r/2.htm", "http://h/r/1.htm"]);
        assert_eq!(got[0].display_name, "2.htm");
    }

    #[test]
    fn inline_banner_flattens_tags() {
        let re = Regex::new(r"(?is)<b>[^<>]*<u>[^<>]*</u>\s*</b>").unwrap();
        let got = inline_banner("<pre><b>Place  <u>Name&amp;Town</u></b>\n 1 x</pre>", &re);
        assert_eq!(got.as_deref(), Some("Place  Name&Town"));
    }

    #[test]
    fn every_source_builds() {
        let mut params = SourceParams::default();
        params.team = Some(s!("RARI"));
        params.location = Some(s!("Boston, MA"));
        for kind in [
            SourceKind::Bestrace,
            SourceKind::Coolrunning,
            SourceKind::Compuscore,
            SourceKind::Lmsports,
            SourceKind::Nyrr,
            SourceKind::Active,
            SourceKind::Generic,
        ] {
            let a = build_adapter(kind, &params).unwrap();
            assert_eq!(a.uses_roster(), kind.needs_roster());
        }
    }
}
