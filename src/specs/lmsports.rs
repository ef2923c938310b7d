// src/specs/lmsports.rs
//! L&M Computer Sports (lmsports.com).
//!
//! A yearly index lists races with their dates spelled out:
//!
//! ```text
//! <a href="trail13.htm">Trail of Two Cities 5k Run</a> - Saturday, November 2, 2013 - OC/Somers Point, NJ -
//! ```
//!
//! Race pages are text with an `age … =====` column header. Rows are sometimes
//! written `60.FirstName LastName`, so names may follow a dot.

use chrono::NaiveDate;

use super::{matching_lines, require_matcher};
use super::{CandidateRaceRef, RacePage, SourceAdapter};
use crate::config::consts::LMSPORTS_BASE;
use crate::core::html::{strip_tags, strip_tags_keep_ws};
use crate::core::net::join_url;
use crate::core::sanitize::normalize_entities;
use crate::core::Fetch;
use crate::dates::DateRange;
use crate::error::{Result, RrError};
use crate::fragment::{MatchedRows, ResultFragment};
use crate::locator::title_text;
use crate::matcher::{Boundary, NameMatcher};

pub struct LmSports;

impl LmSports {
    pub fn master_url(year: i32) -> String {
        format!("{LMSPORTS_BASE}results{:02}.htm", year.rem_euclid(100))
    }
}

/// Every dated race entry on an index page.
pub fn index_entries(markup: &str) -> Vec<CandidateRaceRef> {
    let re = regex!(
        r#"(?is)<a\s+href\s*=\s*"(\w*?\d\d\.htm)"\s*>\s*([^<]*?)\s*</a>\s*-\s*[A-Z][a-z]*,\s*([A-Za-z]+)\s+(\d{1,2}),\s+(\d{4})\s*-"#
    );
    let mut out = Vec::new();
    for c in re.captures_iter(markup) {
        let name = normalize_entities(&strip_tags(&c[2]));
        let text = format!("{} {} {}", &c[3], &c[4], &c[5]);
        let Ok(date) = NaiveDate::parse_from_str(&text, "%B %d %Y") else {
            logd!("Unreadable date {text:?} for {name}");
            continue;
        };
        out.push(CandidateRaceRef::named(join_url(LMSPORTS_BASE, &c[1]), &name).dated(date));
    }
    out
}

/// The `age … =====` header block.
fn banner(markup: &str) -> Option<String> {
    let c = regex!(r"(?s)\n([ \t]*age.*?=====)\r?\n").captures(markup)?;
    Some(normalize_entities(&strip_tags_keep_ws(&c[1])))
}

impl SourceAdapter for LmSports {
    fn name(&self) -> &'static str {
        "lmsports"
    }

    fn site(&self) -> &'static str {
        "L&M Sports"
    }

    fn boundary(&self) -> Boundary {
        Boundary::Dotted
    }

    fn discover(&self, fetch: &mut dyn Fetch, range: &DateRange) -> Result<Vec<CandidateRaceRef>> {
        let mut out: Vec<CandidateRaceRef> = Vec::new();
        for year in range.years() {
            let master = Self::master_url(year);
            logf!("Downloading {master}");
            let markup = fetch.get(&master)?;
            for entry in index_entries(&markup) {
                let in_range = entry.discovered_date.is_some_and(|d| range.contains(d));
                if !in_range {
                    logd!("Skipping {}", entry.display_name);
                    continue;
                }
                if !out.iter().any(|c| c.url == entry.url) {
                    out.push(entry);
                }
            }
        }
        Ok(out)
    }

    fn extract(&self, page: &RacePage, matcher: Option<&NameMatcher>) -> Result<Option<ResultFragment>> {
        let matcher = require_matcher(matcher)?;
        let rows = matching_lines(page.markup.lines(), matcher);
        let Some(fragment) = ResultFragment::new(s!(), MatchedRows::Lines(rows)) else {
            return Ok(None);
        };

        let title = title_text(&page.markup).ok_or_else(|| RrError::parse("no <title>"))?;
        let mut fragment = ResultFragment { title, ..fragment }.with_provenance(page.url.as_deref(), self.site());
        match banner(&page.markup) {
            Some(b) => fragment = fragment.with_banner(b),
            None => logd!("No age/===== banner in {}", fragment.title),
        }
        Ok(Some(fragment))
    }
}
