// src/specs/active.rs
//! Active.com results (results.active.com).
//!
//! Races are found with the site's geographic search. Each event page lists its
//! sub-events (marathon, half, 8K, …) in a `<nav>`; the first entry is the
//! overview itself. A sub-event either offers a CSV export through
//! `form#table_search`, or embeds the raw results file as `<pre id="…">`.

use reqwest::Url;
use scraper::Html;

use super::{matching_lines, require_matcher};
use super::{CandidateRaceRef, RacePage, SourceAdapter};
use crate::config::consts::{ACTIVE_BASE, ACTIVE_CSV_SUFFIX};
use crate::core::net::join_url;
use crate::core::sanitize::normalize_ws;
use crate::core::{tidy, Fetch};
use crate::dates::DateRange;
use crate::error::{Result, RrError};
use crate::fragment::{MatchedRows, ResultFragment};
use crate::locator::{block_lines, locate_result_block, title_text, FormatHint};
use crate::matcher::NameMatcher;

/// CSV column holding the runner's name.
const CSV_NAME_COLUMN: usize = 2;

pub struct Active {
    location: String,
    radius: u32,
}

impl Active {
    pub fn new(location: String, radius: u32) -> Self {
        Self { location: s!(location.trim()), radius }
    }

    pub fn search_url(&self, range: &DateRange) -> Result<String> {
        let start = range.start().format("%Y-%m-%d").to_string();
        let stop = range.stop().format("%Y-%m-%d").to_string();
        let radius = self.radius.to_string();
        let url = Url::parse_with_params(
            &format!("{ACTIVE_BASE}/search"),
            &[
                ("utf8", "\u{2713}"),
                ("search[query]", ""),
                ("search[source]", "event"),
                ("search[location]", self.location.as_str()),
                ("search[radius]", radius.as_str()),
                ("search[start_date]", start.as_str()),
                ("search[end_date]", stop.as_str()),
            ],
        )
        .map_err(|e| RrError::config(format!("search URL: {e}")))?;
        Ok(url.to_string())
    }
}

/// Event links on a search result page.
pub fn search_events(markup: &str) -> Vec<CandidateRaceRef> {
    let doc = Html::parse_document(markup);
    let mut out: Vec<CandidateRaceRef> = Vec::new();
    for div in doc.select(selector!("div.result-title")) {
        let Some(a) = div.select(selector!("a[href]")).next() else { continue };
        let Some(href) = a.value().attr("href") else { continue };
        let url = join_url(ACTIVE_BASE, href);
        if !out.iter().any(|c| c.url == url) {
            out.push(CandidateRaceRef::named(url, &normalize_ws(&a.text().collect::<String>())));
        }
    }
    out
}

/// Sub-event links of an event page, overview excluded.
pub fn sub_events(event_url: &str, markup: &str) -> Vec<CandidateRaceRef> {
    let doc = Html::parse_document(markup);
    let Some(nav) = doc.select(selector!("nav")).next() else {
        return Vec::new();
    };
    nav.select(selector!("a[href]"))
        .skip(1)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            Some(CandidateRaceRef::named(join_url(event_url, href), &normalize_ws(&a.text().collect::<String>())))
        })
        .collect()
}

/// Where the CSV export of a sub-event page lives, if it has one.
pub fn csv_export_url(markup: &str) -> Option<String> {
    let doc = Html::parse_document(markup);
    let form = doc.select(selector!("form#table_search")).next()?;
    let action = form.value().attr("action")?;
    Some(format!("{}{ACTIVE_CSV_SUFFIX}", join_url(ACTIVE_BASE, action)))
}

/// Matching CSV records, plus the header record when anything matched.
fn csv_rows(text: &str, matcher: &NameMatcher) -> Result<MatchedRows> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let cells: Vec<String> = rec.iter().map(|c| s!(c.trim())).collect();
        if header.is_none() {
            header = Some(cells);
            continue;
        }
        if cells.get(CSV_NAME_COLUMN).is_some_and(|name| matcher.matches(name)) {
            rows.push(cells);
        }
    }
    Ok(MatchedRows::Table { header, rows })
}

impl SourceAdapter for Active {
    fn name(&self) -> &'static str {
        "active"
    }

    fn site(&self) -> &'static str {
        "Active.com"
    }

    fn discover(&self, fetch: &mut dyn Fetch, range: &DateRange) -> Result<Vec<CandidateRaceRef>> {
        let search = self.search_url(range)?;
        logd!("Searching {search}");
        let listing = fetch.get(&search)?;

        let mut out: Vec<CandidateRaceRef> = Vec::new();
        for event in search_events(&listing) {
            logf!("Looking at {:?}", event.display_name);
            let page = match fetch.get(&event.url) {
                Ok(p) => p,
                Err(e) if e.is_recoverable() => {
                    logw!("Skipping event {}: {e}", event.url);
                    continue;
                }
                Err(e) => return Err(e),
            };
            for sub in sub_events(&event.url, &page) {
                if !out.iter().any(|c| c.url == sub.url) {
                    logd!("Sub-event {:?}", sub.display_name);
                    out.push(sub);
                }
            }
        }
        Ok(out)
    }

    fn fetch_race(&self, fetch: &mut dyn Fetch, candidate: &CandidateRaceRef) -> Result<RacePage> {
        let markup = tidy(&fetch.get(&candidate.url)?);
        let attachment = match csv_export_url(&markup) {
            Some(csv_url) => {
                logd!("Downloading {csv_url}");
                Some(fetch.get(&csv_url)?)
            }
            None => None,
        };
        Ok(RacePage { url: Some(candidate.url.clone()), markup, attachment })
    }

    fn extract(&self, page: &RacePage, matcher: Option<&NameMatcher>) -> Result<Option<ResultFragment>> {
        let matcher = require_matcher(matcher)?;

        let rows = match &page.attachment {
            Some(csv_text) => csv_rows(csv_text, matcher)?,
            None => {
                let block = locate_result_block(&page.markup, FormatHint::PreformattedWithId)
                    .ok_or_else(|| RrError::parse("neither a CSV export nor a raw results block"))?;
                MatchedRows::Lines(matching_lines(block_lines(&block), matcher))
            }
        };

        let title = title_text(&page.markup).unwrap_or_else(|| s!("Unknown"));
        Ok(ResultFragment::new(title, rows).map(|f| f.with_provenance(page.url.as_deref(), self.site())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::Boundary;
    use crate::roster::Member;
    use chrono::NaiveDate;

    fn matcher() -> NameMatcher {
        NameMatcher::build(&[Member::new("Paul", "Smith")], Boundary::Word).unwrap()
    }

    #[test]
    fn search_url_encodes_brackets_and_location() {
        let d = NaiveDate::from_ymd_opt(2012, 12, 1).unwrap();
        let r = DateRange::new(d, d.succ_opt().unwrap()).unwrap();
        let url = Active::new(s!("Boston, MA"), 100).search_url(&r).unwrap();
        assert!(url.starts_with("http://results.active.com/search?utf8=%E2%9C%93"));
        assert!(url.contains("search%5Blocation%5D=Boston%2C+MA"));
        assert!(url.contains("search%5Bstart_date%5D=2012-12-01"));
        assert!(url.contains("search%5Bend_date%5D=2012-12-02"));
    }

    #[test]
    fn csv_keeps_header_and_matching_rows() {
        let csv = "Place,Bib,Name,Time\n1,101,Joe Fast,16:00\n7,212,\"Smith, Paul\",19:30\n";
        let MatchedRows::Table { header, rows } = csv_rows(csv, &matcher()).unwrap() else {
            panic!("expected a table");
        };
        assert_eq!(header.unwrap(), vec!["Place", "Bib", "Name", "Time"]);
        assert_eq!(rows, vec![vec!["7", "212", "Smith, Paul", "19:30"]]);
    }

    #[test]
    fn nav_skips_overview() {
        let html = r#"<nav><div><a href="/events/1">Overview</a></div><div><a href="/events/1/marathon">Marathon</a></div><div><a href="/events/1/8k">8K</a></div></nav>"#;
        let subs = sub_events("http://results.active.com/events/1", html);
        let urls: Vec<_> = subs.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, vec!["http://results.active.com/events/1/marathon", "http://results.active.com/events/1/8k"]);
    }

    #[test]
    fn csv_export_from_form() {
        let html = r#"<form accept-charset="UTF-8" action="/events/ho-ho-5k/5k" id="table_search" method="get"></form>"#;
        assert_eq!(
            csv_export_url(html).as_deref(),
            Some("http://results.active.com/events/ho-ho-5k/5k.csv?per_page=100000")
        );
    }

    #[test]
    fn raw_pre_fallback() {
        let page = RacePage::local(tidy(
            "<title>Jingle 5K</title><pre id=\"raw-file\">Place Name\n  1 Joe Fast\n  9 Paul Smith</pre>",
        ));
        let f = Active::new(s!("x"), 1).extract(&page, Some(&matcher())).unwrap().unwrap();
        assert_eq!(f.title, "Jingle 5K");
        assert_eq!(f.rows, MatchedRows::Lines(vec![s!("  9 Paul Smith")]));
        assert!(f.provenance.is_none());
    }
}
