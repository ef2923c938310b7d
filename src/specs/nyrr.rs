// src/specs/nyrr.rs
//! New York Road Runners (web2.nyrrc.org results archive).
//!
//! Nothing here is reachable by plain GET. The archive form is POSTed for the
//! year's race list, then each race's search form is POSTed with the club's team
//! code, all in one cookie session. NYRR does the name matching: every row of
//! the team search belongs to the club, so no roster is involved.

use chrono::NaiveDate;
use scraper::{ElementRef, Html};

use super::{CandidateRaceRef, RacePage, SourceAdapter};
use crate::config::consts::{NYRR_ARCHIVE_URL, NYRR_HOME, NYRR_MAX_ROWS, NYRR_RESULT_URL_BASE};
use crate::core::html::{attr_value, openers_ci};
use crate::core::net::join_url;
use crate::core::sanitize::normalize_ws;
use crate::core::{tidy, Fetch};
use crate::dates::DateRange;
use crate::error::{Result, RrError};
use crate::fragment::{MatchedRows, ResultFragment};
use crate::locator::{locate_result_block, Block, FormatHint, TableHint};
use crate::matcher::NameMatcher;

const NO_MATCH: &str = "Your search returns no match.";

pub struct Nyrr {
    team: String,
}

impl Nyrr {
    pub fn new(team: String) -> Result<Self> {
        let team = team.trim().to_ascii_uppercase();
        if team.is_empty() {
            return Err(RrError::config("NYRR needs a team code, e.g. RARI"));
        }
        Ok(Self { team })
    }

    fn team_search_params(&self) -> Vec<(&str, &str)> {
        vec![
            ("search.method", "search.team"),
            ("input.lname", ""),
            ("input.fname", ""),
            ("input.bib", ""),
            ("overalltype", "All"),
            ("input.agegroup.m", "12 to 19"),
            ("input.agegroup.f", "12 to 19"),
            ("teamgender", ""),
            ("team_code", self.team.as_str()),
            ("items.display", NYRR_MAX_ROWS),
            ("AESTIVACVNLIST", "overalltype,input.agegroup.m,input.agegroup.f,teamgender,team_code"),
        ]
    }
}

/// `action` of the first `<form>` whose `name` is `name` (any form when `None`).
fn form_action(markup: &str, name: Option<&str>) -> Option<String> {
    openers_ci(markup, "form")
        .into_iter()
        .find(|tag| match name {
            Some(n) => attr_value(tag, "name").is_some_and(|v| v.eq_ignore_ascii_case(n)),
            None => true,
        })
        .and_then(|tag| attr_value(tag, "action"))
}

/// Race links on the archive listing: `<a href="…startup.html…">Name</a> 11/03/12`.
pub fn archive_races(markup: &str) -> Vec<CandidateRaceRef> {
    let doc = Html::parse_document(markup);
    let mut out: Vec<CandidateRaceRef> = Vec::new();
    for a in doc.select(selector!("a[href]")) {
        let Some(href) = a.value().attr("href") else { continue };
        if !href.contains(NYRR_RESULT_URL_BASE) {
            continue;
        }
        let name = normalize_ws(&a.text().collect::<String>());
        let tail = a
            .next_sibling()
            .and_then(|n| n.value().as_text().map(|t| t.trim().to_string()))
            .unwrap_or_default();
        let Ok(date) = NaiveDate::parse_from_str(&tail, "%m/%d/%y") else {
            logd!("No date after {name:?} ({tail:?})");
            continue;
        };
        if !out.iter().any(|c| c.url == href) {
            out.push(CandidateRaceRef::named(href, &name).dated(date));
        }
    }
    out
}

fn cell_spans(meta: ElementRef) -> Vec<String> {
    let Some(td) = meta.select(selector!("td:nth-child(3)")).next() else {
        return Vec::new();
    };
    td.select(selector!("span"))
        .map(|s| normalize_ws(&s.text().collect::<String>()))
        .filter(|t| !t.is_empty())
        .collect()
}

impl SourceAdapter for Nyrr {
    fn name(&self) -> &'static str {
        "nyrr"
    }

    fn site(&self) -> &'static str {
        "New York Road Runners"
    }

    fn uses_roster(&self) -> bool {
        false
    }

    fn discover(&self, fetch: &mut dyn Fetch, range: &DateRange) -> Result<Vec<CandidateRaceRef>> {
        let archive = fetch.get(NYRR_ARCHIVE_URL)?;
        let action = form_action(&archive, Some("findOtherRaces"))
            .ok_or_else(|| RrError::parse("results archive has no findOtherRaces form"))?;
        let action = join_url(NYRR_ARCHIVE_URL, &action);

        let mut out: Vec<CandidateRaceRef> = Vec::new();
        for year in range.years() {
            let year = year.to_string();
            let listing = fetch.post(&action, &[("NYRRYEAR", year.as_str()), ("AESTIVACVNLIST", "NYRRYEAR")])?;
            for race in archive_races(&listing) {
                let keep = race.discovered_date.is_some_and(|d| range.contains(d));
                if !keep {
                    logd!("Skipping {}", race.display_name);
                } else if !out.iter().any(|c| c.url == race.url) {
                    logf!("Keeping {}", race.display_name);
                    out.push(race);
                }
            }
        }
        Ok(out)
    }

    /// Event page → its search form → team search result.
    fn fetch_race(&self, fetch: &mut dyn Fetch, candidate: &CandidateRaceRef) -> Result<RacePage> {
        let event = fetch.get(&candidate.url)?;
        let action = form_action(&event, None)
            .ok_or_else(|| RrError::parse(format!("no search form on {}", candidate.url)))?;
        let action = join_url(&candidate.url, &action);
        let result = fetch.post(&action, &self.team_search_params())?;
        Ok(RacePage::fetched(&candidate.url, tidy(&result)))
    }

    fn extract(&self, page: &RacePage, _matcher: Option<&NameMatcher>) -> Result<Option<ResultFragment>> {
        if page.markup.contains(NO_MATCH) {
            logd!("No {} finishers", self.team);
            return Ok(None);
        }

        let doc = Html::parse_document(&page.markup);
        let tables: Vec<ElementRef> = doc.select(selector!("table")).collect();
        if tables.len() < 4 {
            return Err(RrError::parse(format!("expected 4 tables, found {}", tables.len())));
        }

        // 2nd table: race name, listing title, distance/time/location
        let spans = cell_spans(tables[1]);
        let title = spans.first().cloned().ok_or_else(|| RrError::parse("no race name"))?;
        let subtitle = spans[1..].join(" - ");

        let Some(Block::StructuredTable { header_row, data_rows }) =
            locate_result_block(&page.markup, FormatHint::Table(TableHint::Nth(3)))
        else {
            return Err(RrError::parse("empty results table"));
        };
        let rows = MatchedRows::Table { header: Some(header_row), rows: data_rows };

        Ok(ResultFragment::new(title, rows).map(|f| {
            f.with_subtitle(subtitle).with_provenance(Some(NYRR_HOME), self.site())
        }))
    }
}
