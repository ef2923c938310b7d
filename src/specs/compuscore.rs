// src/specs/compuscore.rs
//! CompuScore (compuscore.com).
//!
//! Races are filed by month folder (`cs2012/novdec/index.htm`) with no date in
//! the race URL, so every race in the folder is downloaded and the date is read
//! from the page itself (`Race Date:11-03-12`).

use chrono::{Datelike, NaiveDate};

use super::{collect_links, compile, inline_banner, matching_lines, merge_candidates, require_matcher};
use super::{CandidateRaceRef, RacePage, SourceAdapter};
use crate::config::consts::{compuscore_month_folder, COMPUSCORE_BASE, COMPUSCORE_RACE_HOST};
use crate::core::Fetch;
use crate::dates::DateRange;
use crate::error::Result;
use crate::fragment::{MatchedRows, ResultFragment};
use crate::locator::{block_lines, first_heading, locate_result_block, title_text, FormatHint};
use crate::matcher::NameMatcher;

pub struct CompuScore;

impl CompuScore {
    pub fn master_url(year: i32, month: u32) -> String {
        format!("{COMPUSCORE_BASE}/cs{year}/{}/index.htm", compuscore_month_folder(month))
    }

    pub fn race_pattern(year: i32, month: u32) -> String {
        format!(
            r"{}/cs{year}/{}/\w+\.htm",
            regex::escape(COMPUSCORE_RACE_HOST),
            compuscore_month_folder(month)
        )
    }

    /// Month folders touched by `range`, in order, each once.
    fn folders(range: &DateRange) -> Vec<(i32, u32)> {
        let mut out: Vec<(i32, u32)> = Vec::new();
        for day in range.days() {
            let (y, m) = (day.year(), day.month());
            let same_folder =
                |&(py, pm): &(i32, u32)| py == y && compuscore_month_folder(pm) == compuscore_month_folder(m);
            if !out.iter().any(same_folder) {
                out.push((y, m));
            }
        }
        out
    }
}

/// `Race Date:11-03-12` → 2012-11-03.
pub fn race_date(markup: &str) -> Option<NaiveDate> {
    let c = regex!(r"Race\s*Date:\s*(\d{1,2})-(\d{1,2})-(\d{2})").captures(markup)?;
    let month: u32 = c[1].parse().ok()?;
    let day: u32 = c[2].parse().ok()?;
    let yy: i32 = c[3].parse().ok()?;
    NaiveDate::from_ymd_opt(2000 + yy, month, day)
}

impl SourceAdapter for CompuScore {
    fn name(&self) -> &'static str {
        "compuscore"
    }

    fn site(&self) -> &'static str {
        "Compuscore"
    }

    fn discover(&self, fetch: &mut dyn Fetch, range: &DateRange) -> Result<Vec<CandidateRaceRef>> {
        let mut out = Vec::new();
        for (year, month) in Self::folders(range) {
            let master = Self::master_url(year, month);
            logf!("Downloading master file {master}");
            let markup = fetch.get(&master)?;
            let re = compile(&Self::race_pattern(year, month))?;
            merge_candidates(&mut out, collect_links(&markup, &re, |u| s!(u)));
        }
        Ok(out)
    }

    /// Pages without a readable date are kept.
    fn accepts(&self, page: &RacePage, range: &DateRange) -> bool {
        match race_date(&page.markup) {
            Some(d) => range.contains(d),
            None => {
                logd!("No race date in {}, keeping it", page.url.as_deref().unwrap_or("page"));
                true
            }
        }
    }

    fn extract(&self, page: &RacePage, matcher: Option<&NameMatcher>) -> Result<Option<ResultFragment>> {
        let matcher = require_matcher(matcher)?;

        // Older pages have no <pre>; scan the whole document then.
        let rows = match locate_result_block(&page.markup, FormatHint::Preformatted) {
            Some(block) => matching_lines(block_lines(&block), matcher),
            None => matching_lines(page.markup.lines(), matcher),
        };

        let title = first_heading(&page.markup, "h2")
            .or_else(|| title_text(&page.markup))
            .unwrap_or_else(|| s!("Unknown"));
        let Some(mut fragment) = ResultFragment::new(title, MatchedRows::Lines(rows)) else {
            return Ok(None);
        };

        if let Some(d) = race_date(&page.markup) {
            fragment = fragment.with_subtitle(d.format("Race Date:  %b %d, %Y").to_string());
        }
        if let Some(b) = inline_banner(
            &page.markup,
            regex!(r"(?s)<strong>[^<>]*</strong>\s*<strong><u>[^<>]*</u></strong>"),
        ) {
            fragment = fragment.with_banner(b);
        }
        Ok(Some(fragment.with_provenance(page.url.as_deref(), self.site())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reads_race_date() {
        assert_eq!(race_date("<h3>    Race Date:11-03-12   </h3>"), Some(ymd(2012, 11, 3)));
        assert_eq!(race_date("Race Date:13-45-12"), None);
        assert_eq!(race_date("no date here"), None);
    }

    #[test]
    fn unparsable_date_fails_open() {
        let r = DateRange::new(ymd(2012, 11, 3), ymd(2012, 11, 3)).unwrap();
        let undated = RacePage::local(s!("<html><body><pre> 1 x</pre></body></html>"));
        assert!(CompuScore.accepts(&undated, &r));

        let late = RacePage::local(s!("<h3>Race Date:11-04-12</h3>"));
        assert!(!CompuScore.accepts(&late, &r));
    }

    #[test]
    fn janfeb_share_a_folder() {
        let r = DateRange::new(ymd(2013, 1, 30), ymd(2013, 3, 1)).unwrap();
        assert_eq!(CompuScore::folders(&r), vec![(2013, 1), (2013, 3)]);
        assert_eq!(CompuScore::master_url(2013, 2), "http://compuscore.com/cs2013/janfeb/index.htm");
    }

    #[test]
    fn race_pattern_in_folder() {
        let re = regex::Regex::new(&CompuScore::race_pattern(2012, 11)).unwrap();
        assert!(re.is_match("http://www.compuscore.com/cs2012/novdec/turkey.htm"));
        assert!(!re.is_match("http://www.compuscore.com/cs2012/october/turkey.htm"));
    }
}
