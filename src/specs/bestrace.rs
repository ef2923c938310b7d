// src/specs/bestrace.rs
//! BestRace (bestrace.com).
//!
//! The yearly schedule page links every race as
//! `http://www.bestrace.com/results/12/121202SB5.HTM`: the race date is the
//! `yymmdd` prefix of the file name. Results are one `<pre>` of fixed-width text
//! whose column header is inline markup (`<b>… <u>…</u></b>`).

use super::{collect_links, compile, inline_banner, matching_lines, merge_candidates, require_matcher};
use super::{CandidateRaceRef, RacePage, SourceAdapter};
use crate::config::consts::BESTRACE_BASE;
use crate::core::Fetch;
use crate::dates::DateRange;
use crate::error::{Result, RrError};
use crate::fragment::{MatchedRows, ResultFragment};
use crate::locator::{self, block_lines, locate_result_block, FormatHint};
use crate::matcher::NameMatcher;

pub struct BestRace;

impl BestRace {
    pub fn master_url(year: i32) -> String {
        format!("{BESTRACE_BASE}/{year}schedule.html")
    }

    /// `http://www.bestrace.com/results/yy/(?:yymmdd|…)\w+\.HTM`
    pub fn race_pattern(range: &DateRange) -> String {
        format!(
            r"{}/results/\d\d/{}\w+\.(?i:htm)",
            regex::escape(BESTRACE_BASE),
            range.alternation("%y%m%d")
        )
    }
}

/// `<title> Purple Stride 5K - November 10, 2013 </title>` → `Purple Stride 5K`
fn race_title(markup: &str) -> String {
    let Some(title) = locator::title_text(markup) else {
        return s!("Unknown");
    };
    let dated = regex!(r"^(.*?)\s*-\s*[A-Za-z]+\s+\d{1,2},\s*\d{4}$");
    match dated.captures(&title) {
        Some(c) if !c[1].trim().is_empty() => s!(c[1].trim()),
        _ => title,
    }
}

impl SourceAdapter for BestRace {
    fn name(&self) -> &'static str {
        "bestrace"
    }

    fn site(&self) -> &'static str {
        "BestRace"
    }

    fn discover(&self, fetch: &mut dyn Fetch, range: &DateRange) -> Result<Vec<CandidateRaceRef>> {
        let re = compile(&Self::race_pattern(range))?;
        logd!("BestRace race pattern: {}", re.as_str());

        let mut out = Vec::new();
        for year in range.years() {
            let master = Self::master_url(year);
            logf!("Downloading {master}");
            let markup = fetch.get(&master)?;
            merge_candidates(&mut out, collect_links(&markup, &re, |u| s!(u)));
        }
        Ok(out)
    }

    fn extract(&self, page: &RacePage, matcher: Option<&NameMatcher>) -> Result<Option<ResultFragment>> {
        let matcher = require_matcher(matcher)?;
        let block = locate_result_block(&page.markup, FormatHint::Preformatted)
            .ok_or_else(|| RrError::parse("no <pre> results block"))?;

        let rows = matching_lines(block_lines(&block), matcher);
        let Some(fragment) = ResultFragment::new(race_title(&page.markup), MatchedRows::Lines(rows)) else {
            return Ok(None);
        };

        let banner = inline_banner(&page.markup, regex!(r"(?is)<b>[^<>]*<u>[^<>]*</u>\s*</b>"))
            .unwrap_or_else(|| locator::banner(&block));

        Ok(Some(
            fragment
                .with_provenance(page.url.as_deref(), self.site())
                .with_banner(banner),
        ))
    }
}
