// src/specs/generic.rs
//! Result files of unknown origin, read from disk.
//!
//! No structure is assumed: every line of the document is a candidate row.
//! Names must stand between whitespace, which keeps markup attributes and
//! hyphenated neighbours from matching.

use super::{matching_lines, require_matcher};
use super::{CandidateRaceRef, RacePage, SourceAdapter};
use crate::core::Fetch;
use crate::dates::DateRange;
use crate::error::{Result, RrError};
use crate::fragment::{MatchedRows, ResultFragment};
use crate::locator::title_text;
use crate::matcher::{Boundary, NameMatcher};

pub struct Generic;

impl SourceAdapter for Generic {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn site(&self) -> &'static str {
        "the web"
    }

    fn boundary(&self) -> Boundary {
        Boundary::Whitespace
    }

    fn discover(&self, _fetch: &mut dyn Fetch, _range: &DateRange) -> Result<Vec<CandidateRaceRef>> {
        Err(RrError::config("generic results are read from local files only (--rl)"))
    }

    fn extract(&self, page: &RacePage, matcher: Option<&NameMatcher>) -> Result<Option<ResultFragment>> {
        let matcher = require_matcher(matcher)?;
        let rows = matching_lines(page.markup.lines(), matcher);
        let title = title_text(&page.markup).unwrap_or_else(|| s!("Unknown"));
        Ok(ResultFragment::new(title, MatchedRows::Lines(rows)).map(|f| f.with_provenance(page.url.as_deref(), self.site())))
    }
}
