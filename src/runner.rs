// src/runner.rs
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::PathBuf;

use crate::{
    config::options::RunOptions,
    core::{net::{decode_body, file_name}, tidy, Fetch, Session},
    dates::DateRange,
    error::{Result, RrError},
    file::read_race_list,
    matcher::NameMatcher,
    progress::Progress,
    report::ReportAssembler,
    roster::load_roster,
    specs::{self, CandidateRaceRef, RacePage, SourceAdapter},
};

/// What a run did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Race pages looked at, follow-on chunks included.
    pub candidates: usize,
    /// Fragments written to the report.
    pub appended: usize,
    /// Pages with no club finishers, or outside the date window.
    pub skipped: usize,
    /// Pages dropped after a fetch or parse error.
    pub failed: usize,
}

enum Outcome {
    Appended,
    NoMatch,
    OutOfRange,
}

/// Top-level runner: validate, load the roster, then scrape the web or read
/// the race list.
/// `progress` can be None (no UI updates) or Some(&mut impl Progress).
pub fn run(options: &RunOptions, mut progress: Option<&mut dyn Progress>) -> Result<RunSummary> {
    options.validate()?;
    let adapter = specs::build_adapter(options.source, &options.params)?;

    let matcher = if adapter.uses_roster() {
        let path = options
            .roster
            .as_deref()
            .ok_or_else(|| RrError::config("a membership list is required (--ml)"))?;
        let members = load_roster(path, options.roster_format)?;
        Some(NameMatcher::build(&members, adapter.boundary())?)
    } else {
        None
    };

    let mut report = ReportAssembler::initialize(&options.output)?;

    let summary = match &options.race_list {
        Some(list) => {
            let files = read_race_list(list)?;
            run_local(adapter.as_ref(), &files, matcher.as_ref(), &mut report, progress.as_deref_mut())
        }
        None => {
            let mut session = Session::new()?;
            run_web(
                adapter.as_ref(),
                &mut session,
                matcher.as_ref(),
                &options.range,
                &mut report,
                progress.as_deref_mut(),
            )
        }
    };

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    let summary = summary.inspect_err(|e| loge!("{}: run stopped: {e}", adapter.name()))?;
    logf!(
        "{}: {} race page(s), {} with club results, {} skipped, {} failed → {}",
        adapter.name(),
        summary.candidates,
        summary.appended,
        summary.skipped,
        summary.failed,
        report.path().display()
    );
    Ok(summary)
}

/* ---------------- Web mode ---------------- */

pub fn run_web(
    adapter: &dyn SourceAdapter,
    fetch: &mut dyn Fetch,
    matcher: Option<&NameMatcher>,
    range: &DateRange,
    report: &mut ReportAssembler,
    mut progress: Option<&mut (dyn Progress + '_)>,
) -> Result<RunSummary> {
    let candidates = adapter.discover(fetch, range)?;
    logf!("{}: {} candidate race(s)", adapter.name(), candidates.len());
    if let Some(p) = progress.as_deref_mut() {
        p.begin(candidates.len());
        if candidates.is_empty() {
            p.log("No races in the date range.");
        }
    }

    let mut summary = RunSummary::default();
    let mut seen_urls: HashSet<String> = HashSet::new();

    for candidate in candidates {
        // Chunks of one race are tracked by file name; a set file linking
        // back to itself or to an earlier set must not loop.
        let mut visited: HashSet<String> = HashSet::new();
        let mut queue = VecDeque::from([candidate]);

        while let Some(c) = queue.pop_front() {
            if !seen_urls.insert(c.url.clone()) || !visited.insert(s!(file_name(&c.url))) {
                continue;
            }
            summary.candidates += 1;
            logf!("Downloading {}", c.url);

            let (chunks, result) = process_web_page(adapter, fetch, &c, matcher, range, report);
            match result {
                Ok(outcome) => record(&mut summary, &mut progress, &c.display_name, outcome),
                Err(e) if e.is_recoverable() => {
                    logw!("Skipping {}: {e}", c.url);
                    summary.failed += 1;
                    if let Some(p) = progress.as_deref_mut() {
                        p.race_failed(&c.display_name, &e.to_string());
                    }
                }
                Err(e) => return Err(e),
            }
            if !chunks.is_empty() {
                if let Some(p) = progress.as_deref_mut() {
                    p.log(&format!("{}: {} more result page(s)", c.display_name, chunks.len()));
                }
            }
            queue.extend(chunks.into_iter().map(CandidateRaceRef::new));
        }
    }
    Ok(summary)
}

fn process_web_page(
    adapter: &dyn SourceAdapter,
    fetch: &mut dyn Fetch,
    candidate: &CandidateRaceRef,
    matcher: Option<&NameMatcher>,
    range: &DateRange,
    report: &mut ReportAssembler,
) -> (Vec<String>, Result<Outcome>) {
    let page = match adapter.fetch_race(fetch, candidate) {
        Ok(page) => page,
        Err(e) => return (Vec::new(), Err(e)),
    };
    if !adapter.accepts(&page, range) {
        logf!("{} is outside the date range", candidate.display_name);
        return (Vec::new(), Ok(Outcome::OutOfRange));
    }
    // Later chunks are followed even if this one fails to parse.
    let chunks = adapter.secondary_links(&page);
    (chunks, append_if_any(adapter, &page, matcher, report))
}

/* ---------------- Local mode ---------------- */

pub fn run_local(
    adapter: &dyn SourceAdapter,
    files: &[PathBuf],
    matcher: Option<&NameMatcher>,
    report: &mut ReportAssembler,
    mut progress: Option<&mut (dyn Progress + '_)>,
) -> Result<RunSummary> {
    if let Some(p) = progress.as_deref_mut() {
        p.begin(files.len());
    }

    let mut summary = RunSummary::default();
    for path in files {
        summary.candidates += 1;
        let name = path.display().to_string();
        logf!("Processing file {name}");

        let page = match fs::read(path) {
            Ok(bytes) => RacePage::local(tidy(&decode_body(&bytes))),
            Err(e) => {
                logw!("Skipping {name}: {e}");
                summary.failed += 1;
                if let Some(p) = progress.as_deref_mut() {
                    p.race_failed(&name, &e.to_string());
                }
                continue;
            }
        };

        match append_if_any(adapter, &page, matcher, report) {
            Ok(outcome) => record(&mut summary, &mut progress, &name, outcome),
            Err(e) if e.is_recoverable() => {
                logw!("Skipping {name}: {e}");
                summary.failed += 1;
                if let Some(p) = progress.as_deref_mut() {
                    p.race_failed(&name, &e.to_string());
                }
            }
            Err(e) => return Err(e),
        }
    }
    Ok(summary)
}

/* ---------------- Shared ---------------- */

fn append_if_any(
    adapter: &dyn SourceAdapter,
    page: &RacePage,
    matcher: Option<&NameMatcher>,
    report: &mut ReportAssembler,
) -> Result<Outcome> {
    match adapter.extract(page, matcher)? {
        Some(fragment) => {
            report.append(&fragment)?;
            logf!("{}: {} club result(s)", fragment.title, fragment.rows.len());
            Ok(Outcome::Appended)
        }
        None => Ok(Outcome::NoMatch),
    }
}

fn record(summary: &mut RunSummary, progress: &mut Option<&mut (dyn Progress + '_)>, name: &str, outcome: Outcome) {
    let appended = matches!(outcome, Outcome::Appended);
    match outcome {
        Outcome::Appended => summary.appended += 1,
        Outcome::NoMatch | Outcome::OutOfRange => summary.skipped += 1,
    }
    if let Some(p) = progress.as_deref_mut() {
        p.race_done(name, appended);
    }
}
