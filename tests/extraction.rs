// tests/extraction.rs
//
// Single result pages through an adapter's extract step, the way the runner
// hands them over: fetched, tidied, wrapped in a RacePage.
//
mod common;

use common::{club, fixture};
use race_results::core::tidy;
use race_results::error::RrError;
use race_results::fragment::MatchedRows;
use race_results::matcher::NameMatcher;
use race_results::roster::Member;
use race_results::specs::coolrunning::CoolRunning;
use race_results::specs::lmsports::LmSports;
use race_results::specs::{RacePage, SourceAdapter};

const ELF: &str = "http://www.coolrunning.com/results/12/ma/Dec2_ElfRun_set1.shtml";

fn page(url: &str, name: &str) -> RacePage {
    RacePage::fetched(url, tidy(&fixture(name)))
}

#[test]
fn unknown_vendor_falls_back_to_plain_text() {
    let adapter = CoolRunning::new(vec!["ma".to_string()]).unwrap();
    let m = club(adapter.boundary());

    let fragment = adapter
        .extract(&page(ELF, "coolrunning_elf_unknown_vendor.shtml"), Some(&m))
        .unwrap()
        .expect("Paul Smith finished");

    assert_eq!(fragment.title, "Elf Run 5K");
    assert_eq!(fragment.location_or_date.as_deref(), Some("Quincy, MA December 2, 2012"));
    assert!(fragment.banner_text.as_deref().is_some_and(|b| b.contains("Age S Time")));
    match &fragment.rows {
        MatchedRows::Lines(lines) => assert_eq!(lines, &vec!["   14 Paul Smith              41 M 18:40".to_string()]),
        other => panic!("expected text lines, got {other:?}"),
    }
}

#[test]
fn page_without_author_tag_is_a_parse_error() {
    let adapter = CoolRunning::new(vec!["ma".to_string()]).unwrap();
    let m = club(adapter.boundary());

    let err = adapter.extract(&page(ELF, "coolrunning_elf_no_author.shtml"), Some(&m)).unwrap_err();
    assert!(matches!(err, RrError::Parse(_)));
    assert!(err.is_recoverable());
}

#[test]
fn lmsports_dotted_rows_and_age_banner() {
    let m = NameMatcher::build(&[Member::new("Gene", "Gugliotta")], LmSports.boundary()).unwrap();

    let fragment = LmSports
        .extract(&page("http://www.lmsports.com/trail13.htm", "lmsports_trail13.htm"), Some(&m))
        .unwrap()
        .expect("Gene Gugliotta finished");

    assert_eq!(fragment.title, "Trail of Two Cities 5k Run");
    assert_eq!(fragment.provenance.as_ref().map(|p| p.site.as_str()), Some("L&M Sports"));
    let banner = fragment.banner_text.as_deref().unwrap();
    assert!(banner.starts_with("  age|#in"));
    assert!(banner.ends_with("====="));
    match &fragment.rows {
        // "Eugene" must not count as "Gene"
        MatchedRows::Lines(lines) => assert_eq!(lines, &vec!["   60.Gene Gugliotta          M5059 25:10".to_string()]),
        other => panic!("expected text lines, got {other:?}"),
    }
}

#[test]
fn lmsports_page_without_club_names() {
    let m = NameMatcher::build(&[Member::new("Mark", "Strawn")], LmSports.boundary()).unwrap();
    let got = LmSports.extract(&page("http://www.lmsports.com/trail13.htm", "lmsports_trail13.htm"), Some(&m));
    assert!(matches!(got, Ok(None)));
}
