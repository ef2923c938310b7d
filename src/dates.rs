// src/dates.rs
use chrono::{Datelike, NaiveDate};

use crate::error::{Result, RrError};

/// Inclusive calendar window a run is restricted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    stop: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, stop: NaiveDate) -> Result<Self> {
        if start > stop {
            return Err(RrError::config(format!("start date {start} is after stop date {stop}")));
        }
        Ok(Self { start, stop })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn stop(&self) -> NaiveDate {
        self.stop
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.stop
    }

    /// Every day in the window, in calendar order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.stop)
    }

    /// Distinct calendar years touched by the window.
    pub fn years(&self) -> Vec<i32> {
        (self.start.year()..=self.stop.year()).collect()
    }

    /// Non-capturing regex alternation of every day rendered with `fmt`,
    /// e.g. `(?:121202|121203)` for `%y%m%d`.
    ///
    /// Sites embed dates as literal text, so the window is spelled out day by
    /// day instead of compared numerically. Duplicate renderings collapse.
    pub fn alternation(&self, fmt: &str) -> String {
        let mut tokens: Vec<String> = Vec::new();
        for day in self.days() {
            let tok = regex::escape(&day.format(fmt).to_string());
            if !tokens.contains(&tok) {
                tokens.push(tok);
            }
        }
        format!("(?:{})", tokens.join("|"))
    }
}

/// `YYYY-MM-DD`, for CLI values.
pub fn parse_iso(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| RrError::config(format!("bad date {s:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn single_day_window_matches_only_that_day() {
        let r = DateRange::new(ymd(2012, 12, 2), ymd(2012, 12, 2)).unwrap();
        let re = Regex::new(&format!("^{}$", r.alternation("%m%d"))).unwrap();
        assert!(re.is_match("1202"));
        assert!(!re.is_match("1201"));
        assert!(!re.is_match("1203"));
    }

    #[test]
    fn alternation_spans_month_end() {
        let r = DateRange::new(ymd(2012, 11, 30), ymd(2012, 12, 1)).unwrap();
        assert_eq!(r.alternation("%y%m%d"), "(?:121130|121201)");
    }

    #[test]
    fn contains_is_inclusive() {
        let r = DateRange::new(ymd(2013, 1, 1), ymd(2013, 1, 31)).unwrap();
        assert!(r.contains(ymd(2013, 1, 1)));
        assert!(r.contains(ymd(2013, 1, 31)));
        assert!(!r.contains(ymd(2013, 2, 1)));
        assert!(!r.contains(ymd(2012, 12, 31)));
    }

    #[test]
    fn reversed_window_is_config_error() {
        assert!(matches!(
            DateRange::new(ymd(2013, 1, 2), ymd(2013, 1, 1)),
            Err(RrError::Config(_))
        ));
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(parse_iso(" 2012-12-09 ").unwrap(), ymd(2012, 12, 9));
        assert!(parse_iso("12/09/2012").is_err());
    }
}
