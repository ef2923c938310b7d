// src/cli.rs
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Parser;

use crate::config::consts::{ACTIVE_DEFAULT_RADIUS, COOLRUNNING_DEFAULT_STATE, DEFAULT_OUTPUT_FILE};
use crate::config::options::{ColumnOrder, RosterFormat, RunOptions, SourceKind, SourceParams, Verbosity};
use crate::dates::{parse_iso, DateRange};
use crate::error::{Result, RrError};
use crate::file::resolve_out_path;
use crate::progress::Progress;
use crate::runner::{self, RunSummary};

#[derive(Parser, Debug)]
#[command(name = "rr")]
#[command(about = "Collect club members' finishes from road-race result sites into one HTML page")]
#[command(version)]
pub struct Args {
    /// Results site to scrape
    #[arg(value_enum)]
    pub source: SourceKind,

    /// First race day, YYYY-MM-DD (default: today)
    #[arg(long, value_parser = parse_date)]
    pub start: Option<NaiveDate>,

    /// Last race day, YYYY-MM-DD (default: --start)
    #[arg(long, value_parser = parse_date)]
    pub stop: Option<NaiveDate>,

    /// Membership list
    #[arg(long = "ml", value_name = "FILE")]
    pub membership_list: Option<PathBuf>,

    /// Already-downloaded race files, one path per line
    #[arg(long = "rl", value_name = "FILE")]
    pub race_list: Option<PathBuf>,

    /// Report file, or a directory to put results.html in
    #[arg(short = 'o', long = "output", value_name = "FILE", default_value = DEFAULT_OUTPUT_FILE)]
    pub output: String,

    #[arg(long, value_enum, value_name = "LEVEL", default_value = "info")]
    pub verbose: Verbosity,

    /// CoolRunning state folder; repeat for several
    #[arg(long = "state", value_name = "ST")]
    pub states: Vec<String>,

    /// NYRR team code
    #[arg(long, value_name = "CODE")]
    pub team: Option<String>,

    /// Active.com search location, e.g. "Boston, MA"
    #[arg(long, value_name = "TEXT")]
    pub location: Option<String>,

    /// Active.com search radius in miles
    #[arg(long, value_name = "N", default_value_t = ACTIVE_DEFAULT_RADIUS)]
    pub radius: u32,

    /// Name columns of the membership list
    #[arg(long, value_enum, default_value = "last-first")]
    pub roster_order: ColumnOrder,

    /// Field delimiter of the membership list
    #[arg(long, value_name = "C", default_value_t = ',')]
    pub delimiter: char,
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    parse_iso(s).map_err(|e| e.to_string())
}

impl Args {
    /// Fill in defaults and turn the flags into run options.
    pub fn into_options(self) -> Result<RunOptions> {
        let start = self.start.unwrap_or_else(|| Local::now().date_naive());
        let stop = self.stop.unwrap_or(start);
        let range = DateRange::new(start, stop)?;

        if !self.delimiter.is_ascii() {
            return Err(RrError::config(format!("delimiter {:?} is not ASCII", self.delimiter)));
        }

        let mut options = RunOptions::new(self.source, range);
        options.roster = self.membership_list;
        options.roster_format = RosterFormat { order: self.roster_order, delimiter: self.delimiter as u8 };
        options.race_list = self.race_list;
        options.output = resolve_out_path(&self.output, DEFAULT_OUTPUT_FILE)?;
        options.params = SourceParams {
            states: if self.states.is_empty() { vec![s!(COOLRUNNING_DEFAULT_STATE)] } else { self.states },
            team: self.team,
            location: self.location,
            radius: self.radius,
        };
        Ok(options)
    }
}

/// Progress as log lines.
#[derive(Default)]
struct CliProgress {
    total: usize,
    done: usize,
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }

    fn log(&mut self, msg: &str) {
        logf!("{msg}");
    }

    fn race_done(&mut self, name: &str, appended: bool) {
        self.done += 1;
        if appended {
            logf!("[{}/{}] {name}: club results added", self.done, self.total);
        } else {
            logd!("[{}/{}] {name}: nothing for the club", self.done, self.total);
        }
    }

    fn race_failed(&mut self, name: &str, reason: &str) {
        self.done += 1;
        logw!("[{}/{}] {name}: {reason}", self.done, self.total);
    }
}

/// Parse the command line, set up logging and scrape.
pub fn run() -> Result<RunSummary> {
    let args = Args::parse();
    crate::log::init(args.verbose);
    let options = args.into_options()?;
    let mut progress = CliProgress::default();
    runner::run(&options, Some(&mut progress))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["rr"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn stop_defaults_to_start() {
        let o = args(&["bestrace", "--start", "2012-12-02", "--ml", "club.csv"]).into_options().unwrap();
        let d = NaiveDate::from_ymd_opt(2012, 12, 2).unwrap();
        assert_eq!((o.range.start(), o.range.stop()), (d, d));
        assert_eq!(o.roster.as_deref(), Some(std::path::Path::new("club.csv")));
        assert_eq!(o.params.states, vec!["ma"]);
    }

    #[test]
    fn reversed_range_is_rejected() {
        let a = args(&["bestrace", "--start", "2012-12-05", "--stop", "2012-12-01"]);
        assert!(matches!(a.into_options(), Err(RrError::Config(_))));
    }

    #[test]
    fn bad_date_is_a_usage_error() {
        assert!(Args::try_parse_from(["rr", "bestrace", "--start", "12/02/2012"]).is_err());
    }

    #[test]
    fn roster_format_and_site_flags() {
        let o = args(&[
            "coolrunning", "--roster-order", "first-last", "--delimiter", ";", "--state", "nh", "--state", "ma",
        ])
        .into_options()
        .unwrap();
        assert_eq!(o.roster_format, RosterFormat { order: ColumnOrder::FirstLast, delimiter: b';' });
        assert_eq!(o.params.states, vec!["nh", "ma"]);
    }

    #[test]
    fn non_ascii_delimiter() {
        assert!(args(&["generic", "--delimiter", "§"]).into_options().is_err());
    }
}
