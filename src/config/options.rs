// src/config/options.rs
use std::path::PathBuf;

use clap::ValueEnum;

use super::consts::*;
use crate::dates::DateRange;
use crate::error::{Result, RrError};

/// Which results site a run scrapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    Bestrace,
    Coolrunning,
    Compuscore,
    Lmsports,
    Nyrr,
    Active,
    /// Local result files of no particular site
    Generic,
}

impl SourceKind {
    /// NYRR searches by team code; every other source matches against the roster.
    pub fn needs_roster(&self) -> bool {
        !matches!(self, SourceKind::Nyrr)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum Verbosity {
    Critical,
    Error,
    Warning,
    #[default]
    Info,
    Debug,
}

impl Verbosity {
    /// `EnvFilter` directive for this level.
    pub fn directive(&self) -> &'static str {
        match self {
            Verbosity::Critical | Verbosity::Error => "error",
            Verbosity::Warning => "warn",
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum ColumnOrder {
    /// `SMITH,JOE,...`
    #[default]
    LastFirst,
    /// `JOE,SMITH,...`
    FirstLast,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RosterFormat {
    pub order: ColumnOrder,
    pub delimiter: u8,
}

impl Default for RosterFormat {
    fn default() -> Self {
        Self { order: ColumnOrder::LastFirst, delimiter: DEFAULT_ROSTER_DELIMITER }
    }
}

/// Site-specific knobs. Only the ones the chosen source reads matter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceParams {
    /// CoolRunning state folders, e.g. `ma`, `nh`
    pub states: Vec<String>,
    /// NYRR team code, e.g. `RARI`
    pub team: Option<String>,
    /// Active.com search location, e.g. `Boston, MA`
    pub location: Option<String>,
    /// Active.com search radius in miles
    pub radius: u32,
}

impl Default for SourceParams {
    fn default() -> Self {
        Self {
            states: vec![s!(COOLRUNNING_DEFAULT_STATE)],
            team: None,
            location: None,
            radius: ACTIVE_DEFAULT_RADIUS,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RunOptions {
    pub source: SourceKind,
    pub range: DateRange,
    pub roster: Option<PathBuf>,
    pub roster_format: RosterFormat,
    /// Explicit list of already-downloaded race files; switches to local mode
    pub race_list: Option<PathBuf>,
    pub output: PathBuf,
    pub params: SourceParams,
}

impl RunOptions {
    pub fn new(source: SourceKind, range: DateRange) -> Self {
        Self {
            source,
            range,
            roster: None,
            roster_format: RosterFormat::default(),
            race_list: None,
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            params: SourceParams::default(),
        }
    }

    /// Reject combinations no adapter can run with.
    pub fn validate(&self) -> Result<()> {
        if self.source.needs_roster() && self.roster.is_none() {
            return Err(RrError::config(format!(
                "{:?} needs a membership list (--ml)",
                self.source
            )));
        }
        match self.source {
            SourceKind::Nyrr if self.params.team.as_deref().is_none_or(str::is_empty) => {
                Err(RrError::config("NYRR searches by team; pass --team"))
            }
            SourceKind::Nyrr if self.race_list.is_some() => {
                Err(RrError::config("NYRR results cannot be read from local files"))
            }
            SourceKind::Active if self.race_list.is_none() && self.params.location.is_none() => {
                Err(RrError::config("Active.com searches need --location"))
            }
            SourceKind::Coolrunning if self.params.states.is_empty() => {
                Err(RrError::config("CoolRunning needs at least one --state"))
            }
            SourceKind::Generic if self.race_list.is_none() => {
                Err(RrError::config("generic results can only be read from a race list (--rl)"))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day() -> DateRange {
        let d = NaiveDate::from_ymd_opt(2013, 1, 2).unwrap();
        DateRange::new(d, d).unwrap()
    }

    #[test]
    fn roster_required_except_for_nyrr() {
        let opts = RunOptions::new(SourceKind::Bestrace, day());
        assert!(matches!(opts.validate(), Err(RrError::Config(_))));

        let mut nyrr = RunOptions::new(SourceKind::Nyrr, day());
        nyrr.params.team = Some(s!("RARI"));
        assert!(nyrr.validate().is_ok());
    }

    #[test]
    fn nyrr_needs_team() {
        let mut opts = RunOptions::new(SourceKind::Nyrr, day());
        opts.params.team = Some(s!(""));
        assert!(opts.validate().is_err());
    }

    #[test]
    fn generic_needs_race_list() {
        let mut opts = RunOptions::new(SourceKind::Generic, day());
        opts.roster = Some(PathBuf::from("members.csv"));
        assert!(opts.validate().is_err());
        opts.race_list = Some(PathBuf::from("races.txt"));
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn verbosity_maps_critical_to_error() {
        assert_eq!(Verbosity::Critical.directive(), "error");
        assert_eq!(Verbosity::Warning.directive(), "warn");
    }
}
