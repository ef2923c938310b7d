// src/roster.rs
//! Club membership list.
//!
//! The file is delimited text, one member per record, name columns first:
//!
//! ```text
//! SMITH,JOE,2014,...
//! Doe,Jane
//! ```
//!
//! Column order and delimiter come from [`RosterFormat`]; they are never guessed
//! per row. Blank lines and `#` comments are skipped, extra columns ignored.

use std::{fs, path::Path};

use crate::config::options::{ColumnOrder, RosterFormat};
use crate::error::{Result, RrError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub first_name: String,
    pub last_name: String,
}

impl Member {
    pub fn new(first: &str, last: &str) -> Self {
        Self { first_name: s!(first.trim()), last_name: s!(last.trim()) }
    }
}

pub fn load_roster(path: &Path, format: RosterFormat) -> Result<Vec<Member>> {
    let text = fs::read_to_string(path)
        .map_err(|e| RrError::config(format!("cannot read roster {}: {e}", path.display())))?;
    parse_roster(&text, format)
}

pub fn parse_roster(text: &str, format: RosterFormat) -> Result<Vec<Member>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(format.delimiter)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut members = Vec::new();
    for (i, rec) in rdr.records().enumerate() {
        let rec = rec.map_err(|e| RrError::config(format!("roster record {}: {e}", i + 1)))?;
        if rec.iter().all(str::is_empty) {
            continue;
        }
        let (a, b) = match (rec.get(0), rec.get(1)) {
            (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => (a, b),
            _ => {
                let line = rec.position().map(|p| p.line()).unwrap_or(i as u64 + 1);
                return Err(RrError::config(format!(
                    "roster line {line}: expected two name columns, got {:?}",
                    rec.iter().collect::<Vec<_>>()
                )));
            }
        };
        let member = match format.order {
            ColumnOrder::LastFirst => Member::new(b, a),
            ColumnOrder::FirstLast => Member::new(a, b),
        };
        members.push(member);
    }

    if members.is_empty() {
        return Err(RrError::config("roster has no members"));
    }
    logd!("Loaded {} roster entries", members.len());
    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_first_default() {
        let m = parse_roster("STRAWN,MARK\n\nCARR,MICHAEL,2012,x\n", RosterFormat::default()).unwrap();
        assert_eq!(m, vec![Member::new("MARK", "STRAWN"), Member::new("MICHAEL", "CARR")]);
    }

    #[test]
    fn first_last_and_tabs() {
        let fmt = RosterFormat { order: ColumnOrder::FirstLast, delimiter: b'\t' };
        let m = parse_roster("# club\nEd\tFord\n", fmt).unwrap();
        assert_eq!(m, vec![Member::new("Ed", "Ford")]);
    }

    #[test]
    fn duplicates_are_kept() {
        let m = parse_roster("FOSTER,BILLY\nFOSTER,BILLY\n", RosterFormat::default()).unwrap();
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn single_column_is_config_error() {
        let err = parse_roster("STRAWN\n", RosterFormat::default()).unwrap_err();
        assert!(matches!(err, RrError::Config(_)));
    }

    #[test]
    fn wrong_delimiter_is_config_error() {
        // tab-delimited file read as CSV has one column per record
        assert!(parse_roster("Ed\tFord\n", RosterFormat::default()).is_err());
    }

    #[test]
    fn empty_is_config_error() {
        assert!(parse_roster("\n# nobody\n", RosterFormat::default()).is_err());
    }
}
