// src/report.rs
//! The consolidated output document.
//!
//! Every append re-reads the file, so the report on disk is a complete,
//! well-formed document after each race and a crash loses at most the race
//! in flight.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::config::consts::{REPORT_TITLE, STYLESHEET_HREF};
use crate::core::html::to_lower;
use crate::core::tidy;
use crate::error::{Result, RrError};
use crate::file::{ensure_parent, replace_file};
use crate::fragment::ResultFragment;

pub struct ReportAssembler {
    path: PathBuf,
    appended: usize,
}

pub fn skeleton() -> String {
    format!(
        concat!(
            "<!DOCTYPE html><html><head>",
            r#"<meta charset="utf-8">"#,
            "<title>{}</title>",
            r#"<link rel="stylesheet" href="{}" type="text/css">"#,
            "</head><body></body></html>"
        ),
        REPORT_TITLE, STYLESHEET_HREF
    )
}

impl ReportAssembler {
    /// Start a fresh report at `path`, replacing whatever is there.
    pub fn initialize(path: &Path) -> Result<Self> {
        ensure_parent(path)?;
        replace_file(path, &tidy(&skeleton()))?;
        logd!("Initialized report {}", path.display());
        Ok(Self { path: path.to_path_buf(), appended: 0 })
    }

    pub fn append(&mut self, fragment: &ResultFragment) -> Result<()> {
        let current = tidy(&fs::read_to_string(&self.path)?);
        let close = to_lower(&current)
            .rfind("</body>")
            .ok_or_else(|| RrError::parse(format!("{} has no </body>", self.path.display())))?;

        let mut doc = String::with_capacity(current.len() + 1024);
        doc.push_str(&current[..close]);
        doc.push_str(&fragment.to_html());
        doc.push_str(&current[close..]);

        replace_file(&self.path, &tidy(&doc))?;
        self.appended += 1;
        logd!("Appended \"{}\" ({} rows)", fragment.title, fragment.rows.len());
        Ok(())
    }

    /// Fragments appended since `initialize`.
    pub fn len(&self) -> usize {
        self.appended
    }

    pub fn is_empty(&self) -> bool {
        self.appended == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::MatchedRows;

    fn frag(title: &str) -> ResultFragment {
        ResultFragment::new(title, MatchedRows::Lines(vec![format!("  1 Joe Smith ({title})")])).unwrap()
    }

    #[test]
    fn skeleton_has_head_and_empty_body() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("nested/out/results.html");
        let r = ReportAssembler::initialize(&p).unwrap();
        let text = fs::read_to_string(&p).unwrap();
        assert!(text.starts_with("<!DOCTYPE html>"));
        assert!(text.contains("<title>Race Results</title>"));
        assert!(text.contains(r#"href="rr.css""#));
        assert!(text.contains("<body></body>"));
        assert!(r.is_empty());
    }

    #[test]
    fn append_keeps_call_order() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("results.html");
        let mut r = ReportAssembler::initialize(&p).unwrap();
        r.append(&frag("Zebra Dash")).unwrap();
        r.append(&frag("Apple Run")).unwrap();
        let text = fs::read_to_string(&p).unwrap();
        let z = text.find("Zebra Dash").unwrap();
        let a = text.find("Apple Run").unwrap();
        assert!(z < a);
        assert_eq!(r.len(), 2);
        assert_eq!(tidy(&text), text);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("results.html");
        let mut r = ReportAssembler::initialize(&p).unwrap();
        fs::remove_file(&p).unwrap();
        assert!(matches!(r.append(&frag("x")), Err(RrError::Io(_))));
    }
}
