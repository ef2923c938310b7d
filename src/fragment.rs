// src/fragment.rs
//! One race's worth of club results, ready to drop into the report body.

use std::collections::HashSet;

use crate::core::sanitize::escape_html;

/// Where the complete results live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Provenance {
    pub url: String,
    pub site: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchedRows {
    /// Fixed-width text lines.
    Lines(Vec<String>),
    Table { header: Option<Vec<String>>, rows: Vec<Vec<String>> },
}

impl MatchedRows {
    pub fn len(&self) -> usize {
        match self {
            MatchedRows::Lines(v) => v.len(),
            MatchedRows::Table { rows, .. } => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop repeats of an earlier row, keeping first-seen order.
    fn dedup(self) -> Self {
        fn keep_first<T: Clone + Eq + std::hash::Hash>(v: Vec<T>) -> Vec<T> {
            let mut seen = HashSet::new();
            v.into_iter().filter(|x| seen.insert(x.clone())).collect()
        }
        match self {
            MatchedRows::Lines(v) => MatchedRows::Lines(keep_first(v)),
            MatchedRows::Table { header, rows } => MatchedRows::Table { header, rows: keep_first(rows) },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultFragment {
    pub title: String,
    pub location_or_date: Option<String>,
    pub provenance: Option<Provenance>,
    pub banner_text: Option<String>,
    pub rows: MatchedRows,
}

impl ResultFragment {
    /// `None` when nothing matched; a fragment always carries at least one row.
    pub fn new(title: impl Into<String>, rows: MatchedRows) -> Option<Self> {
        let rows = rows.dedup();
        if rows.is_empty() {
            return None;
        }
        Some(Self { title: title.into(), location_or_date: None, provenance: None, banner_text: None, rows })
    }

    pub fn with_subtitle(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.location_or_date = (!text.trim().is_empty()).then_some(text);
        self
    }

    /// Attach a source link. Local files have no URL and get none.
    pub fn with_provenance(mut self, url: Option<&str>, site: &str) -> Self {
        self.provenance = url.map(|u| Provenance { url: s!(u), site: s!(site) });
        self
    }

    pub fn with_banner(mut self, banner: impl Into<String>) -> Self {
        let banner = banner.into();
        self.banner_text = (!banner.trim().is_empty()).then_some(banner);
        self
    }

    pub fn to_html(&self) -> String {
        let mut out = String::from(r#"<div class="race"><hr class="race_header"/>"#);
        out.push_str(&format!("<h1>{}</h1>", escape_html(&self.title)));
        if let Some(sub) = &self.location_or_date {
            out.push_str(&format!("<h2>{}</h2>", escape_html(sub)));
        }
        if let Some(p) = &self.provenance {
            out.push_str(&format!(
                r#"<p class="provenance"><span>Complete results </span><a href="{}">here</a><span> on {}.</span></p>"#,
                escape_html(&p.url),
                escape_html(&p.site)
            ));
        }
        match &self.rows {
            MatchedRows::Lines(lines) => self.push_pre(&mut out, lines),
            MatchedRows::Table { header, rows } => push_table(&mut out, header.as_deref(), rows),
        }
        out.push_str("</div>");
        out
    }

    fn push_pre(&self, out: &mut String, lines: &[String]) {
        let mut body = String::new();
        if let Some(b) = &self.banner_text {
            body.push_str(b.trim_end_matches(['\r', '\n']));
            body.push('\n');
        }
        body.push_str(&lines.join("\n"));
        // a newline right after <pre> is eaten by the parser; keep re-parses stable
        let body = body.trim_start_matches(['\r', '\n']);
        out.push_str(r#"<pre class="actual_results">"#);
        out.push_str(&escape_html(body));
        out.push_str("</pre>");
    }
}

fn push_table(out: &mut String, header: Option<&[String]>, rows: &[Vec<String>]) {
    out.push_str("<table>");
    if let Some(h) = header {
        out.push_str("<tr>");
        for cell in h {
            out.push_str(&format!("<th>{}</th>", escape_html(cell)));
        }
        out.push_str("</tr>");
    }
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            out.push_str(&format!("<td>{}</td>", escape_html(cell)));
        }
        out.push_str("</tr>");
    }
    out.push_str("</table>");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(v: &[&str]) -> MatchedRows {
        MatchedRows::Lines(v.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn no_rows_no_fragment() {
        assert!(ResultFragment::new("Race", lines(&[])).is_none());
    }

    #[test]
    fn renders_banner_then_lines() {
        let f = ResultFragment::new("Jingle 5K", lines(&["  12 Mark Strawn  41", "  30 Ed Ford  50"]))
            .unwrap()
            .with_subtitle("Somerset, NJ")
            .with_provenance(Some("http://www.bestrace.com/results/12/121202J5K.HTM"), "BestRace")
            .with_banner(" Place Name       Age\n");
        let html = f.to_html();
        assert!(html.starts_with(r#"<div class="race"><hr class="race_header"/><h1>Jingle 5K</h1><h2>Somerset, NJ</h2>"#));
        assert!(html.contains(r#"<a href="http://www.bestrace.com/results/12/121202J5K.HTM">here</a><span> on BestRace.</span>"#));
        assert!(html.contains("<pre class=\"actual_results\"> Place Name       Age\n  12 Mark Strawn  41\n  30 Ed Ford  50</pre>"));
    }

    #[test]
    fn text_is_escaped() {
        let f = ResultFragment::new("L&M <Trail>", lines(&["1 Pat O'Brien <DNF>"])).unwrap();
        let html = f.to_html();
        assert!(html.contains("<h1>L&amp;M &lt;Trail&gt;</h1>"));
        assert!(html.contains("1 Pat O'Brien &lt;DNF&gt;"));
    }

    #[test]
    fn repeated_rows_kept_once() {
        let f = ResultFragment::new("R", lines(&["1 Joe Smith", "2 Ann Lee", "1 Joe Smith"])).unwrap();
        assert_eq!(f.rows, lines(&["1 Joe Smith", "2 Ann Lee"]));
    }

    #[test]
    fn table_with_header() {
        let rows = MatchedRows::Table {
            header: Some(vec![s!("Place"), s!("Name")]),
            rows: vec![vec![s!("3"), s!("Mike Norton")]],
        };
        let html = ResultFragment::new("Cape Cod 10K", rows).unwrap().to_html();
        assert!(html.contains("<table><tr><th>Place</th><th>Name</th></tr><tr><td>3</td><td>Mike Norton</td></tr></table>"));
        assert!(!html.contains("<h2>"));
        assert!(!html.contains("provenance"));
    }

    #[test]
    fn blank_subtitle_and_banner_dropped() {
        let f = ResultFragment::new("R", lines(&["x"])).unwrap().with_subtitle("  ").with_banner("\n");
        assert_eq!(f.location_or_date, None);
        assert_eq!(f.banner_text, None);
    }
}
