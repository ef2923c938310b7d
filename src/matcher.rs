// src/matcher.rs
//! Roster → name predicates.
//!
//! Each member compiles to a first/last regex pair; a text matches when both
//! halves of any one pair hit. Bare substrings are never enough: "Ed Ford"
//! must not light up every finisher from New Bedford.

use regex::{Regex, RegexBuilder};

use crate::error::{Result, RrError};
use crate::roster::Member;

/// How a name must be delimited inside a result line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Boundary {
    /// Regex word boundaries on both sides. An edge that is not a word
    /// character (`Jr.`) needs a non-word character or line end instead.
    #[default]
    Word,
    /// Whitespace (or line start/end) on both sides.
    Whitespace,
    /// As `Whitespace`, but a `.` may also precede the name: `60.Joe Smith`.
    Dotted,
}

impl Boundary {
    fn wrap(&self, name: &str) -> String {
        let escaped = regex::escape(name);
        match self {
            Boundary::Word => {
                let left = if is_word_char(name.chars().next()) { r"\b" } else { r"(?:^|\W)" };
                let right = if is_word_char(name.chars().next_back()) { r"\b" } else { r"(?:\W|$)" };
                format!("{left}{escaped}{right}")
            }
            Boundary::Whitespace => format!(r"(?:^|\s){escaped}(?:\s|$)"),
            Boundary::Dotted => format!(r"(?:^|[\s.]){escaped}(?:\s|$)"),
        }
    }
}

fn is_word_char(c: Option<char>) -> bool {
    c.is_some_and(|c| c.is_alphanumeric() || c == '_')
}

#[derive(Debug)]
struct NamePattern {
    first: Regex,
    last: Regex,
}

impl NamePattern {
    fn compile(member: &Member, boundary: Boundary) -> Result<Self> {
        let build = |name: &str| {
            RegexBuilder::new(&boundary.wrap(name))
                .case_insensitive(true)
                .build()
                .map_err(|e| RrError::config(format!("name pattern for {name:?}: {e}")))
        };
        Ok(Self { first: build(&member.first_name)?, last: build(&member.last_name)? })
    }

    fn is_match(&self, text: &str) -> bool {
        self.first.is_match(text) && self.last.is_match(text)
    }
}

#[derive(Debug)]
pub struct NameMatcher {
    members: Vec<Member>,
    patterns: Vec<NamePattern>,
}

impl NameMatcher {
    pub fn build(members: &[Member], boundary: Boundary) -> Result<Self> {
        if members.is_empty() {
            return Err(RrError::config("cannot match against an empty roster"));
        }
        let mut patterns = Vec::with_capacity(members.len());
        for m in members {
            if m.first_name.is_empty() || m.last_name.is_empty() {
                return Err(RrError::config(format!("roster entry with an empty name: {m:?}")));
            }
            patterns.push(NamePattern::compile(m, boundary)?);
        }
        Ok(Self { members: members.to_vec(), patterns })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }

    /// First roster entry (in roster order) that `text` refers to.
    pub fn matching_member(&self, text: &str) -> Option<&Member> {
        self.patterns
            .iter()
            .position(|p| p.is_match(text))
            .map(|i| &self.members[i])
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(names: &[(&str, &str)], b: Boundary) -> NameMatcher {
        let members: Vec<Member> = names.iter().map(|(f, l)| Member::new(f, l)).collect();
        NameMatcher::build(&members, b).unwrap()
    }

    #[test]
    fn ed_ford_is_not_in_bedford() {
        let m = matcher(&[("Ed", "Ford")], Boundary::Word);
        assert!(!m.matches("  23 John Doe         New Bedford, NJ 34 M"));
        assert!(m.matches("... Ed Ford finished 23rd ..."));
    }

    #[test]
    fn case_insensitive_and_order_free() {
        let m = matcher(&[("Mark", "Strawn")], Boundary::Word);
        assert!(m.matches("  12 MARK STRAWN   41 M  Somerset NJ"));
        assert!(m.matches("Strawn, Mark"));
        assert!(!m.matches("Mark Strawnson"));
    }

    #[test]
    fn both_halves_required() {
        let m = matcher(&[("Mark", "Strawn")], Boundary::Word);
        assert!(!m.matches("Mark Carr"));
    }

    #[test]
    fn hyphenated_and_punctuated_names() {
        let m = matcher(&[("Karen", "Smith-Rohrberg"), ("Pat", "O'Brien")], Boundary::Word);
        assert!(m.matches(" 88 Karen Smith-Rohrberg  F45"));
        assert!(m.matches(" 89 PAT O'BRIEN"));
        assert!(!m.matches(" 90 Karen Smith"));
    }

    #[test]
    fn name_ending_in_punctuation() {
        let m = matcher(&[("Joe", "Smith Jr.")], Boundary::Word);
        assert!(m.matches("  5 Joe Smith Jr. 41 M"));
        assert!(m.matches("  5 Joe Smith Jr."));
        assert!(!m.matches("  5 Joe Smith Jrx 41 M"));
        assert!(!m.matches("  5 Joe Smith Jr.x"));
    }

    #[test]
    fn whitespace_boundary() {
        let m = matcher(&[("Gene", "Gugliotta")], Boundary::Whitespace);
        assert!(m.matches("60 Gene Gugliotta       North Plainfiel,NJ 53 M U "));
        assert!(!m.matches("60.Gene Gugliotta"));
    }

    #[test]
    fn dotted_boundary_accepts_rank_prefix() {
        let m = matcher(&[("Gene", "Gugliotta")], Boundary::Dotted);
        assert!(m.matches("60.Gene Gugliotta       North Plainfiel,NJ"));
        assert!(!m.matches("60.Eugene Gugliotta"));
    }

    #[test]
    fn any_member_suffices() {
        let m = matcher(&[("Billy", "Foster"), ("Jaime", "Foster")], Boundary::Word);
        assert_eq!(m.matching_member(" 4 Jaime Foster").map(|x| x.first_name.as_str()), Some("Jaime"));
        assert!(m.matching_member(" 4 Jim Foster").is_none());
    }

    #[test]
    fn empty_roster_rejected() {
        assert!(NameMatcher::build(&[], Boundary::Word).is_err());
    }
}
