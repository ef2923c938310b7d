// src/core/html.rs
//! Case-insensitive tag slicing over raw markup.
//!
//! Offsets returned here index the original string. Lowercasing is ASCII-only so
//! byte positions in the lowered copy line up with the source.

pub fn to_lower(s: &str) -> String {
    s.to_ascii_lowercase()
}

/// Find the next `<tag …>…</tag>` block at or after `from`.
/// Returns byte offsets `(start_of_open, end_of_close)`.
pub fn next_tag_block_ci(s: &str, open: &str, close: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    let ol = to_lower(open);
    let cl = to_lower(close);
    let mut at = from;
    loop {
        let start = lc.get(at..)?.find(&ol)? + at;
        // `<pre` must not match `<prefix`; require a delimiter after the name.
        let after = lc.as_bytes().get(start + ol.len()).copied();
        if !matches!(after, Some(b'>' | b' ' | b'\t' | b'\r' | b'\n' | b'/')) {
            at = start + ol.len();
            continue;
        }
        let open_end = s[start..].find('>')? + start + 1;
        let end_rel = lc[open_end..].find(&cl)?;
        return Some((start, open_end + end_rel + close.len()));
    }
}

/// All non-nested blocks for `tag`, in document order.
pub fn tag_blocks_ci<'a>(s: &'a str, tag: &str) -> Vec<&'a str> {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some((b_s, b_e)) = next_tag_block_ci(s, &open, &close, pos) {
        out.push(&s[b_s..b_e]);
        pos = b_e;
    }
    out
}

/// The opening tag of a block, e.g. `<pre id="raw-file">`.
pub fn opener(block: &str) -> &str {
    let end = block.find('>').map(|i| i + 1).unwrap_or(block.len());
    &block[..end]
}

pub fn inner_after_open_tag(block: &str) -> String {
    if let Some(oe) = block.find('>') {
        if let Some(cs) = block.rfind('<') {
            if cs > oe {
                return block[oe + 1..cs].to_string();
            }
        }
    }
    s!()
}

/// Inner markup of the first `<tag>` element.
pub fn first_inner(s: &str, tag: &str) -> Option<String> {
    let (b_s, b_e) = next_tag_block_ci(s, &format!("<{tag}"), &format!("</{tag}>"), 0)?;
    Some(inner_after_open_tag(&s[b_s..b_e]))
}

/// Every opening tag named `tag` (void elements like `<meta>` included).
pub fn openers_ci<'a>(s: &'a str, tag: &str) -> Vec<&'a str> {
    let lc = to_lower(s);
    let needle = format!("<{}", to_lower(tag));
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some(rel) = lc[pos..].find(&needle) {
        let start = pos + rel;
        let after = lc.as_bytes().get(start + needle.len()).copied();
        let Some(end_rel) = s[start..].find('>') else { break };
        let end = start + end_rel + 1;
        if matches!(after, Some(b' ' | b'\t' | b'\r' | b'\n' | b'/' | b'>')) {
            out.push(&s[start..end]);
        }
        pos = end;
    }
    out
}

/// Attribute value from an opening tag. Name match is case-insensitive;
/// value may be double-, single- or un-quoted.
pub fn attr_value(opener: &str, name: &str) -> Option<String> {
    let lc = to_lower(opener);
    let needle = to_lower(name);
    let bytes = lc.as_bytes();
    let mut pos = 0usize;
    while let Some(rel) = lc[pos..].find(&needle) {
        let at = pos + rel;
        pos = at + needle.len();
        // must be a whole attribute name
        let before_ok = at > 0 && bytes[at - 1].is_ascii_whitespace();
        let mut i = at + needle.len();
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if !before_ok || bytes.get(i) != Some(&b'=') {
            continue;
        }
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let val = &opener[i..];
        return match val.as_bytes().first() {
            Some(q @ (b'"' | b'\'')) => {
                let q = *q as char;
                let end = val[1..].find(q).map(|e| e + 1).unwrap_or(val.len());
                Some(val[1..end].to_string())
            }
            _ => {
                let end = val.find(|c: char| c.is_ascii_whitespace() || c == '>').unwrap_or(val.len());
                // `content=x/>`: the slash closes the tag
                Some(val[..end].trim_end_matches('/').to_string())
            }
        };
    }
    None
}

/// Drop tags, keep text and its whitespace layout (for `<pre>` content).
pub fn strip_tags_keep_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Drop tags and collapse whitespace (for headings and cells).
pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    super::sanitize::normalize_ws(&strip_tags_keep_ws(s.as_ref()))
}

pub fn contains_tag(s: &str) -> bool {
    let b = s.as_bytes();
    b.windows(2)
        .any(|w| w[0] == b'<' && (w[1].is_ascii_alphabetic() || w[1] == b'/'))
}
