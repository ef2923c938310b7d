// src/core/tidy.rs
//! Markup normalization: whatever comes in, a parseable HTML document goes out.

use scraper::{Html, Node};

/// Repair `markup` into a well-formed document.
///
/// - Excel/IE downlevel conditionals (`<![if …]>`, `<![endif]>`) and Office
///   `<o:p>` tags are dropped before parsing.
/// - Comments are removed.
/// - A `<pre>`, `<textarea>` or `<listing>` whose text starts with a newline
///   gets a second one, since the parser eats the first newline after the
///   start tag and the serializer does not put it back.
/// - Output is html5ever's serialization behind a doctype, so feeding the
///   result back in yields the same text.
pub fn tidy(markup: &str) -> String {
    let cleaned = strip_vendor_constructs(markup);
    let mut doc = Html::parse_document(&cleaned);

    let comments: Vec<_> = doc
        .tree
        .nodes()
        .filter(|n| n.value().is_comment())
        .map(|n| n.id())
        .collect();
    for id in comments {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }

    let leading_newline: Vec<_> = doc
        .tree
        .nodes()
        .filter(|n| {
            n.value()
                .as_element()
                .is_some_and(|e| matches!(e.name(), "pre" | "textarea" | "listing"))
        })
        .filter_map(|n| n.first_child())
        .filter(|c| c.value().as_text().is_some_and(|t| t.starts_with('\n')))
        .map(|c| c.id())
        .collect();
    for id in leading_newline {
        if let Some(mut node) = doc.tree.get_mut(id) {
            if let Node::Text(t) = node.value() {
                t.text = format!("\n{}", &**t).into();
            }
        }
    }

    // No trailing newline: text after </html> would be re-parsed into <body>.
    format!("<!DOCTYPE html>\n{}", doc.root_element().html())
}

fn strip_vendor_constructs(markup: &str) -> String {
    let re = regex!(r"(?i)<!\[(?:if[^\]]*|endif)\]>|</?o:p\s*>");
    re.replace_all(markup, "").into_owned()
}
