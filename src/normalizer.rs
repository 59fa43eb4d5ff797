//! Content Normalizer
//!
//! Flattens captured HTML into newline-separated text for the language
//! model. Boilerplate subtrees (scripts, media, page chrome, controls) are
//! skipped entirely; every remaining text node is split into lines, and each
//! line is trimmed and kept when it has at least [`MIN_LINE_CHARS`]
//! characters, which drops icon glyphs and separators.
//!
//! Pure and deterministic: no I/O, no state.

use ego_tree::iter::Edge;
use ego_tree::NodeId;
use scraper::{Html, Node};
use serde::Serialize;
use std::fmt;

use crate::fetcher::RawProfileBundle;

/// Elements whose whole subtree is dropped before text extraction.
pub const REMOVED_ELEMENTS: &[&str] = &[
    "script", "style", "svg", "img", "video", "audio", "iframe", "noscript", "input", "form",
    "footer", "header", "nav", "button", "code",
];

/// Shortest text line kept, in characters.
pub const MIN_LINE_CHARS: usize = 3;

/// Ordered, trimmed text lines joined with `\n`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.0.lines()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize every source of a profile bundle, in bundle order.
#[must_use]
pub fn normalize_bundle(bundle: &RawProfileBundle) -> NormalizedText {
    normalize(&bundle.to_html())
}

/// Extract visible text from an HTML document or fragment.
#[must_use]
pub fn normalize(html: &str) -> NormalizedText {
    let document = Html::parse_document(html);

    let mut lines: Vec<&str> = Vec::new();
    // Root of the removed subtree currently being skipped
    let mut skipping: Option<NodeId> = None;

    for edge in document.tree.root().traverse() {
        match edge {
            Edge::Open(node) => {
                if skipping.is_some() {
                    continue;
                }
                match node.value() {
                    Node::Element(element) if REMOVED_ELEMENTS.contains(&element.name()) => {
                        skipping = Some(node.id());
                    }
                    Node::Text(text) => {
                        // One text node can span several rendered lines
                        lines.extend(
                            text.lines()
                                .map(str::trim)
                                .filter(|line| line.chars().count() >= MIN_LINE_CHARS),
                        );
                    }
                    _ => {}
                }
            }
            Edge::Close(node) => {
                if skipping == Some(node.id()) {
                    skipping = None;
                }
            }
        }
    }

    log::debug!(
        "Normalized {} bytes of HTML into {} lines",
        html.len(),
        lines.len()
    );

    NormalizedText(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_visible_text_in_document_order() {
        let html = r#"<html><body>
            <h1>Jane Doe</h1>
            <p>Senior Engineer at Acme</p>
            <section><span>Berlin, Germany</span></section>
        </body></html>"#;

        assert_eq!(
            normalize(html).as_str(),
            "Jane Doe\nSenior Engineer at Acme\nBerlin, Germany"
        );
    }

    #[test]
    fn drops_boilerplate_subtrees() {
        let html = r#"<html><head><style>.x { color: red }</style></head><body>
            <header><a>Home Header Link</a></header>
            <nav><ul><li>Jobs Menu</li></ul></nav>
            <script>window.tracking = "payload";</script>
            <main>
              <p>About this person</p>
              <button><span>Show more</span></button>
              <form><label>Search field</label><input value="typed text"></form>
              <svg><text>Chart label</text></svg>
              <pre><code>fn main() {}</code></pre>
            </main>
            <footer>Footer copyright</footer>
        </body></html>"#;

        assert_eq!(normalize(html).as_str(), "About this person");
    }

    #[test]
    fn filters_short_and_blank_lines() {
        let html = "<div><span>·</span><span>  </span><span>OK</span><span>Rust</span>\n\n<span> Go! </span></div>";
        assert_eq!(normalize(html).as_str(), "Rust\nGo!");
    }

    #[test]
    fn splits_multi_line_text_nodes() {
        let html = "<p>Senior Engineer\n\n      at</p><span>Acme Corp\n x</span><p>\tBerlin\r\n  Germany  </p>";
        assert_eq!(
            normalize(html).as_str(),
            "Senior Engineer\nAcme Corp\nBerlin\nGermany"
        );
    }

    #[test]
    fn counts_characters_not_bytes() {
        // Two multi-byte chars are still too short
        assert!(normalize("<p>日本</p>").is_empty());
        assert_eq!(normalize("<p>日本語</p>").as_str(), "日本語");
    }

    #[test]
    fn comments_and_markers_are_not_text() {
        let html = "<p>Main section</p>\n\n<!-- SKILLS PAGE START -->\n\n<p>Kubernetes</p>";
        assert_eq!(normalize(html).as_str(), "Main section\nKubernetes");
    }

    #[test]
    fn empty_input_yields_empty_text() {
        assert!(normalize("").is_empty());
        assert_eq!(normalize("").char_count(), 0);
    }
}
