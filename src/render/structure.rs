//! Structural (table of contents) extraction.
//!
//! Scans the preprocessed body for ATX headings, assigns each a unique slug
//! id, and replaces a `<!-- toc -->` marker with a rendered outline. Runs on
//! the markup text rather than parsed output because the content transformer
//! downstream is pluggable; the default markdown parser generates heading
//! ids with the same slug rules so anchors resolve.

use std::collections::HashSet;

use serde::Serialize;

/// Marker replaced with the rendered outline when present in the body.
pub const TOC_MARKER: &str = "<!-- toc -->";

/// A single entry in the extracted table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// The heading text.
    pub text: String,
    /// The heading id (for anchor links).
    pub id: String,
    /// The heading level (1-6).
    pub level: u8,
}

/// Content annotated with its extracted outline.
#[derive(Debug)]
pub struct Structured {
    pub content: String,
    pub toc: Vec<TocEntry>,
}

/// Extract the table of contents and expand the toc marker.
pub fn annotate(content: &str) -> Structured {
    let mut toc = Vec::new();
    let mut used = HashSet::new();
    let mut in_fence = false;

    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        let Some((level, text)) = parse_heading(trimmed) else {
            continue;
        };
        let id = unique_slug(&text, &mut used);
        toc.push(TocEntry { text, id, level });
    }

    let content = if content.contains(TOC_MARKER) {
        content.replace(TOC_MARKER, render_outline(&toc).trim_end())
    } else {
        content.to_string()
    };

    Structured { content, toc }
}

/// Parse an ATX heading line into (level, text).
fn parse_heading(line: &str) -> Option<(u8, String)> {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = line[hashes..].strip_prefix(' ')?;
    let mut text = rest.trim();

    // Strip an optional closing hash sequence ("## Title ##").
    let stripped = text.trim_end_matches('#');
    if stripped.len() != text.len() && stripped.ends_with(' ') {
        text = stripped.trim_end();
    }

    if text.is_empty() {
        return None;
    }
    Some((hashes as u8, text.to_string()))
}

fn render_outline(toc: &[TocEntry]) -> String {
    let Some(min_level) = toc.iter().map(|e| e.level).min() else {
        return String::new();
    };
    let mut out = String::new();
    for entry in toc {
        let indent = "  ".repeat(usize::from(entry.level - min_level));
        out.push_str(&format!("{indent}- [{}](#{})\n", entry.text, entry.id));
    }
    out
}

/// Convert a string to a slug suitable for use as an HTML id.
pub(crate) fn slugify(s: &str) -> String {
    s.to_lowercase()
        .replace(' ', "-")
        .replace(|c: char| !c.is_alphanumeric() && c != '-', "")
}

/// Slugify with duplicate suffixing ("-1", "-2", ...) against `used`.
pub(crate) fn unique_slug(text: &str, used: &mut HashSet<String>) -> String {
    let base = slugify(text);
    let mut id = base.clone();
    let mut suffix = 1;
    while !used.insert(id.clone()) {
        id = format!("{base}-{suffix}");
        suffix += 1;
    }
    id
}
