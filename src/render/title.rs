//! Title detection and filename fallback.

use std::path::Path;

/// Detect a document title from parsed content.
///
/// Looks for the first `<h1>` element (what the default markdown parser
/// emits), then falls back to a leading `# ` heading for parsers that pass
/// markup through untouched.
pub fn detect(parsed: &str) -> Option<String> {
    if let Some(start) = parsed.find("<h1") {
        let rest = &parsed[start..];
        if let (Some(open_end), Some(close)) = (rest.find('>'), rest.find("</h1>")) {
            if close > open_end {
                let text = strip_tags(&rest[open_end + 1..close]);
                let text = text.trim();
                if !text.is_empty() {
                    return Some(text.to_string());
                }
            }
        }
    }

    for line in parsed.lines() {
        if let Some(rest) = line.trim_start().strip_prefix("# ") {
            let text = rest.trim();
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }

    None
}

/// Derive a name from a file path: base name with its extension stripped.
pub fn from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}
