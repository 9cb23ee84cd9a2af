//! Front matter extraction.
//!
//! Front matter is a YAML block delimited by `---` at the start of the
//! document:
//!
//! ```text
//! ---
//! title: My Page
//! author: someone
//! ---
//!
//! Content starts here
//! ```
//!
//! Extraction failures are never fatal: a malformed block is still removed
//! from the body, a warning is logged, and the metadata comes back empty.

use log::warn;

use super::options::ExtraMap;

/// Result of stripping front matter from aggregated content.
#[derive(Debug)]
pub struct Extracted {
    /// The content with the front matter block removed.
    pub body: String,
    /// Extracted key/value metadata. Empty when absent or unparseable.
    pub metadata: ExtraMap,
}

/// Strip a leading `---`-delimited YAML block and parse it into a mapping.
pub fn extract(raw: &str) -> Extracted {
    let content = raw.trim_start();

    if !content.starts_with("---") {
        return Extracted {
            body: content.to_string(),
            metadata: ExtraMap::new(),
        };
    }

    let after_opening = &content[3..];
    let Some(closing) = after_opening.find("\n---") else {
        // No closing delimiter, treat the whole thing as body.
        return Extracted {
            body: content.to_string(),
            metadata: ExtraMap::new(),
        };
    };

    let yaml = after_opening[..closing].trim_start_matches('\n');

    // Skip the opening "---", the block, and the closing "\n---".
    let body_start = 3 + closing + 4;
    let body = if body_start < content.len() {
        content[body_start..].trim_start_matches('\n').to_string()
    } else {
        String::new()
    };

    let metadata = if yaml.trim().is_empty() {
        ExtraMap::new()
    } else {
        match serde_yaml::from_str::<ExtraMap>(yaml) {
            Ok(map) => map,
            Err(e) => {
                warn!("failed to parse front matter, continuing without metadata: {e}");
                ExtraMap::new()
            }
        }
    };

    Extracted { body, metadata }
}
