//! Render options and their layered merge rules.
//!
//! An effective option set is built per invocation by overlaying, in
//! increasing priority: process defaults, constructor overrides, per-call
//! overrides, and metadata promoted from the document's front matter.
//! Recognized keys are typed fields; anything else flows through the open
//! `extra` map so templates and sinks can consume caller-defined fields.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Open-ended key/value mapping carried alongside the typed options.
pub type ExtraMap = BTreeMap<String, serde_yaml::Value>;

/// Style-sheet selection.
///
/// Deserializes from a bool (`false` = off, `true` = the default sheet) or
/// a string naming a sheet in the styles directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleChoice {
    /// No style sheet in the template context.
    Off,
    /// The default style sheet.
    Default,
    /// A specific sheet, resolved against the styles directory per render.
    Named(String),
}

impl Serialize for StyleChoice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Off => serializer.serialize_bool(false),
            Self::Default => serializer.serialize_bool(true),
            Self::Named(name) => serializer.serialize_str(name),
        }
    }
}

impl<'de> Deserialize<'de> for StyleChoice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Flag(bool),
            Name(String),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Flag(false) => Self::Off,
            Repr::Flag(true) => Self::Default,
            Repr::Name(name) => Self::Named(name),
        })
    }
}

/// The effective configuration for one render invocation.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Request syntax highlighting. Only effective when the caller also set
    /// `require_highlight` (see [`RenderOptions::effective_highlight`]).
    pub highlight: bool,
    /// Style-sheet selection, resolved against the styles directory.
    pub style: StyleChoice,
    /// Passed through opaquely for the output sink to interpret.
    pub minify: bool,
    /// Selects the directive-substituting file loader. Read once at renderer
    /// construction; changing it afterwards has no effect.
    pub tags: bool,
    /// Promote extracted front matter metadata into these options.
    pub front_matter: bool,
    /// Opaque flag exposed to templates as `koala`.
    pub koala: bool,
    /// Capability flag: the caller ships a highlighter. Highlighting is only
    /// performed when both this and `highlight` are set.
    pub require_highlight: bool,
    /// Path injected into the template context as `resources_path`.
    pub resources_path: PathBuf,
    /// Explicit document title. Takes priority over detection and filename
    /// fallback.
    pub title: Option<String>,
    /// Base name of the output artifact. Defaults to the first input file's
    /// stem when absent.
    pub output_name: Option<String>,
    /// Unrecognized keys, passed through to the template context.
    pub extra: ExtraMap,
}

impl RenderOptions {
    /// The process-wide default option set.
    pub fn defaults(resources_path: impl Into<PathBuf>) -> Self {
        Self {
            highlight: true,
            style: StyleChoice::Default,
            minify: false,
            tags: true,
            front_matter: true,
            koala: false,
            require_highlight: false,
            resources_path: resources_path.into(),
            title: None,
            output_name: None,
            extra: ExtraMap::new(),
        }
    }

    /// Overlay a set of overrides, key-for-key. `None` fields leave the
    /// current value untouched; `extra` entries are merged over.
    pub fn overlay(&mut self, overrides: &OptionOverrides) {
        if let Some(v) = overrides.highlight {
            self.highlight = v;
        }
        if let Some(v) = &overrides.style {
            self.style = v.clone();
        }
        if let Some(v) = overrides.minify {
            self.minify = v;
        }
        if let Some(v) = overrides.tags {
            self.tags = v;
        }
        if let Some(v) = overrides.front_matter {
            self.front_matter = v;
        }
        if let Some(v) = overrides.koala {
            self.koala = v;
        }
        if let Some(v) = overrides.require_highlight {
            self.require_highlight = v;
        }
        if let Some(v) = &overrides.resources_path {
            self.resources_path = v.clone();
        }
        if let Some(v) = &overrides.title {
            self.title = Some(v.clone());
        }
        if let Some(v) = &overrides.output_name {
            self.output_name = Some(v.clone());
        }
        self.extra
            .extend(overrides.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Merge front matter metadata into the options. Metadata is the
    /// highest-priority layer: recognized keys override whatever earlier
    /// layers set, unrecognized keys land in `extra`.
    ///
    /// `tags` is not recognized here since the loader variant is fixed at
    /// construction and cannot change mid-render.
    pub fn promote_metadata(&mut self, metadata: ExtraMap) {
        for (key, value) in metadata {
            match key.as_str() {
                "title" => {
                    if let Some(s) = value.as_str() {
                        self.title = Some(s.to_string());
                    }
                }
                "output" => {
                    if let Some(s) = value.as_str() {
                        self.output_name = Some(s.to_string());
                    }
                }
                "style" => {
                    if let Ok(choice) = serde_yaml::from_value::<StyleChoice>(value) {
                        self.style = choice;
                    }
                }
                "highlight" => {
                    if let Some(b) = value.as_bool() {
                        self.highlight = b;
                    }
                }
                "minify" => {
                    if let Some(b) = value.as_bool() {
                        self.minify = b;
                    }
                }
                "koala" => {
                    if let Some(b) = value.as_bool() {
                        self.koala = b;
                    }
                }
                _ => {
                    self.extra.insert(key, value);
                }
            }
        }
    }

    /// Highlighting requested and the capability is present.
    pub fn effective_highlight(&self) -> bool {
        self.highlight && self.require_highlight
    }
}

/// A partial option set layered over lower-priority layers.
///
/// Used for constructor-supplied and per-call overrides, and deserializable
/// from the config file. Unknown keys deserialize into `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionOverrides {
    pub highlight: Option<bool>,
    pub style: Option<StyleChoice>,
    pub minify: Option<bool>,
    pub tags: Option<bool>,
    pub front_matter: Option<bool>,
    pub koala: Option<bool>,
    pub require_highlight: Option<bool>,
    pub resources_path: Option<PathBuf>,
    pub title: Option<String>,
    pub output_name: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraMap,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let options = RenderOptions::defaults("/res");
        assert!(options.highlight);
        assert_eq!(options.style, StyleChoice::Default);
        assert!(!options.minify);
        assert!(options.tags);
        assert!(options.front_matter);
        assert!(!options.koala);
        assert!(!options.require_highlight);
        assert_eq!(options.resources_path, PathBuf::from("/res"));
    }

    #[test]
    fn overlay_is_key_for_key() {
        let mut options = RenderOptions::defaults("/res");
        let overrides = OptionOverrides {
            highlight: Some(false),
            title: Some("Hello".to_string()),
            ..Default::default()
        };
        options.overlay(&overrides);
        assert!(!options.highlight);
        assert_eq!(options.title.as_deref(), Some("Hello"));
        // Untouched fields keep their previous values.
        assert!(options.tags);
        assert_eq!(options.style, StyleChoice::Default);
    }

    #[test]
    fn later_layers_win() {
        let mut options = RenderOptions::defaults("/res");
        options.overlay(&OptionOverrides {
            title: Some("constructor".to_string()),
            minify: Some(true),
            ..Default::default()
        });
        options.overlay(&OptionOverrides {
            title: Some("per-call".to_string()),
            ..Default::default()
        });
        assert_eq!(options.title.as_deref(), Some("per-call"));
        assert!(options.minify);
    }

    #[test]
    fn metadata_is_highest_priority() {
        let mut options = RenderOptions::defaults("/res");
        options.title = Some("earlier".to_string());

        let mut metadata = ExtraMap::new();
        metadata.insert(
            "title".to_string(),
            serde_yaml::Value::String("from front matter".to_string()),
        );
        metadata.insert("highlight".to_string(), serde_yaml::Value::Bool(false));
        metadata.insert(
            "author".to_string(),
            serde_yaml::Value::String("someone".to_string()),
        );
        options.promote_metadata(metadata);

        assert_eq!(options.title.as_deref(), Some("from front matter"));
        assert!(!options.highlight);
        // Unrecognized keys pass through opaquely.
        assert_eq!(
            options.extra.get("author").and_then(|v| v.as_str()),
            Some("someone")
        );
    }

    #[test]
    fn metadata_style_accepts_bool_and_string() {
        let mut options = RenderOptions::defaults("/res");
        let mut metadata = ExtraMap::new();
        metadata.insert("style".to_string(), serde_yaml::Value::Bool(false));
        options.promote_metadata(metadata);
        assert_eq!(options.style, StyleChoice::Off);

        let mut metadata = ExtraMap::new();
        metadata.insert(
            "style".to_string(),
            serde_yaml::Value::String("dark.css".to_string()),
        );
        options.promote_metadata(metadata);
        assert_eq!(options.style, StyleChoice::Named("dark.css".to_string()));
    }

    #[test]
    fn effective_highlight_needs_capability() {
        let mut options = RenderOptions::defaults("/res");
        assert!(options.highlight);
        assert!(!options.effective_highlight());
        options.require_highlight = true;
        assert!(options.effective_highlight());
        options.highlight = false;
        assert!(!options.effective_highlight());
    }

    #[test]
    fn style_choice_deserializes_from_yaml() {
        assert_eq!(
            serde_yaml::from_str::<StyleChoice>("false").unwrap(),
            StyleChoice::Off
        );
        assert_eq!(
            serde_yaml::from_str::<StyleChoice>("true").unwrap(),
            StyleChoice::Default
        );
        assert_eq!(
            serde_yaml::from_str::<StyleChoice>("dark.css").unwrap(),
            StyleChoice::Named("dark.css".to_string())
        );
    }
}
