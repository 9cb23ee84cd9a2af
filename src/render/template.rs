//! Template engine wrapper and template data assembly.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tera::Tera;

use super::error::RenderError;
use super::options::{ExtraMap, RenderOptions, StyleChoice};
use super::structure::TocEntry;
use super::title;

/// Style sheet used when the requested one is not installed.
pub const DEFAULT_STYLE: &str = "github.css";

/// Wraps Tera with a template fixed at construction.
pub struct TemplateEngine {
    tera: Tera,
    template: Option<String>,
}

impl TemplateEngine {
    /// Load every template under `templates_dir`. `template` names the one
    /// rendered per invocation; `None` means the renderer cannot reach the
    /// template stage.
    pub fn new(templates_dir: &Path, template: Option<String>) -> Result<Self, RenderError> {
        let glob = templates_dir.join("**/*.html");
        let tera = Tera::new(&glob.to_string_lossy())?;
        Ok(Self { tera, template })
    }

    pub fn has_template(&self) -> bool {
        self.template.is_some()
    }

    /// Render the configured template with the assembled context.
    pub fn render(&self, context: &tera::Context) -> Result<String, RenderError> {
        let template = self.template.as_deref().ok_or(RenderError::MissingTemplate)?;
        Ok(self.tera.render(template, context)?)
    }
}

/// Enumerate installed style-sheet identifiers (file names in the styles
/// directory). A missing directory is an empty catalog, not an error.
pub fn installed_styles(styles_dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(styles_dir) else {
        return Vec::new();
    };
    let mut styles: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    styles.sort();
    styles
}

/// The key/value context handed to the template engine.
///
/// Caller extension fields from the options' `extra` map are flattened to
/// the top level.
#[derive(Debug, Serialize)]
pub struct TemplateData {
    pub title: String,
    pub content: String,
    pub toc: Vec<TocEntry>,
    pub style: bool,
    pub style_file: String,
    pub highlight: bool,
    pub minify: bool,
    pub koala: bool,
    pub resources_path: PathBuf,
    #[serde(flatten)]
    pub extra: ExtraMap,
}

/// Resolve presentation options and title into the final template data.
///
/// Title priority: explicit option, then detection from the parsed content,
/// then the output name with its extension stripped. Style resolution checks
/// the named sheet against the installed catalog; a miss records the default
/// sheet. Effective highlighting requires both the `highlight` option and
/// the caller's capability flag.
pub fn assemble(
    parsed: &str,
    toc: Vec<TocEntry>,
    options: &RenderOptions,
    styles: &[String],
) -> TemplateData {
    let (style, style_file) = match &options.style {
        StyleChoice::Off => (false, DEFAULT_STYLE.to_string()),
        StyleChoice::Default => (true, DEFAULT_STYLE.to_string()),
        StyleChoice::Named(name) => {
            if styles.iter().any(|s| s == name) {
                (true, name.clone())
            } else {
                (true, DEFAULT_STYLE.to_string())
            }
        }
    };

    let title = options
        .title
        .clone()
        .or_else(|| title::detect(parsed))
        .or_else(|| {
            options
                .output_name
                .as_deref()
                .map(|name| title::from_path(Path::new(name)))
        })
        .unwrap_or_default();

    TemplateData {
        title,
        content: parsed.to_string(),
        toc,
        style,
        style_file,
        highlight: options.effective_highlight(),
        minify: options.minify,
        koala: options.koala,
        resources_path: options.resources_path.clone(),
        extra: options.extra.clone(),
    }
}
