//! CLI-level configuration.
//!
//! An optional `quire.yaml` next to the project sets the template, the
//! template/styles/resources directories, and default option overrides.
//! Relative directories resolve against the config file's directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::render::{DirectiveSet, OptionOverrides, RendererConfig};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Settings loaded from `quire.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding Tera templates.
    pub templates_dir: PathBuf,
    /// Directory enumerated for installed style sheets.
    pub styles_dir: PathBuf,
    /// Directory injected into the template context as `resources_path`.
    pub resources_dir: PathBuf,
    /// Template rendered for each invocation.
    pub template: Option<String>,
    /// Default option overrides applied to every render.
    pub options: OptionOverrides,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            templates_dir: "templates".into(),
            styles_dir: "styles".into(),
            resources_dir: "resources".into(),
            template: Some("page.html".into()),
            options: OptionOverrides::default(),
        }
    }
}

impl Config {
    /// Load from the given path, or return defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        config.resolve_against(&base_path(path));
        Ok(config)
    }

    /// Convert into the renderer's construction-time configuration.
    pub fn into_renderer_config(self, directives: DirectiveSet) -> RendererConfig {
        RendererConfig {
            options: self.options,
            template: self.template,
            templates_dir: self.templates_dir,
            styles_dir: self.styles_dir,
            resources_dir: self.resources_dir,
            directives,
        }
    }

    fn resolve_against(&mut self, base: &Path) {
        for dir in [
            &mut self.templates_dir,
            &mut self.styles_dir,
            &mut self.resources_dir,
        ] {
            if dir.is_relative() {
                let resolved = base.join(&*dir);
                *dir = resolved;
            }
        }
    }
}

/// The directory containing the config file, for resolving relative paths.
fn base_path(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = Config::load(Path::new("/definitely/not/here/quire.yaml")).unwrap();
        assert_eq!(config.template.as_deref(), Some("page.html"));
        assert_eq!(config.templates_dir, PathBuf::from("templates"));
    }

    #[test]
    fn relative_dirs_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quire.yaml");
        std::fs::write(&path, "templates_dir: tpl\nstyles_dir: /abs/styles\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.templates_dir, dir.path().join("tpl"));
        assert_eq!(config.styles_dir, PathBuf::from("/abs/styles"));
        // Defaulted directories resolve too.
        assert_eq!(config.resources_dir, dir.path().join("resources"));
    }

    #[test]
    fn option_overrides_deserialize() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quire.yaml");
        std::fs::write(
            &path,
            "options:\n  highlight: false\n  style: dark.css\n  banner: hello\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.options.highlight, Some(false));
        assert_eq!(
            config.options.style,
            Some(crate::render::StyleChoice::Named("dark.css".to_string()))
        );
        // Unknown keys land in the open extra map.
        assert!(config.options.extra.contains_key("banner"));
    }

    #[test]
    fn malformed_config_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quire.yaml");
        std::fs::write(&path, "template: [oops\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
