//! Render pipeline error types.

use std::path::PathBuf;

use super::directives::DirectiveError;

/// Errors that abort a render.
///
/// Front matter extraction failures are deliberately absent: they are
/// reported as warnings and the pipeline continues with empty metadata.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("error reading file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no input files were given")]
    NoInput,

    #[error("directive expansion failed in {path}: {source}")]
    Directive {
        path: PathBuf,
        source: DirectiveError,
    },

    #[error("content parse error: {0}")]
    Parse(String),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("no template was configured for this renderer")]
    MissingTemplate,

    #[error("error writing output '{name}': {source}")]
    Output {
        name: String,
        source: std::io::Error,
    },
}

impl RenderError {
    /// Create an I/O error carrying the failing path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a content parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}
