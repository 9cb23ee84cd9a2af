//! File loading and order-preserving aggregation.

use std::path::{Path, PathBuf};

use futures_util::future;

use super::directives::DirectiveSet;
use super::error::RenderError;
use super::options::RenderOptions;

/// How file contents are read. Selected once per renderer from the `tags`
/// option and fixed for the renderer's lifetime; the `before_load` hook may
/// swap it for a single invocation.
#[derive(Clone)]
pub enum FileLoader {
    /// Read file contents verbatim.
    Plain,
    /// Read file contents, then expand inline directives.
    Directives(DirectiveSet),
}

impl FileLoader {
    /// Select the loader variant from the `tags` option.
    pub fn from_options(tags: bool, directives: DirectiveSet) -> Self {
        if tags {
            Self::Directives(directives)
        } else {
            Self::Plain
        }
    }

    /// Load one file as text, applying directive substitution when
    /// configured. Read failures carry the failing path.
    pub async fn load(&self, path: &Path, options: &RenderOptions) -> Result<String, RenderError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RenderError::io(path, e))?;
        match self {
            Self::Plain => Ok(text),
            Self::Directives(set) => {
                set.expand(&text, options)
                    .map_err(|source| RenderError::Directive {
                        path: path.to_path_buf(),
                        source,
                    })
            }
        }
    }
}

/// Read every file concurrently and concatenate the results in declaration
/// order.
///
/// The join is index-ordered: `try_join_all` yields results in the order the
/// futures were given, never in I/O completion order, so the aggregated
/// content always reflects the caller's file order. The first failed read
/// aborts the whole aggregation with no partial result.
pub async fn aggregate(
    loader: &FileLoader,
    files: &[PathBuf],
    options: &RenderOptions,
) -> Result<String, RenderError> {
    let reads = files.iter().map(|file| loader.load(file, options));
    let chunks = future::try_join_all(reads).await?;
    Ok(chunks.concat())
}
