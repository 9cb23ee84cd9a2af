//! Output sinks and per-render extension hooks.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use super::error::RenderError;
use super::load::FileLoader;

/// Per-render extension points and the output sink.
///
/// Every method has a no-op default; implementations override the ones they
/// care about. The orchestrator calls `before_load` once before any file is
/// read, `before_render` once after the template context is assembled, and
/// `emit` exactly once per successful render.
pub trait OutputSink: Send + Sync {
    /// May rewrite the file list or swap the loader for this render.
    fn before_load(&self, _files: &mut Vec<PathBuf>, _loader: &mut FileLoader) {}

    /// May inject or rewrite template context fields before rendering.
    fn before_render(&self, _context: &mut tera::Context) {}

    /// Receives the rendered text and the resolved output name.
    fn emit(&self, _rendered: &str, _output_name: &str) -> Result<(), RenderError> {
        Ok(())
    }
}

impl<T: OutputSink + ?Sized> OutputSink for Arc<T> {
    fn before_load(&self, files: &mut Vec<PathBuf>, loader: &mut FileLoader) {
        (**self).before_load(files, loader);
    }

    fn before_render(&self, context: &mut tera::Context) {
        (**self).before_render(context);
    }

    fn emit(&self, rendered: &str, output_name: &str) -> Result<(), RenderError> {
        (**self).emit(rendered, output_name)
    }
}

/// Sink that discards the rendered output; callers use the returned text.
pub struct NullSink;

impl OutputSink for NullSink {}

/// Sink that writes `<name>.html` under a directory, creating parents as
/// needed.
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The path a given output name will be written to.
    pub fn path_for(&self, output_name: &str) -> PathBuf {
        self.dir.join(format!("{output_name}.html"))
    }
}

impl OutputSink for FileSink {
    fn emit(&self, rendered: &str, output_name: &str) -> Result<(), RenderError> {
        let path = self.path_for(output_name);
        let wrap = |source| RenderError::Output {
            name: output_name.to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(wrap)?;
        }
        std::fs::write(&path, rendered).map_err(wrap)
    }
}

/// Sink that captures the rendered output in memory.
#[derive(Default)]
pub struct MemorySink {
    slot: Mutex<Option<(String, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the captured `(output_name, rendered)` pair, if a render emitted.
    pub fn take(&self) -> Option<(String, String)> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl OutputSink for MemorySink {
    fn emit(&self, rendered: &str, output_name: &str) -> Result<(), RenderError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) =
            Some((output_name.to_string(), rendered.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sink_writes_and_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("nested/out"));
        sink.emit("<html></html>", "report").unwrap();

        let written = std::fs::read_to_string(dir.path().join("nested/out/report.html")).unwrap();
        assert_eq!(written, "<html></html>");
    }

    #[test]
    fn memory_sink_captures_once() {
        let sink = MemorySink::new();
        assert!(sink.take().is_none());
        sink.emit("text", "doc").unwrap();
        assert_eq!(sink.take(), Some(("doc".to_string(), "text".to_string())));
        assert!(sink.take().is_none());
    }

    #[test]
    fn default_hooks_are_no_ops() {
        let sink = NullSink;
        let mut files = vec![PathBuf::from("a.md")];
        let mut loader = FileLoader::Plain;
        sink.before_load(&mut files, &mut loader);
        assert_eq!(files, vec![PathBuf::from("a.md")]);
        assert!(sink.emit("text", "doc").is_ok());
    }
}
