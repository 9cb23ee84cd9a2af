//! The rendering pipeline.
//!
//! One invocation converts an ordered set of input files into a single
//! rendered artifact through a fixed sequence of stages:
//!
//! 1. Options merge (defaults, constructor overrides, per-call overrides)
//! 2. Load and aggregate (ordered concurrent reads, optional directive pass)
//! 3. Front matter strip (metadata promoted into the options)
//! 4. Structure extraction (table of contents)
//! 5. Content transformation (the injected parser)
//! 6. Template data assembly (title, style, highlight resolution)
//! 7. Template rendering (Tera)
//! 8. Emission (the output sink, exactly once per successful render)
//!
//! Stages run strictly in order; each stage's output is the next stage's
//! sole input, and no stage re-enters an earlier one. All intermediate state
//! is invocation-local, so distinct renders may run concurrently without
//! coordination.
//!
//! Extension points: the content parser is injected at construction, the
//! directive handler list is appendable until construction, and the output
//! sink's `before_load` / `before_render` / `emit` hooks are overridable
//! no-ops (see [`OutputSink`]).

pub mod directives;
pub mod error;
pub mod front_matter;
pub mod load;
pub mod options;
pub mod sink;
pub mod structure;
pub mod template;
pub mod title;

use std::path::{Path, PathBuf};

use log::debug;

pub use directives::{DirectiveError, DirectiveHandler, DirectiveSet, ValueDirective};
pub use error::RenderError;
pub use load::FileLoader;
pub use options::{ExtraMap, OptionOverrides, RenderOptions, StyleChoice};
pub use sink::{FileSink, MemorySink, NullSink, OutputSink};
pub use structure::TocEntry;
pub use template::{DEFAULT_STYLE, TemplateData, TemplateEngine};

/// Converts preprocessed content into final renderable content.
///
/// The pipeline imposes no grammar here; the default implementation is
/// [`crate::markdown::MarkdownParser`]. Failures are fatal to the render.
pub trait ContentParser: Send + Sync {
    fn parse(&self, content: &str, options: &RenderOptions) -> Result<String, RenderError>;
}

/// Parser that passes content through untouched.
pub struct PassthroughParser;

impl ContentParser for PassthroughParser {
    fn parse(&self, content: &str, _options: &RenderOptions) -> Result<String, RenderError> {
        Ok(content.to_string())
    }
}

/// Construction-time configuration for a [`Renderer`].
pub struct RendererConfig {
    /// Options layered over the process defaults.
    pub options: OptionOverrides,
    /// Template name resolved against `templates_dir`. `None` means the
    /// renderer cannot reach the template stage.
    pub template: Option<String>,
    pub templates_dir: PathBuf,
    pub styles_dir: PathBuf,
    pub resources_dir: PathBuf,
    /// Directive handlers used when the `tags` option is enabled. Appendable
    /// until construction, fixed thereafter.
    pub directives: DirectiveSet,
}

impl RendererConfig {
    pub fn new(
        templates_dir: impl Into<PathBuf>,
        styles_dir: impl Into<PathBuf>,
        resources_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            options: OptionOverrides::default(),
            template: None,
            templates_dir: templates_dir.into(),
            styles_dir: styles_dir.into(),
            resources_dir: resources_dir.into(),
            directives: DirectiveSet::new(),
        }
    }
}

/// A successful render.
#[derive(Debug)]
pub struct Rendered {
    /// The rendered text, as handed to the sink.
    pub text: String,
    /// The resolved output name (explicit option, or the first input file's
    /// stem).
    pub output_name: String,
}

/// The pipeline orchestrator. See the module docs for the stage sequence.
pub struct Renderer {
    options: RenderOptions,
    loader: FileLoader,
    engine: TemplateEngine,
    parser: Box<dyn ContentParser>,
    sink: Box<dyn OutputSink>,
    styles_dir: PathBuf,
}

impl Renderer {
    /// Build a renderer. The loader variant (from the `tags` option) and the
    /// template are fixed here for the renderer's lifetime.
    pub fn new(
        config: RendererConfig,
        parser: Box<dyn ContentParser>,
        sink: Box<dyn OutputSink>,
    ) -> Result<Self, RenderError> {
        let mut options = RenderOptions::defaults(config.resources_dir);
        options.overlay(&config.options);
        let loader = FileLoader::from_options(options.tags, config.directives);
        let engine = TemplateEngine::new(&config.templates_dir, config.template)?;
        Ok(Self {
            options,
            loader,
            engine,
            parser,
            sink,
            styles_dir: config.styles_dir,
        })
    }

    /// Whether this renderer was configured with a template.
    pub fn has_template(&self) -> bool {
        self.engine.has_template()
    }

    /// Render an ordered set of files into one artifact.
    ///
    /// `overrides` merges over the construction-time options for this call
    /// only. The first fatal error short-circuits the remaining stages; the
    /// sink's `emit` runs only on success.
    pub async fn render_file(
        &self,
        files: &[PathBuf],
        overrides: Option<OptionOverrides>,
    ) -> Result<Rendered, RenderError> {
        let mut files = files.to_vec();
        if files.is_empty() {
            return Err(RenderError::NoInput);
        }

        let mut options = self.options.clone();
        if let Some(overrides) = &overrides {
            options.overlay(overrides);
        }
        if options.output_name.is_none() {
            options.output_name = Some(title::from_path(&files[0]));
        }

        let mut loader = self.loader.clone();
        self.sink.before_load(&mut files, &mut loader);

        debug!("loading {} file(s)", files.len());
        let raw = load::aggregate(&loader, &files, &options).await?;

        let extracted = front_matter::extract(&raw);
        if options.front_matter {
            options.promote_metadata(extracted.metadata);
        }
        let structured = structure::annotate(&extracted.body);
        debug!("extracted {} heading(s)", structured.toc.len());

        let parsed = self.parser.parse(&structured.content, &options)?;

        let styles = template::installed_styles(&self.styles_dir);
        let data = template::assemble(&parsed, structured.toc, &options, &styles);
        let mut context = tera::Context::from_serialize(&data)?;
        self.sink.before_render(&mut context);

        let rendered = self.engine.render(&context)?;

        let output_name = options.output_name.unwrap_or_default();
        self.sink.emit(&rendered, &output_name)?;

        Ok(Rendered {
            text: rendered,
            output_name,
        })
    }

    /// Convenience wrapper for rendering a single file.
    pub async fn render_one(
        &self,
        file: &Path,
        overrides: Option<OptionOverrides>,
    ) -> Result<Rendered, RenderError> {
        self.render_file(&[file.to_path_buf()], overrides).await
    }
}
