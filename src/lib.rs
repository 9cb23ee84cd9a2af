//! `quire` renders one or more text files into a single templated output
//! file.
//!
//! The pipeline aggregates file contents in declaration order (optionally
//! expanding inline directives while loading), strips front matter metadata
//! into the render options, extracts a table of contents, delegates content
//! transformation to a pluggable parser, and hands the assembled context to
//! a Tera template. Extension points (`before_load`, `before_render`, the
//! output sink) are trait methods with no-op defaults.
//!
//! ```no_run
//! use quire::markdown::MarkdownParser;
//! use quire::render::{NullSink, Renderer, RendererConfig};
//!
//! # async fn demo() -> Result<(), quire::render::RenderError> {
//! let mut config = RendererConfig::new("templates", "styles", "resources");
//! config.template = Some("page.html".into());
//!
//! let renderer = Renderer::new(config, Box::new(MarkdownParser::new()), Box::new(NullSink))?;
//! let rendered = renderer.render_file(&["README.md".into()], None).await?;
//! println!("{}", rendered.text);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod markdown;
pub mod render;
