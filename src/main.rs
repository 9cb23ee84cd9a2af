use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;

use quire::config::Config;
use quire::markdown::MarkdownParser;
use quire::render::{
    DirectiveSet, FileSink, OptionOverrides, Renderer, StyleChoice, ValueDirective,
};

/// Render one or more text documents into a single templated output file.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Input files, aggregated in the order given
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Name of the output artifact (defaults to the first input's base name)
    #[arg(short, long)]
    output: Option<String>,

    /// Directory the rendered file is written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// The path to the configuration file
    #[arg(short, long, default_value = "quire.yaml")]
    config_file: PathBuf,

    /// Template to render with (overrides the config file)
    #[arg(long)]
    template: Option<String>,

    /// Explicit document title
    #[arg(long)]
    title: Option<String>,

    /// Style sheet to use from the styles directory
    #[arg(long)]
    style: Option<String>,

    /// Pass the minify flag through to the template context
    #[arg(long)]
    minify: bool,

    /// Disable syntax highlighting
    #[arg(long)]
    no_highlight: bool,

    /// Do not promote front matter metadata into the render options
    #[arg(long)]
    no_front_matter: bool,

    /// Load files verbatim instead of expanding inline directives
    #[arg(long)]
    no_tags: bool,

    /// Define a value for `@{key}` directive substitution
    #[arg(long = "define", value_name = "KEY=VALUE")]
    defines: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    env_logger::init();
    let args = Args::parse();

    let mut config = Config::load(&args.config_file)?;
    if args.template.is_some() {
        config.template = args.template.clone();
    }

    let mut directives = DirectiveSet::new();
    if !args.defines.is_empty() {
        let mut values = BTreeMap::new();
        for define in &args.defines {
            let (key, value) = define.split_once('=').ok_or_else(|| {
                anyhow::anyhow!("invalid --define '{define}', expected KEY=VALUE")
            })?;
            values.insert(key.to_string(), value.to_string());
        }
        directives.push(ValueDirective::new(values));
    }

    let mut renderer_config = config.into_renderer_config(directives);
    // The binary ships a highlighter, so the capability flag is on.
    renderer_config.options.require_highlight = Some(true);
    // Loader selection is fixed at construction.
    if args.no_tags {
        renderer_config.options.tags = Some(false);
    }

    let mut overrides = OptionOverrides {
        title: args.title.clone(),
        output_name: args.output.clone(),
        style: args.style.clone().map(StyleChoice::Named),
        ..Default::default()
    };
    if args.minify {
        overrides.minify = Some(true);
    }
    if args.no_highlight {
        overrides.highlight = Some(false);
    }
    if args.no_front_matter {
        overrides.front_matter = Some(false);
    }

    let sink = FileSink::new(&args.out_dir);
    let output_path_for = |name: &str| args.out_dir.join(format!("{name}.html"));

    let renderer = Renderer::new(
        renderer_config,
        Box::new(MarkdownParser::new()),
        Box::new(sink),
    )?;
    let rendered = renderer.render_file(&args.files, Some(overrides)).await?;

    println!(
        "Rendered {} file(s) to {}",
        args.files.len(),
        output_path_for(&rendered.output_name).display()
    );

    Ok(())
}
