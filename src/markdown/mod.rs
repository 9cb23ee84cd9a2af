//! Default markdown content parser.
//!
//! Converts markdown to HTML with pulldown-cmark. Heading ids are generated
//! with the same slug rules as the structure stage, so table-of-contents
//! anchors resolve against the rendered output. Fenced code blocks go
//! through the syntax highlighter when effective highlighting is enabled.

pub mod highlight;

use std::collections::HashSet;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, html};

pub use highlight::Highlighter;

use crate::render::structure;
use crate::render::{ContentParser, RenderError, RenderOptions};

/// The markdown parser used when no custom parser is injected.
#[derive(Default)]
pub struct MarkdownParser {
    highlighter: Highlighter,
}

impl MarkdownParser {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentParser for MarkdownParser {
    fn parse(&self, content: &str, options: &RenderOptions) -> Result<String, RenderError> {
        Ok(render_markdown(content, options, &self.highlighter))
    }
}

fn render_markdown(markdown: &str, options: &RenderOptions, highlighter: &Highlighter) -> String {
    let cmark_options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES;

    let parser = Parser::new_ext(markdown, cmark_options);

    // Intercept code blocks for highlighting and headings for id injection.
    let mut in_code_block = false;
    let mut code_language = String::new();
    let mut code_content = String::new();

    let mut in_heading: Option<pulldown_cmark::HeadingLevel> = None;
    let mut heading_text = String::new();
    let mut used_ids: HashSet<String> = HashSet::new();

    let events: Vec<Event> = parser
        .flat_map(|event| match event {
            Event::Start(Tag::Heading { level, ref id, .. }) => {
                // An explicit id from heading attributes passes through.
                if let Some(existing) = id {
                    used_ids.insert(existing.to_string());
                    return vec![event];
                }
                in_heading = Some(level);
                heading_text.clear();
                vec![]
            }
            Event::End(TagEnd::Heading(_)) if in_heading.is_some() => {
                let level = in_heading.take().unwrap() as usize;
                let id = structure::unique_slug(&heading_text, &mut used_ids);
                vec![Event::Html(
                    format!("<h{level} id=\"{id}\">{heading_text}</h{level}>").into(),
                )]
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                in_code_block = true;
                code_language = match kind {
                    CodeBlockKind::Fenced(lang) => lang.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                code_content.clear();
                vec![]
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                let block = if options.effective_highlight() {
                    highlighter.highlight(&code_content, &code_language)
                } else {
                    highlight::plain_block(&code_content, &code_language)
                };
                vec![Event::Html(block.into())]
            }
            Event::Text(text) if in_code_block => {
                code_content.push_str(&text);
                vec![]
            }
            Event::Text(text) if in_heading.is_some() => {
                heading_text.push_str(&text);
                vec![]
            }
            Event::Code(ref code) if in_heading.is_some() => {
                heading_text.push_str(code);
                vec![]
            }
            _ => vec![event],
        })
        .collect();

    let mut output = String::new();
    html::push_html(&mut output, events.into_iter());
    output
}
