//! Code block highlighting for the default markdown parser.

use autumnus::{HtmlLinkedBuilder, formatter::Formatter, languages::Language};

/// Highlights fenced code blocks to HTML with CSS classes.
///
/// Falls back to an escaped plain `<code>` block for unknown languages or
/// formatter failures.
#[derive(Default)]
pub struct Highlighter;

impl Highlighter {
    pub fn highlight(&self, code: &str, language: &str) -> String {
        let lang = Language::guess(language, code);

        // Language::guess falls back to PlainText for anything unknown; a
        // named-but-unrecognized language gets a plain block instead.
        if matches!(lang, Language::PlainText)
            && !language.is_empty()
            && language != "plaintext"
            && language != "text"
        {
            return plain_block(code, language);
        }

        let formatter = HtmlLinkedBuilder::new().source(code).lang(lang).build();

        match formatter {
            Ok(f) => {
                let mut output: Vec<u8> = Vec::new();
                if f.format(&mut output).is_ok() {
                    String::from_utf8(output).unwrap_or_else(|_| plain_block(code, language))
                } else {
                    plain_block(code, language)
                }
            }
            Err(_) => plain_block(code, language),
        }
    }
}

/// Escape and wrap code without highlighting.
pub fn plain_block(code: &str, language: &str) -> String {
    let escaped = escape_html(code);
    if language.is_empty() {
        format!("<pre><code>{escaped}</code></pre>")
    } else {
        format!("<pre><code class=\"language-{language}\">{escaped}</code></pre>")
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
