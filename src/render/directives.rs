//! Inline directive substitution.
//!
//! Directives are special tokens embedded in source text that are replaced
//! with computed text while files are loaded, before the content enters the
//! main pipeline. The core defines only the hook point: an ordered list of
//! handlers, appendable until the renderer is constructed and fixed
//! thereafter. Handlers apply in registration order.

use std::collections::BTreeMap;
use std::sync::Arc;

use regex::{Captures, Regex};

use super::options::RenderOptions;

#[derive(thiserror::Error, Debug)]
pub enum DirectiveError {
    #[error("directive '{directive}' failed: {message}")]
    Expansion {
        directive: &'static str,
        message: String,
    },
}

impl DirectiveError {
    pub fn expansion(directive: &'static str, message: impl Into<String>) -> Self {
        Self::Expansion {
            directive,
            message: message.into(),
        }
    }
}

/// A single directive grammar: a pattern and its expansion.
pub trait DirectiveHandler: Send + Sync {
    /// Unique name, used in error messages.
    fn name(&self) -> &'static str;

    /// The token pattern this handler matches.
    fn pattern(&self) -> &Regex;

    /// Expand one matched token.
    fn expand(
        &self,
        caps: &Captures<'_>,
        options: &RenderOptions,
    ) -> Result<String, DirectiveError>;
}

/// An ordered set of directive handlers.
#[derive(Clone, Default)]
pub struct DirectiveSet {
    handlers: Vec<Arc<dyn DirectiveHandler>>,
}

impl DirectiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler. Handlers run in the order they were pushed.
    pub fn push(&mut self, handler: impl DirectiveHandler + 'static) {
        self.handlers.push(Arc::new(handler));
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Apply every handler to the text, in order. The first handler failure
    /// aborts the expansion.
    pub fn expand(&self, text: &str, options: &RenderOptions) -> Result<String, DirectiveError> {
        let mut out = text.to_string();
        for handler in &self.handlers {
            out = expand_one(handler.as_ref(), &out, options)?;
        }
        Ok(out)
    }
}

fn expand_one(
    handler: &dyn DirectiveHandler,
    text: &str,
    options: &RenderOptions,
) -> Result<String, DirectiveError> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in handler.pattern().captures_iter(text) {
        let Some(full) = caps.get(0) else { continue };
        out.push_str(&text[last..full.start()]);
        out.push_str(&handler.expand(&caps, options)?);
        last = full.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

/// Substitutes `@{key}` tokens with caller-supplied values.
///
/// Unknown keys are an expansion error rather than being left in place, so
/// typos surface instead of leaking tokens into the output.
pub struct ValueDirective {
    pattern: Regex,
    values: BTreeMap<String, String>,
}

impl ValueDirective {
    pub fn new(values: BTreeMap<String, String>) -> Self {
        Self {
            pattern: Regex::new(r"@\{([A-Za-z0-9_.-]+)\}").expect("value directive pattern"),
            values,
        }
    }
}

impl DirectiveHandler for ValueDirective {
    fn name(&self) -> &'static str {
        "value"
    }

    fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn expand(
        &self,
        caps: &Captures<'_>,
        _options: &RenderOptions,
    ) -> Result<String, DirectiveError> {
        let key = caps.get(1).map_or("", |m| m.as_str());
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| DirectiveError::expansion(self.name(), format!("unknown key '{key}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> RenderOptions {
        RenderOptions::defaults("/res")
    }

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn value_directive_substitutes_tokens() {
        let mut set = DirectiveSet::new();
        set.push(ValueDirective::new(values(&[("name", "World")])));

        let out = set.expand("Hello @{name}!", &options()).unwrap();
        assert_eq!(out, "Hello World!");
    }

    #[test]
    fn unknown_key_is_an_error() {
        let mut set = DirectiveSet::new();
        set.push(ValueDirective::new(values(&[])));

        let err = set.expand("@{missing}", &options()).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn handlers_apply_in_registration_order() {
        // The first handler produces a token the second one consumes.
        let mut set = DirectiveSet::new();
        set.push(ValueDirective::new(values(&[("outer", "@{inner}")])));
        set.push(ValueDirective::new(values(&[("inner", "done")])));

        let out = set.expand("@{outer}", &options()).unwrap();
        assert_eq!(out, "done");
    }

    #[test]
    fn empty_set_passes_text_through() {
        let set = DirectiveSet::new();
        assert!(set.is_empty());
        let out = set.expand("@{anything} untouched", &options()).unwrap();
        assert_eq!(out, "@{anything} untouched");
    }
}
