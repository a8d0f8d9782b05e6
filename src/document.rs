use std::panic::{self, AssertUnwindSafe};

use pulldown_cmark::{html, Options, Parser};
use regex::Regex;

use crate::{
    error::{Error, Result},
    metadata::Metadata,
    utils::strip_tags,
};

/// the kinds of page source that can be turned into html
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    Html,
    Markdown,
}

impl Markup {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => Some(Self::Html),
            "md" | "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }
}

/// turns a lightweight markup body into html
pub trait Converter {
    fn convert(&self, source: &str) -> Result<String>;
}

/// markdown conversion through pulldown-cmark
#[derive(Debug, Clone, Copy)]
pub struct Markdown {
    options: Options,
}

impl Default for Markdown {
    fn default() -> Self {
        Self::new(Options::empty())
    }
}

impl Markdown {
    pub fn new(options: Options) -> Self {
        Self { options }
    }
}

impl Converter for Markdown {
    fn convert(&self, source: &str) -> Result<String> {
        // the parser has no error path, a panic is the only way it fails
        panic::catch_unwind(AssertUnwindSafe(|| {
            let mut contents = String::new();
            html::push_html(&mut contents, Parser::new_ext(source, self.options));
            contents
        }))
        .map_err(|cause| {
            let message = cause
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| cause.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "markdown parser panicked".into());
            Error::ConvertError(message)
        })
    }
}

/// produce the html for a page body
///
/// a failed conversion falls back to the body as written
pub fn transform(markup: Markup, body: &str, converter: &dyn Converter, name: &str) -> String {
    match markup {
        Markup::Html => body.to_string(),
        Markup::Markdown => converter.convert(body).unwrap_or_else(|err| {
            log::warn!("Unable to convert {name}, using it unconverted: {err}");
            body.to_string()
        }),
    }
}

/// the tag whose first occurrence names a page that has no `title`
///
/// compiled once per build and shared by every page
#[derive(Debug, Clone)]
pub struct TitleElement {
    element: String,
    pattern: Regex,
}

impl TitleElement {
    /// `None` for a blank element or one that can't be matched
    pub fn new(element: &str) -> Option<Self> {
        let element = element.trim();
        if element.is_empty() {
            return None;
        }
        let pattern = format!(
            r"(?is)<{tag}(?:\s[^>]*)?>(.*?)</{tag}\s*>",
            tag = regex::escape(element)
        );
        let pattern = Regex::new(&pattern)
            .inspect_err(|err| log::warn!("Unusable title element `{element}`: {err}"))
            .ok()?;
        Some(Self {
            element: element.to_string(),
            pattern,
        })
    }

    /// fill in a missing `title` from the first element in the html
    pub fn derive(&self, metadata: &mut Metadata, html: &str) {
        if metadata.contains_key("title") {
            return;
        }
        match self.first_text(html) {
            Some(title) => {
                log::trace!("Derived title from <{}>: {title}", self.element);
                metadata.insert("title".into(), title);
            }
            None => log::debug!("No <{}> found to derive a title from", self.element),
        }
    }

    /// the text inside the first match, with nested tags removed
    fn first_text(&self, html: &str) -> Option<String> {
        let inner = self.pattern.captures(html)?.get(1)?.as_str();
        let text = strip_tags(inner);
        (!text.is_empty()).then_some(text)
    }
}
