//! `{{token}}` substitution templates.
//!
//! Only plain token substitution is supported. A template is parsed once into
//! literal and token segments, then rendered against a set of bindings.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

static TOKEN_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").ok());

/// Template errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// `{{` without a matching `}}`.
    #[error("unterminated placeholder starting at byte {offset}")]
    Unterminated {
        /// Byte offset of the opening braces.
        offset: usize,
    },

    /// `{{}}` or `{{   }}`.
    #[error("empty placeholder at byte {offset}")]
    EmptyName {
        /// Byte offset of the opening braces.
        offset: usize,
    },

    /// Placeholder name contains unsupported characters.
    #[error("invalid placeholder name {name:?} at byte {offset}")]
    InvalidName {
        /// The offending name.
        name: String,
        /// Byte offset of the opening braces.
        offset: usize,
    },

    /// No value was bound for a placeholder.
    #[error("no value bound for placeholder {0:?}")]
    MissingBinding(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Token(String),
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse template source.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut consumed = 0;

        while let Some(start) = rest.find(OPEN) {
            if start > 0 {
                segments.push(Segment::Text(rest[..start].to_string()));
            }
            let offset = consumed + start;
            let after_open = &rest[start + OPEN.len()..];
            let end = after_open
                .find(CLOSE)
                .ok_or(TemplateError::Unterminated { offset })?;

            let name = after_open[..end].trim();
            if name.is_empty() {
                return Err(TemplateError::EmptyName { offset });
            }
            if !TOKEN_NAME.as_ref().is_some_and(|re| re.is_match(name)) {
                return Err(TemplateError::InvalidName {
                    name: name.to_string(),
                    offset,
                });
            }
            segments.push(Segment::Token(name.to_string()));

            let advance = start + OPEN.len() + end + CLOSE.len();
            consumed += advance;
            rest = &rest[advance..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        Ok(Self { segments })
    }

    /// Distinct placeholder names, in order of first use.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Token(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Substitute every placeholder.
    ///
    /// Bindings the template does not use are ignored.
    pub fn render(&self, bindings: &Bindings) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Token(name) => {
                    let value = bindings
                        .get(name)
                        .ok_or_else(|| TemplateError::MissingBinding(name.clone()))?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

/// Values bound to placeholder names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: BTreeMap<String, String>,
}

impl Bindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Bindings::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    /// Bind `name`, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) {
        self.values.insert(name.into(), value.to_string());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Iterate bindings sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
