use std::path::Path;
use std::sync::OnceLock;

use log::warn;
use regex::Regex;
use serde_yaml::{Mapping, Value};

use crate::error::{OrganizeError, Result};

/// Front matter of a content document. Keys missing from the document are
/// simply missing here.
#[derive(Debug, Clone, Default)]
pub(crate) struct Metadata {
    fields: Mapping,
}

impl Metadata {
    /// Returns a scalar field as a string. Numbers and booleans are rendered
    /// the way they were written; null, sequences and mappings count as absent.
    pub fn string(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null => None,
            other => {
                warn!("ignoring non-scalar front matter value for `{key}`: {other:?}");
                None
            }
        }
    }

    /// Like [`Metadata::string`], but blank values count as absent.
    pub fn non_empty(&self, key: &str) -> Option<String> {
        self.string(key).filter(|s| !s.trim().is_empty())
    }
}

fn header_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        regex::RegexBuilder::new(r"\A---[ \t]*\r?\n(?:(.*?)\r?\n)?---[ \t]*(?:\r?\n|\z)(.*)\z")
            .dot_matches_new_line(true)
            .build()
            .unwrap()
    })
}

/// Splits `content` into its front matter and the remaining body. A document
/// that does not start with a `---` fence has empty metadata and is all body.
pub(crate) fn parse(file: &Path, content: &str) -> Result<(Metadata, String)> {
    let Some(caps) = header_pattern().captures(content) else {
        return Ok((Metadata::default(), content.to_string()));
    };

    let header = caps.get(1).map_or("", |m| m.as_str());
    let body = caps.get(2).map_or("", |m| m.as_str()).to_string();

    if header.trim().is_empty() {
        return Ok((Metadata::default(), body));
    }

    let fields = match serde_yaml::from_str::<Value>(header) {
        Ok(Value::Mapping(fields)) => fields,
        Ok(Value::Null) => Mapping::new(),
        Ok(other) => {
            return Err(OrganizeError::FrontMatter {
                file: file.to_owned(),
                reason: format!("expected a mapping, found {other:?}"),
            })
        }
        Err(e) => {
            return Err(OrganizeError::FrontMatter {
                file: file.to_owned(),
                reason: e.to_string(),
            })
        }
    };

    Ok((Metadata { fields }, body))
}
