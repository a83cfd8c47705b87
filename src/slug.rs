use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::{IoContext, OrganizeError, Result};

pub(crate) const UNCATEGORIZED: &str = "uncategorized";

/// Normalizes a category name into a directory-safe slug:
/// `" Security & Safety "` becomes `security-and-safety`.
pub(crate) fn slugify(category: Option<&str>) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    static DISALLOWED: OnceLock<Regex> = OnceLock::new();
    let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s+").unwrap());
    let disallowed = DISALLOWED.get_or_init(|| Regex::new(r"[^a-z0-9-]").unwrap());

    let lowered = category.unwrap_or_default().trim().to_lowercase();
    let hyphenated = whitespace.replace_all(&lowered, "-").replace('&', "and");
    let slug = disallowed.replace_all(&hyphenated, "");

    if slug.is_empty() {
        UNCATEGORIZED.to_string()
    } else {
        slug.into_owned()
    }
}

/// Maps raw category names to slugs. By default every name is slugified;
/// entries in `overrides` win over derivation, and in strict mode a name
/// missing from `overrides` is an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct CategoryMap {
    #[serde(default)]
    pub strict: bool,

    #[serde(default, rename = "categories")]
    pub overrides: HashMap<String, String>,
}

impl CategoryMap {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).at(path)?;
        let map: CategoryMap =
            serde_yaml::from_str(&content).map_err(|e| OrganizeError::CategoryMap {
                file: path.to_owned(),
                reason: e.to_string(),
            })?;
        map.validate(path)?;
        Ok(map)
    }

    /// Every override slug becomes a single directory name under the category
    /// base, so it must be a non-empty run of `[a-z0-9-]`.
    fn validate(&self, path: &Path) -> Result<()> {
        static VALID: OnceLock<Regex> = OnceLock::new();
        let valid = VALID.get_or_init(|| Regex::new(r"\A[a-z0-9-]+\z").unwrap());

        let mut names: Vec<&String> = self.overrides.keys().collect();
        names.sort();
        for name in names {
            let slug = &self.overrides[name];
            let problem = if slug.is_empty() {
                "is empty"
            } else if slug.contains(['/', '\\']) || slug.contains("..") {
                "is not a single directory name"
            } else if !valid.is_match(slug) {
                "may only contain a-z, 0-9 and `-`"
            } else {
                continue;
            };
            return Err(OrganizeError::CategoryMap {
                file: path.to_owned(),
                reason: format!("slug {slug:?} for category {name:?} {problem}"),
            });
        }
        Ok(())
    }

    /// Resolves the category of `file`. An absent or blank category is
    /// always `uncategorized`, strict or not.
    pub fn resolve(&self, file: &Path, category: Option<&str>) -> Result<String> {
        let Some(name) = category.map(str::trim).filter(|c| !c.is_empty()) else {
            return Ok(UNCATEGORIZED.to_string());
        };

        match self.overrides.get(name) {
            Some(slug) => Ok(slug.clone()),
            None if self.strict => Err(OrganizeError::UnknownCategory {
                file: file.to_owned(),
                category: name.to_string(),
            }),
            None => Ok(slugify(Some(name))),
        }
    }
}
