use std::path::{Path, PathBuf};

use crate::slug::CategoryMap;
use crate::synchronizer::region::Locator;

pub(crate) const CONTENT_EXTENSIONS: [&str; 2] = ["md", "mdx"];

pub(crate) const FEATURED_START: &str = "{/* featured:start */}";
pub(crate) const FEATURED_END: &str = "{/* featured:end */}";
pub(crate) const LATEST_START: &str = "{/* latest:start */}";
pub(crate) const LATEST_END: &str = "{/* latest:end */}";
pub(crate) const ARTICLES_HEADING: &str = "## All Articles";

/// Everything one run needs to know. Paths other than `root` are relative
/// to `root`.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub root: PathBuf,
    pub staging_dir: PathBuf,
    pub category_base: String,
    pub index_file: String,
    pub latest_count: usize,
    pub required_fields: Vec<String>,
    pub category_map: CategoryMap,
    pub template_dir: Option<PathBuf>,

    pub featured_region: Locator,
    pub latest_region: Locator,
    pub articles_region: Locator,
}

impl Settings {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            staging_dir: PathBuf::from("blog"),
            category_base: "categories".to_string(),
            index_file: "index.mdx".to_string(),
            latest_count: 5,
            required_fields: vec!["title".to_string(), "description".to_string()],
            category_map: CategoryMap::default(),
            template_dir: None,
            featured_region: Locator::markers(FEATURED_START, FEATURED_END),
            latest_region: Locator::markers(LATEST_START, LATEST_END),
            articles_region: Locator::heading(ARTICLES_HEADING),
        }
    }

    pub fn staging_path(&self) -> PathBuf {
        self.root.join(&self.staging_dir)
    }

    pub fn categories_path(&self) -> PathBuf {
        self.root.join(&self.category_base)
    }

    pub fn category_dir(&self, slug: &str) -> PathBuf {
        self.categories_path().join(slug)
    }

    pub fn category_index(&self, slug: &str) -> PathBuf {
        self.category_dir(slug).join(&self.index_file)
    }

    pub fn root_index(&self) -> PathBuf {
        self.root.join(&self.index_file)
    }

    /// `<category-base>/<slug>/<file stem>`
    pub fn post_url(&self, slug: &str, stem: &str) -> String {
        format!("{}/{}/{}", self.category_base.trim_matches('/'), slug, stem)
    }

    /// A post candidate: a content extension, and not an index document.
    pub fn is_post_file(&self, path: &Path) -> bool {
        let has_content_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| CONTENT_EXTENSIONS.contains(&e));
        let is_index = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy() == self.index_file);
        has_content_extension && !is_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_files_exclude_index_documents() {
        let settings = Settings::new("/site");
        assert!(settings.is_post_file(Path::new("blog/hello.mdx")));
        assert!(settings.is_post_file(Path::new("blog/hello.md")));
        assert!(!settings.is_post_file(Path::new("blog/index.mdx")));
        assert!(!settings.is_post_file(Path::new("blog/notes.txt")));
        assert!(!settings.is_post_file(Path::new("blog/.DS_Store")));
    }

    #[test]
    fn derived_paths() {
        let settings = Settings::new("/site");
        assert_eq!(settings.staging_path(), PathBuf::from("/site/blog"));
        assert_eq!(
            settings.category_index("llm-reasoning"),
            PathBuf::from("/site/categories/llm-reasoning/index.mdx")
        );
        assert_eq!(settings.root_index(), PathBuf::from("/site/index.mdx"));
        assert_eq!(settings.post_url("llm-reasoning", "x"), "categories/llm-reasoning/x");
    }
}
