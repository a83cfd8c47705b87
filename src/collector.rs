use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::debug;

use crate::context::Settings;
use crate::error::{IoContext, OrganizeError, Result};
use crate::metadata::{self, Metadata};

/// A post as found under a category directory. Rebuilt from disk on every run.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Post {
    pub title: String,
    /// Unix epoch when the post has no date, so undated posts sort last.
    pub date: DateTime<Utc>,
    pub description: String,
    pub image: Option<String>,
    pub icon: Option<String>,
    /// The category as written in the front matter.
    pub category: Option<String>,
    /// The directory the post lives in.
    pub category_slug: String,
    pub url: String,
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DD` (UTC midnight).
pub(crate) fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(date) = NaiveDateTime::parse_from_str(value, format) {
            return Some(date.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date| date.and_utc())
}

impl Post {
    pub fn from_metadata(
        settings: &Settings,
        path: &Path,
        category_slug: &str,
        meta: &Metadata,
    ) -> Result<Self> {
        let date = match meta.string("date") {
            Some(value) => parse_date(&value).ok_or_else(|| OrganizeError::InvalidDate {
                file: path.to_owned(),
                value,
            })?,
            None => DateTime::<Utc>::UNIX_EPOCH,
        };
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Post {
            title: meta.string("title").unwrap_or_default(),
            date,
            description: meta.string("description").unwrap_or_default(),
            image: meta.non_empty("image"),
            icon: meta.non_empty("icon"),
            category: meta.string("category"),
            category_slug: category_slug.to_string(),
            url: settings.post_url(category_slug, &stem),
        })
    }
}

/// Lists a directory's entries sorted by file name, so traversal order does
/// not depend on the filesystem.
pub(crate) fn sorted_entries(dir: &Path) -> Result<Vec<std::fs::DirEntry>> {
    let mut entries = std::fs::read_dir(dir)
        .at(dir)?
        .collect::<std::io::Result<Vec<_>>>()
        .at(dir)?;
    entries.sort_by_key(|entry| entry.file_name());
    Ok(entries)
}

/// Slugs of every directory under the category base, in traversal order.
pub(crate) fn category_slugs(settings: &Settings) -> Result<Vec<String>> {
    let base = settings.categories_path();
    if !base.is_dir() {
        return Ok(vec![]);
    }

    let mut slugs = vec![];
    for entry in sorted_entries(&base)? {
        if entry.file_type().at(entry.path())?.is_dir() {
            slugs.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(slugs)
}

/// Collects every post under the category base, newest first. Posts with
/// the same date keep their traversal order.
pub(crate) fn collect_posts(settings: &Settings) -> Result<Vec<Post>> {
    let mut posts = vec![];

    for slug in category_slugs(settings)? {
        let dir = settings.category_dir(&slug);
        for entry in sorted_entries(&dir)? {
            let path = entry.path();
            if !entry.file_type().at(&path)?.is_file() || !settings.is_post_file(&path) {
                continue;
            }

            debug!("reading post {path:?}");
            let content = std::fs::read_to_string(&path).at(&path)?;
            let (meta, _body) = metadata::parse(&path, &content)?;
            posts.push(Post::from_metadata(settings, &path, &slug, &meta)?);
        }
    }

    sort_posts(&mut posts);
    Ok(posts)
}

pub(crate) fn sort_posts(posts: &mut [Post]) {
    // `sort_by` is stable: equal dates keep traversal order.
    posts.sort_by(|a, b| b.date.cmp(&a.date));
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn write_post(root: &Path, slug: &str, name: &str, front_matter: &str) {
        let dir = root.join("categories").join(slug);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), format!("---\n{front_matter}---\nbody\n")).unwrap();
    }

    #[test]
    fn parses_supported_date_formats() {
        let midnight = parse_date("2024-03-01").unwrap();
        assert_eq!(midnight.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        assert_eq!(
            parse_date("2024-03-01 12:30:00").unwrap().to_rfc3339(),
            "2024-03-01T12:30:00+00:00"
        );
        assert_eq!(
            parse_date("2024-03-01T12:30:00+02:00").unwrap().to_rfc3339(),
            "2024-03-01T10:30:00+00:00"
        );
        assert_eq!(parse_date("March 1st"), None);
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let root = tempfile::tempdir().unwrap();
        write_post(root.path(), "a", "old.mdx", "title: Old\ndate: 2024-01-01\n");
        write_post(root.path(), "b", "first.mdx", "title: First\ndate: 2024-03-01\n");
        write_post(root.path(), "b", "second.mdx", "title: Second\ndate: 2024-03-01\n");

        let posts = collect_posts(&Settings::new(root.path())).unwrap();
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["First", "Second", "Old"]);
    }

    #[test]
    fn undated_posts_sort_last() {
        let root = tempfile::tempdir().unwrap();
        write_post(root.path(), "a", "undated.mdx", "title: Undated\n");
        write_post(root.path(), "b", "dated.md", "title: Dated\ndate: 1999-12-31\n");

        let posts = collect_posts(&Settings::new(root.path())).unwrap();
        assert_eq!(posts[0].title, "Dated");
        assert_eq!(posts[1].title, "Undated");
        assert_eq!(posts[1].date, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn builds_urls_and_skips_index_documents() {
        let root = tempfile::tempdir().unwrap();
        write_post(
            root.path(),
            "llm-reasoning",
            "chain.mdx",
            "title: Chain\ndescription: D\ncategory: LLM Reasoning\nimage: /a.png\n",
        );
        write_post(root.path(), "llm-reasoning", "index.mdx", "title: LLM Reasoning\n");
        fs::write(root.path().join("categories").join("stray.mdx"), "not in a category").unwrap();

        let posts = collect_posts(&Settings::new(root.path())).unwrap();
        assert_eq!(posts.len(), 1);
        let post = &posts[0];
        assert_eq!(post.url, "categories/llm-reasoning/chain");
        assert_eq!(post.category_slug, "llm-reasoning");
        assert_eq!(post.category.as_deref(), Some("LLM Reasoning"));
        assert_eq!(post.description, "D");
        assert_eq!(post.image.as_deref(), Some("/a.png"));
    }

    #[test]
    fn missing_category_base_yields_no_posts() {
        let root = tempfile::tempdir().unwrap();
        assert!(collect_posts(&Settings::new(root.path())).unwrap().is_empty());
    }

    #[test]
    fn invalid_date_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        write_post(root.path(), "a", "bad.mdx", "title: Bad\ndate: someday\n");
        let err = collect_posts(&Settings::new(root.path())).unwrap_err();
        assert!(matches!(err, OrganizeError::InvalidDate { value, .. } if value == "someday"));
    }
}
