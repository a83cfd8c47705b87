use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::collector::{category_slugs, Post};
use crate::context::Settings;
use crate::error::{IoContext, OrganizeError, Result};
use crate::ingest::seed_category_index;
use crate::renderer::CardRenderer;

pub(crate) mod data;
pub(crate) mod region;

use region::Locator;

fn missing_marker(path: &Path, marker: &str) -> OrganizeError {
    OrganizeError::MissingRegionMarker {
        document: path.to_owned(),
        marker: marker.to_string(),
    }
}

/// Replaces the interior of each located region of `document` in turn.
pub(crate) fn rewrite_regions(
    path: &Path,
    document: &str,
    edits: &[(&Locator, String)],
) -> Result<String> {
    let mut text = document.to_string();
    for (locator, content) in edits {
        let region = locator
            .locate(&text)
            .map_err(|marker| missing_marker(path, marker))?;
        debug!("{path:?}: replacing {} byte(s) of region content", region.interior.len());
        text = region.replace(content);
    }
    Ok(text)
}

/// Reads the document, rewrites its regions in memory and writes the whole
/// document back. Returns whether the content changed.
fn rewrite_document(path: &Path, edits: &[(&Locator, String)]) -> Result<bool> {
    let document = std::fs::read_to_string(path).at(path)?;
    let updated = rewrite_regions(path, &document, edits)?;
    if updated == document {
        debug!("{path:?} is up to date");
        return Ok(false);
    }
    std::fs::write(path, updated).at(path)?;
    info!("updated {path:?}");
    Ok(true)
}

/// Fails unless every one of `locators` finds its region in the document.
fn check_regions(path: &Path, locators: &[&Locator]) -> Result<()> {
    let document = std::fs::read_to_string(path).at(path)?;
    for locator in locators {
        locator
            .locate(&document)
            .map_err(|marker| missing_marker(path, marker))?;
    }
    Ok(())
}

/// Rewrites the featured and latest regions of the root index. With no posts
/// at all the root index is left as it is.
pub(crate) fn sync_root_index(
    settings: &Settings,
    renderer: &CardRenderer,
    posts: &[Post],
) -> Result<Option<PathBuf>> {
    let Some((featured, rest)) = posts.split_first() else {
        info!("no posts found, leaving the root index alone");
        return Ok(None);
    };
    let latest: Vec<&Post> = rest.iter().take(settings.latest_count).collect();

    let path = settings.root_index();
    rewrite_document(
        &path,
        &[
            (&settings.featured_region, renderer.featured(featured)?),
            (&settings.latest_region, renderer.latest(&latest)?),
        ],
    )?;
    Ok(Some(path))
}

/// Rewrites the articles region of one category index with every post of
/// that category, newest first.
pub(crate) fn sync_category_index(
    settings: &Settings,
    renderer: &CardRenderer,
    slug: &str,
    posts: &[Post],
) -> Result<PathBuf> {
    let in_category: Vec<&Post> = posts.iter().filter(|p| p.category_slug == slug).collect();
    let display_name = in_category
        .iter()
        .find_map(|p| p.category.as_deref())
        .unwrap_or(slug);
    seed_category_index(settings, slug, display_name)?;

    let path = settings.category_index(slug);
    let content = renderer.category(&in_category)?;
    rewrite_document(&path, &[(&settings.articles_region, content)])?;
    Ok(path)
}

/// Brings every index document in line with `posts`, which must already be
/// sorted newest first. Returns the documents that were processed.
///
/// The root index is checked for both of its regions before any category
/// index is seeded or written, so missing root markers change nothing.
pub(crate) fn synchronize(
    settings: &Settings,
    renderer: &CardRenderer,
    posts: &[Post],
) -> Result<Vec<PathBuf>> {
    if !posts.is_empty() {
        check_regions(
            &settings.root_index(),
            &[&settings.featured_region, &settings.latest_region],
        )?;
    }

    let mut documents = vec![];
    for slug in category_slugs(settings)? {
        documents.push(sync_category_index(settings, renderer, &slug, posts)?);
    }
    documents.extend(sync_root_index(settings, renderer, posts)?);
    Ok(documents)
}
