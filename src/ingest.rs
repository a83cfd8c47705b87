use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use fs_extra::file::CopyOptions;
use log::{debug, info};
use serde::Serialize;

use crate::collector::sorted_entries;
use crate::context::Settings;
use crate::error::{IoContext, OrganizeError, Result};
use crate::metadata;

/// One staged file and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Relocation {
    pub staged: PathBuf,
    pub destination: PathBuf,
    pub slug: String,
    /// The category name as written, used to title a freshly seeded index.
    pub category: Option<String>,
}

#[derive(Serialize)]
struct SeedFrontMatter<'a> {
    title: &'a str,
    description: String,
}

/// Writes a minimal index document for a category unless one exists.
/// Returns whether a document was created.
pub(crate) fn seed_category_index(
    settings: &Settings,
    slug: &str,
    display_name: &str,
) -> Result<bool> {
    let directory = settings.category_dir(slug);
    let path = settings.category_index(slug);
    if path.exists() {
        return Ok(false);
    }

    let missing = |source: std::io::Error| OrganizeError::MissingIndexDocument {
        directory: directory.clone(),
        source,
    };

    let front_matter = serde_yaml::to_string(&SeedFrontMatter {
        title: display_name,
        description: format!("Articles in {display_name}"),
    })
    .map_err(|e| missing(std::io::Error::other(e)))?;
    let content = format!(
        "---\n{front_matter}---\n\n# {display_name}\n\n{}\n",
        settings.articles_region.placeholder()
    );

    fs_extra::dir::create_all(&directory, false).map_err(|e| missing(std::io::Error::other(e)))?;
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .and_then(|mut file| file.write_all(content.as_bytes()))
        .map_err(missing)?;

    info!("seeded category index {path:?}");
    Ok(true)
}

/// Reads and validates every staged file and works out its destination.
/// Nothing on disk changes here, so a bad file aborts the run before any
/// file has moved.
pub(crate) fn plan(settings: &Settings) -> Result<Vec<Relocation>> {
    let staging = settings.staging_path();
    if !staging.is_dir() {
        debug!("staging directory {staging:?} does not exist, nothing to ingest");
        return Ok(vec![]);
    }

    let mut relocations = vec![];
    for entry in sorted_entries(&staging)? {
        let staged = entry.path();
        if !entry.file_type().at(&staged)?.is_file() || !settings.is_post_file(&staged) {
            continue;
        }
        relocations.push(plan_file(settings, &staged)?);
    }
    Ok(relocations)
}

fn plan_file(settings: &Settings, staged: &Path) -> Result<Relocation> {
    debug!("reading staged file {staged:?}");
    let content = std::fs::read_to_string(staged).at(staged)?;
    let (meta, _body) = metadata::parse(staged, &content)?;

    for field in &settings.required_fields {
        if meta.non_empty(field).is_none() {
            return Err(OrganizeError::MissingMetadata {
                file: staged.to_owned(),
                field: field.clone(),
            });
        }
    }

    let category = meta.non_empty("category");
    let slug = settings.category_map.resolve(staged, category.as_deref())?;

    // `staged` always has a file name: it came out of a directory listing.
    let file_name = staged.file_name().unwrap_or_default();
    let destination = settings.category_dir(&slug).join(file_name);
    if destination.exists() {
        return Err(OrganizeError::DestinationConflict {
            staged: staged.to_owned(),
            destination,
        });
    }

    Ok(Relocation {
        staged: staged.to_owned(),
        destination,
        slug,
        category: category.map(|c| c.trim().to_string()),
    })
}

/// Moves one planned file, creating its category directory and index first.
pub(crate) fn relocate(settings: &Settings, relocation: &Relocation) -> Result<()> {
    let display_name = relocation.category.as_deref().unwrap_or(&relocation.slug);
    seed_category_index(settings, &relocation.slug, display_name)?;

    if relocation.destination.exists() {
        return Err(OrganizeError::DestinationConflict {
            staged: relocation.staged.clone(),
            destination: relocation.destination.clone(),
        });
    }

    // overwrite is off, so fs_extra refuses an existing destination too.
    fs_extra::file::move_file(&relocation.staged, &relocation.destination, &CopyOptions::new())
        .map_err(std::io::Error::other)
        .at(&relocation.staged)?;

    info!("moved {:?} to {:?}", relocation.staged, relocation.destination);
    Ok(())
}

/// Plans every staged file, then moves them one at a time.
pub(crate) fn ingest(settings: &Settings) -> Result<Vec<Relocation>> {
    let relocations = plan(settings)?;
    for relocation in &relocations {
        relocate(settings, relocation)?;
    }
    Ok(relocations)
}
