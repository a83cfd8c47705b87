use std::path::PathBuf;

/// Everything that can abort a run. Each variant names the file or document
/// it is about so the single-line diagnostic is enough to act on.
#[derive(Debug, thiserror::Error)]
pub(crate) enum OrganizeError {
    #[error("{file:?}: missing required front matter field `{field}`")]
    MissingMetadata { file: PathBuf, field: String },

    #[error("{file:?}: category {category:?} is not in the category map")]
    UnknownCategory { file: PathBuf, category: String },

    #[error("cannot move {staged:?}: destination {destination:?} already exists")]
    DestinationConflict {
        staged: PathBuf,
        destination: PathBuf,
    },

    #[error("{document:?}: region marker `{marker}` not found")]
    MissingRegionMarker { document: PathBuf, marker: String },

    #[error("{directory:?}: category index document is missing and could not be created: {source}")]
    MissingIndexDocument {
        directory: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{file:?}: invalid date {value:?}")]
    InvalidDate { file: PathBuf, value: String },

    #[error("{file:?}: invalid category map: {reason}")]
    CategoryMap { file: PathBuf, reason: String },

    #[error("{file:?}: invalid front matter: {reason}")]
    FrontMatter { file: PathBuf, reason: String },

    #[error("card template `{name}`: {reason}")]
    Template { name: String, reason: String },

    #[error("{path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) type Result<T> = std::result::Result<T, OrganizeError>;

/// Attaches the path an I/O call was working on.
pub(crate) trait IoContext<T> {
    fn at(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| OrganizeError::Io {
            path: path.into(),
            source,
        })
    }
}
