use thiserror::Error;

/// Why a `(platform, project, version)` lookup did not produce an archive.
///
/// The `*NotFound` variants are checked in declaration order, so the first
/// missing level is the one reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Invalid path segment {0:?}")]
    InvalidSegment(String),

    #[error("Platform {0} not found")]
    PlatformNotFound(String),

    #[error("Project {0} not found")]
    ProjectNotFound(String),

    #[error("Version {0} not found")]
    VersionNotFound(String),

    #[error("Archive {0} not found")]
    ArchiveNotFound(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArchiveError {
    #[error("Entry {0} not found")]
    EntryNotFound(String),

    #[error("Failed to read archive: {0}")]
    ReadFailure(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source stream failed: {0}")]
    Source(std::io::Error),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Invalid source URL: {0}")]
    InvalidSource(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Source responded with status {0}")]
    Status(u16),
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
}

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Invalid publish request: {0}")]
    InvalidRequest(String),

    #[error("Failed to fetch {source_url}: {reason}")]
    Fetch { source_url: String, reason: String },

    #[error("Failed to store archive: {0}")]
    Io(std::io::Error),
}

impl From<ResolveError> for IngestError {
    fn from(err: ResolveError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}
