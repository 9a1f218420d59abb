use crate::error::ResolveError;
use std::fmt;

/// Entry served when a request names a version but no file inside it.
pub const INDEX_DOCUMENT: &str = "index.html";

/// Checks that `segment` can be joined onto a directory without leaving it.
///
/// Request paths and publish bodies are untrusted, so a segment must be
/// non-empty, must not be `.` or `..` and must not smuggle a separator or
/// a control character.
pub fn validate_segment(segment: &str) -> Result<&str, ResolveError> {
    let invalid = segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\'])
        || segment.chars().any(char::is_control);

    if invalid {
        Err(ResolveError::InvalidSegment(segment.to_string()))
    } else {
        Ok(segment)
    }
}

/// Maps the remainder of a request path to the entry name inside an archive.
pub fn document_path(raw: &str) -> &str {
    if raw.trim().is_empty() {
        INDEX_DOCUMENT
    } else {
        raw
    }
}

/// One documentation archive, identified by its `(platform, project, version)` triple.
///
/// The storage location is a pure function of the triple, see [`Artifact::archive_path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Artifact {
    platform: String,
    project: String,
    version: String,
}

impl Artifact {
    pub fn new(
        platform: impl Into<String>,
        project: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self, ResolveError> {
        let artifact = Self {
            platform: platform.into(),
            project: project.into(),
            version: version.into(),
        };
        validate_segment(&artifact.platform)?;
        validate_segment(&artifact.project)?;
        validate_segment(&artifact.version)?;
        Ok(artifact)
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// `{project}-{version}-{platform}.zip`
    pub fn archive_name(&self) -> String {
        format!("{}-{}-{}.zip", self.project, self.version, self.platform)
    }

    /// `{platform}/{project}/{version}`
    pub fn directory(&self) -> String {
        format!("{}/{}/{}", self.platform, self.project, self.version)
    }

    pub fn archive_path(&self) -> String {
        format!("{}/{}", self.directory(), self.archive_name())
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.platform, self.project, self.version)
    }
}

/// An archive that the resolver found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLocation {
    pub artifact: Artifact,
    /// Store-relative path of the archive file.
    pub path: String,
}

impl ArchiveLocation {
    pub fn new(artifact: Artifact) -> Self {
        let path = artifact.archive_path();
        Self { artifact, path }
    }
}
