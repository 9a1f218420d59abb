use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of `POST /publish`.
#[derive(Clone, Serialize, Deserialize)]
pub struct PublishRequest {
    /// The shared secret.
    pub token: String,

    /// Documentation tool that produced the archive, e.g. "dokka" or "javadoc".
    pub provider: String,

    /// Project name, e.g. "http-signature-utility".
    pub name: String,

    /// Version string, e.g. "2025.7.2.9".
    pub version: String,

    /// URL the archive is downloaded from. Its last path segment becomes the stored file name.
    pub source: String,
}

impl fmt::Debug for PublishRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishRequest")
            .field("token", &"<redacted>")
            .field("provider", &self.provider)
            .field("name", &self.name)
            .field("version", &self.version)
            .field("source", &self.source)
            .finish()
    }
}

/// Returned by `POST /publish` once the archive is in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReceipt {
    pub provider: String,
    pub name: String,
    pub version: String,
    pub source: String,

    /// Store-relative path the archive was written to.
    pub archive: String,
}
