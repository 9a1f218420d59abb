use docshelf_core::prelude::*;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

/// Decides which platform directory a publish lands in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NamespacePolicy {
    /// Every publish goes to this platform; the request's `provider` is ignored.
    Fixed(String),
    /// The request's `provider` names the platform. It must be a configured platform.
    Provider,
}

impl Default for NamespacePolicy {
    fn default() -> Self {
        Self::Fixed("dokka".to_string())
    }
}

impl FromStr for NamespacePolicy {
    type Err = Infallible;

    /// `provider` selects [`NamespacePolicy::Provider`], anything else is a fixed platform.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "provider" => Self::Provider,
            other => Self::Fixed(other.to_string()),
        })
    }
}

impl fmt::Display for NamespacePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(platform) => f.write_str(platform),
            Self::Provider => f.write_str("provider"),
        }
    }
}

/// Extracts the stored file name from the last path segment of the source URL.
pub fn archive_file_name(source: &str) -> Result<String, IngestError> {
    let url = Url::parse(source)
        .map_err(|e| IngestError::InvalidRequest(format!("source {source:?}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(IngestError::InvalidRequest(format!(
            "source scheme {:?} is not supported",
            url.scheme()
        )));
    }

    let name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    validate_segment(name)?;

    Ok(name.to_string())
}

/// Fetches published archives into a [`DocumentStore`].
#[derive(Clone)]
pub struct PublishIngestor<S: DocumentStore, F: ArchiveFetcher> {
    store: S,
    fetcher: F,
    namespace: NamespacePolicy,
    platforms: Arc<[String]>,
}

impl<S: DocumentStore, F: ArchiveFetcher> PublishIngestor<S, F> {
    pub fn new(
        store: S,
        fetcher: F,
        namespace: NamespacePolicy,
        platforms: impl Into<Arc<[String]>>,
    ) -> Self {
        Self {
            store,
            fetcher,
            namespace,
            platforms: platforms.into(),
        }
    }

    pub fn namespace_for<'a>(&'a self, provider: &'a str) -> Result<&'a str, IngestError> {
        match &self.namespace {
            NamespacePolicy::Fixed(platform) => Ok(platform),
            NamespacePolicy::Provider => {
                if self.platforms.iter().any(|p| p == provider) {
                    Ok(provider)
                } else {
                    Err(IngestError::InvalidRequest(format!(
                        "unknown provider {provider:?}"
                    )))
                }
            }
        }
    }

    /// Downloads `request.source` into the directory of its triple.
    ///
    /// Must only be called once the request's token has been checked.
    pub async fn ingest(&self, request: &PublishRequest) -> Result<PublishReceipt, IngestError> {
        let namespace = self.namespace_for(&request.provider)?;
        let artifact = Artifact::new(namespace, request.name.as_str(), request.version.as_str())?;
        let file_name = archive_file_name(&request.source)?;

        if file_name != artifact.archive_name() {
            warn!(
                "Archive {file_name} will not be served for {artifact}, expected {}",
                artifact.archive_name()
            );
        }

        info!(
            "Downloading {}/{}/{} from {}...",
            request.provider, request.name, request.version, request.source
        );

        let fetch_failed = |reason: String| IngestError::Fetch {
            source_url: request.source.clone(),
            reason,
        };

        let stream = self
            .fetcher
            .fetch(&request.source)
            .await
            .map_err(|e| fetch_failed(e.to_string()))?;

        let archive = self
            .store
            .write_archive(&artifact.directory(), &file_name, stream)
            .await
            .map_err(|e| match e {
                StoreError::Source(e) => fetch_failed(e.to_string()),
                StoreError::Io(e) => IngestError::Io(e),
                StoreError::Resolve(e) => e.into(),
            })?;

        info!("Completed {archive}");

        Ok(PublishReceipt {
            provider: request.provider.clone(),
            name: request.name.clone(),
            version: request.version.clone(),
            source: request.source.clone(),
            archive,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_last_path_segment() {
        assert_eq!(
            archive_file_name("http://host/path/proj-1.2.3-dokka.zip").unwrap(),
            "proj-1.2.3-dokka.zip"
        );
        assert_eq!(
            archive_file_name(
                "https://jenkins.example/job/X/7/artifact/build/distributions/x-1-dokka.zip?download=1"
            )
            .unwrap(),
            "x-1-dokka.zip"
        );
    }

    #[test]
    fn file_name_must_be_usable() {
        for bad in [
            "not a url",
            "ftp://host/a.zip",
            "file:///etc/passwd",
            "http://host/",
            "http://host/dir/",
        ] {
            assert!(
                matches!(archive_file_name(bad), Err(IngestError::InvalidRequest(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn namespace_policy_parses() {
        assert_eq!(
            "provider".parse::<NamespacePolicy>().unwrap(),
            NamespacePolicy::Provider
        );
        assert_eq!(
            "javadoc".parse::<NamespacePolicy>().unwrap(),
            NamespacePolicy::Fixed("javadoc".into())
        );
        assert_eq!(NamespacePolicy::default().to_string(), "dokka");
    }
}
