use crate::auth::TokenAuthenticator;
use crate::ingest::PublishIngestor;
use docshelf_core::traits::{ArchiveFetcher, DocumentStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState<S: DocumentStore, F: ArchiveFetcher> {
    pub store: S,
    pub auth: TokenAuthenticator,
    pub ingestor: PublishIngestor<S, F>,
    /// Platforms listed on the index page.
    pub platforms: Arc<[String]>,
}
