use crate::{api, prelude::*};
use docshelf_core::prelude::*;
use axum::{
    Router,
    routing::{get, post},
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

/// The builder for the docshelf server.
#[derive(Clone, Debug, Default)]
pub struct DocshelfServer {
    config: DocshelfServerConfig,
}

impl DocshelfServer {
    pub fn new(config: DocshelfServerConfig) -> Self {
        Self { config }
    }
}

#[derive(Clone, Debug)]
pub struct DocshelfServerConfig {
    /// Where the shared publish token is kept.
    ///
    /// Defaults to `./token.txt`. Created on startup if missing.
    pub token_file: PathBuf,
    /// Platforms created on startup and listed on the index page.
    ///
    /// Defaults to `dokka` and `javadoc`.
    pub platforms: Vec<String>,
    /// Where publishes are stored, see [`NamespacePolicy`].
    pub namespace: NamespacePolicy,
    /// Directory served under `/resources`, e.g. the index stylesheet.
    pub resources_dir: Option<PathBuf>,
}

impl Default for DocshelfServerConfig {
    fn default() -> Self {
        Self {
            token_file: PathBuf::from("./token.txt"),
            platforms: vec!["dokka".to_string(), "javadoc".to_string()],
            namespace: NamespacePolicy::default(),
            resources_dir: None,
        }
    }
}

impl DocshelfServer {
    /// Prepares the store and the token file, then assembles the router.
    pub async fn build<S: DocumentStore, F: ArchiveFetcher>(
        self,
        store: S,
        fetcher: F,
    ) -> anyhow::Result<Router> {
        let DocshelfServerConfig {
            token_file,
            platforms,
            namespace,
            resources_dir,
        } = self.config;

        for platform in &platforms {
            store.create_platform(platform).await?;
        }

        let auth = TokenAuthenticator::new(token_file);
        auth.ensure_token().await?;

        info!("Publishing into namespace '{namespace}'");
        let platforms: Arc<[String]> = platforms.into();
        let ingestor = PublishIngestor::new(store.clone(), fetcher, namespace, platforms.clone());
        let state = AppState {
            store,
            auth,
            ingestor,
            platforms,
        };

        let mut router = Router::new()
            .route("/", get(api::index::<S, F>))
            .route("/health", get(|| async { "OK" }))
            .route("/publish", post(api::publish::<S, F>))
            .route("/{platform}/{project}/{version}", get(api::redirect_to_index))
            .route("/{platform}/{project}/{version}/", get(api::serve_index::<S, F>))
            .route(
                "/{platform}/{project}/{version}/{*doc_path}",
                get(api::serve_document::<S, F>),
            );

        if let Some(dir) = resources_dir {
            router = router.nest_service("/resources", ServeDir::new(dir));
        }

        Ok(router.layer(TraceLayer::new_for_http()).with_state(state))
    }
}
