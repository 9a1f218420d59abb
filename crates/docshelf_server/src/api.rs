use crate::pages::{
    IndexPage, MessagePage, PlatformListing, ProjectListing, VersionLink, index_href,
};
use crate::state::AppState;

use askama::Template;
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use docshelf_core::prelude::*;
use tracing::{error, warn};

pub struct ApiError(anyhow::Error);

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

fn message_page(status: StatusCode, title: &str, message: &str) -> Response {
    match (MessagePage { title, message }).render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(_) => (status, message.to_string()).into_response(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Some(err) = self.0.downcast_ref::<ResolveError>() {
            return match err {
                ResolveError::InvalidSegment(_) => {
                    (StatusCode::BAD_REQUEST, err.to_string()).into_response()
                }
                _ => message_page(StatusCode::NOT_FOUND, "Not Found", &err.to_string()),
            };
        }

        if let Some(err) = self.0.downcast_ref::<ArchiveError>() {
            return match err {
                ArchiveError::EntryNotFound(_) => {
                    message_page(StatusCode::NOT_FOUND, "Not Found", &err.to_string())
                }
                ArchiveError::ReadFailure(_) => message_page(
                    StatusCode::NOT_FOUND,
                    "Error",
                    "Something went wrong opening this archive.",
                ),
            };
        }

        if self.0.downcast_ref::<AuthError>().is_some() {
            return (StatusCode::UNAUTHORIZED, "Token invalid").into_response();
        }

        if let Some(err) = self.0.downcast_ref::<IngestError>() {
            let status = match err {
                IngestError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                IngestError::Fetch { .. } => StatusCode::BAD_GATEWAY,
                IngestError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            return (status, err.to_string()).into_response();
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal Server Error: {}", self.0),
        )
            .into_response()
    }
}

async fn serve<S: DocumentStore, F: ArchiveFetcher>(
    state: &AppState<S, F>,
    platform: &str,
    project: &str,
    version: &str,
    doc_path: &str,
) -> Result<Response, ApiError> {
    let location = state.store.resolve(platform, project, version).await?;
    let entry = document_path(doc_path);

    let document = match state.store.read_entry(&location, entry).await {
        Ok(document) => document,
        Err(ArchiveError::ReadFailure(reason)) => {
            error!("Failed to open {}: {reason}", location.path);
            return Err(ArchiveError::ReadFailure(reason).into());
        }
        Err(e) => return Err(e.into()),
    };

    Ok((
        [(header::CONTENT_TYPE, document.media_type.header_value())],
        document.bytes,
    )
        .into_response())
}

/// GET /{platform}/{project}/{version}/{*doc_path}
pub async fn serve_document<S: DocumentStore, F: ArchiveFetcher>(
    State(state): State<AppState<S, F>>,
    Path((platform, project, version, doc_path)): Path<(String, String, String, String)>,
) -> Result<Response, ApiError> {
    serve(&state, &platform, &project, &version, &doc_path).await
}

/// GET /{platform}/{project}/{version}/
pub async fn serve_index<S: DocumentStore, F: ArchiveFetcher>(
    State(state): State<AppState<S, F>>,
    Path((platform, project, version)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    serve(&state, &platform, &project, &version, "").await
}

/// GET /{platform}/{project}/{version}
///
/// Relative links inside the served pages only resolve below a trailing slash.
pub async fn redirect_to_index(
    Path((platform, project, version)): Path<(String, String, String)>,
) -> Result<Redirect, ApiError> {
    let artifact = Artifact::new(platform, project, version)?;
    Ok(Redirect::permanent(&index_href(
        artifact.platform(),
        artifact.project(),
        artifact.version(),
    )))
}

/// POST /publish
pub async fn publish<S: DocumentStore, F: ArchiveFetcher>(
    State(state): State<AppState<S, F>>,
    Json(request): Json<PublishRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Err(e) = state.auth.authenticate(&request.token).await {
        warn!(
            "Rejected publish of {}/{}: invalid token",
            request.name, request.version
        );
        return Err(e.into());
    }

    let receipt = state.ingestor.ingest(&request).await.inspect_err(|e| {
        error!("Publish of {}/{} failed: {e}", request.name, request.version);
    })?;

    Ok(Json(receipt))
}

/// GET /
pub async fn index<S: DocumentStore, F: ArchiveFetcher>(
    State(state): State<AppState<S, F>>,
) -> Result<impl IntoResponse, ApiError> {
    let mut platforms = Vec::with_capacity(state.platforms.len());
    for platform in state.platforms.iter() {
        let mut projects = Vec::new();
        for project in state.store.list_projects(platform).await {
            let versions = state
                .store
                .list_versions(platform, &project)
                .await
                .into_iter()
                .map(|version| VersionLink {
                    href: index_href(platform, &project, &version),
                    name: version,
                })
                .collect();
            projects.push(ProjectListing {
                name: project,
                versions,
            });
        }
        platforms.push(PlatformListing {
            name: platform.clone(),
            projects,
        });
    }

    Ok(Html(IndexPage { platforms }.render()?))
}
