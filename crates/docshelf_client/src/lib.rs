use docshelf_core::prelude::{PublishReceipt, PublishRequest};
use reqwest::{Client, StatusCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocshelfClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned error {0}: {1}")]
    ServerError(StatusCode, String),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, DocshelfClientError>;

#[derive(Clone)]
pub struct DocshelfClient {
    base_url: String,
    client: Client,
}

impl DocshelfClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        Err(DocshelfClientError::ServerError(status, text))
    }

    /// Asks the server to download and store `request.source`.
    pub async fn publish(&self, request: &PublishRequest) -> Result<PublishReceipt> {
        let url = format!("{}/publish", self.base_url);
        let response = self.client.post(&url).json(request).send().await?;
        let response = Self::check(response).await?;

        response
            .json()
            .await
            .map_err(|e| DocshelfClientError::Validation(format!("Failed to parse receipt: {e}")))
    }

    /// Downloads one file out of a published archive. An empty `path` fetches the index page.
    pub async fn fetch_document(
        &self,
        platform: &str,
        project: &str,
        version: &str,
        path: &str,
    ) -> Result<Vec<u8>> {
        let url = format!(
            "{}/{platform}/{project}/{version}/{}",
            self.base_url,
            path.trim_start_matches('/')
        );
        let response = self.client.get(&url).send().await?;
        let response = Self::check(response).await?;

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        http::StatusCode as AxumStatus,
        routing::{get, post},
    };

    async fn spawn(app: Router) -> DocshelfClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        let client = Client::builder().no_proxy().build().unwrap();
        DocshelfClient::with_client(format!("http://{addr}/"), client)
    }

    fn request(token: &str) -> PublishRequest {
        PublishRequest {
            token: token.into(),
            provider: "dokka".into(),
            name: "proj".into(),
            version: "1.0".into(),
            source: "http://ci/proj-1.0-dokka.zip".into(),
        }
    }

    #[tokio::test]
    async fn publish_returns_receipt() {
        let app = Router::new().route(
            "/publish",
            post(|Json(body): Json<serde_json::Value>| async move {
                if body["token"] != "good" {
                    return Err((AxumStatus::UNAUTHORIZED, "Token invalid"));
                }
                Ok(Json(serde_json::json!({
                    "provider": body["provider"],
                    "name": body["name"],
                    "version": body["version"],
                    "source": body["source"],
                    "archive": "dokka/proj/1.0/proj-1.0-dokka.zip",
                })))
            }),
        );
        let client = spawn(app).await;

        let receipt = client.publish(&request("good")).await.unwrap();
        assert_eq!(receipt.archive, "dokka/proj/1.0/proj-1.0-dokka.zip");
        assert_eq!(receipt.name, "proj");

        match client.publish(&request("bad")).await {
            Err(DocshelfClientError::ServerError(status, text)) => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(text, "Token invalid");
            }
            other => panic!("expected unauthorized, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_document_builds_path() {
        let app = Router::new()
            .route("/dokka/proj/1.0/", get(|| async { "index" }))
            .route("/dokka/proj/1.0/api/page.html", get(|| async { "page" }));
        let client = spawn(app).await;

        assert_eq!(
            client.fetch_document("dokka", "proj", "1.0", "").await.unwrap(),
            b"index"
        );
        assert_eq!(
            client
                .fetch_document("dokka", "proj", "1.0", "/api/page.html")
                .await
                .unwrap(),
            b"page"
        );
        assert!(matches!(
            client.fetch_document("dokka", "proj", "1.0", "nope.html").await,
            Err(DocshelfClientError::ServerError(status, _)) if status == StatusCode::NOT_FOUND
        ));
    }
}
