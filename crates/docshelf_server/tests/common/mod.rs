//! Shared helpers for the HTTP tests.
//! Note: #[allow(dead_code)] because each test file compiles common/ separately.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use bytes::Bytes;
use docshelf_core::prelude::*;
use docshelf_fs::FileSystemStore;
use docshelf_server::prelude::*;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;
use zip::write::SimpleFileOptions;

#[allow(dead_code)]
#[derive(Clone)]
enum Source {
    Complete(Vec<u8>),
    Interrupted(Vec<u8>),
}

/// Serves canned archives keyed by source URL.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct StaticFetcher {
    sources: Arc<Mutex<HashMap<String, Source>>>,
    requests: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl StaticFetcher {
    pub fn serve(&self, url: &str, bytes: Vec<u8>) {
        self.sources
            .lock()
            .unwrap()
            .insert(url.to_string(), Source::Complete(bytes));
    }

    /// The stream yields `partial` and then fails.
    pub fn serve_interrupted(&self, url: &str, partial: Vec<u8>) {
        self.sources
            .lock()
            .unwrap()
            .insert(url.to_string(), Source::Interrupted(partial));
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl ArchiveFetcher for StaticFetcher {
    async fn fetch(&self, source: &str) -> Result<ByteStream, FetchError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let found = self.sources.lock().unwrap().get(source).cloned();

        let chunks = match found {
            Some(Source::Complete(bytes)) => vec![Ok(Bytes::from(bytes))],
            Some(Source::Interrupted(bytes)) => vec![
                Ok(Bytes::from(bytes)),
                Err(std::io::Error::other("connection reset")),
            ],
            None => return Err(FetchError::Status(404)),
        };
        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}

#[allow(dead_code)]
pub fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(data.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// A router over a temporary store with a freshly generated token.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub fetcher: StaticFetcher,
    pub token: String,
    temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config<M>(modifier: M) -> Self
    where
        M: FnOnce(&mut DocshelfServerConfig),
    {
        let fetcher = StaticFetcher::default();
        let (temp_dir, router, token) = Self::build(fetcher.clone(), modifier).await;
        Self {
            router,
            fetcher,
            token,
            temp_dir,
        }
    }

    pub async fn build<F, M>(fetcher: F, modifier: M) -> (TempDir, axum::Router, String)
    where
        F: ArchiveFetcher,
        M: FnOnce(&mut DocshelfServerConfig),
    {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let store_root = temp_dir.path().join("store");

        let mut config = DocshelfServerConfig {
            token_file: temp_dir.path().join("token.txt"),
            ..Default::default()
        };
        modifier(&mut config);
        let token_file = config.token_file.clone();

        let router = DocshelfServer::new(config)
            .build(FileSystemStore::new(&store_root), fetcher)
            .await
            .expect("Failed to build server");
        let token = std::fs::read_to_string(token_file).expect("Token was not generated");

        (temp_dir, router, token)
    }

    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join("store")
    }

    pub fn place_archive(&self, platform: &str, project: &str, version: &str, bytes: &[u8]) {
        let dir = self.root().join(platform).join(project).join(version);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(format!("{project}-{version}-{platform}.zip")),
            bytes,
        )
        .unwrap();
    }

    pub fn read(&self, relative: impl AsRef<Path>) -> Vec<u8> {
        std::fs::read(self.root().join(relative)).unwrap()
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        send(&self.router, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn publish(&self, body: serde_json::Value) -> TestResponse {
        let request = Request::post("/publish")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        send(&self.router, request).await
    }
}

#[allow(dead_code)]
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub location: Option<String>,
    pub body: Vec<u8>,
}

#[allow(dead_code)]
impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

#[allow(dead_code)]
pub async fn send(router: &axum::Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let header_value = |name: header::HeaderName| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let content_type = header_value(header::CONTENT_TYPE);
    let location = header_value(header::LOCATION);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();

    TestResponse {
        status,
        content_type,
        location,
        body,
    }
}
