use crate::artifact::ArchiveLocation;
use crate::error::*;
use crate::media::MediaType;

use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// A single entry read out of an archive.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub bytes: Bytes,
    pub media_type: MediaType,
}

pub trait DocumentStore: Send + Sync + 'static + Clone {
    /// Locates the archive for a triple, checking platform, project, version
    /// and archive file in that order.
    fn resolve(
        &self,
        platform: &str,
        project: &str,
        version: &str,
    ) -> impl Future<Output = Result<ArchiveLocation, ResolveError>> + Send;

    /// Reads one entry by exact name. The archive is opened for this call only.
    fn read_entry(
        &self,
        archive: &ArchiveLocation,
        entry: &str,
    ) -> impl Future<Output = Result<Document, ArchiveError>> + Send;

    /// Streams an archive into `{directory}/{file_name}`, creating the directory
    /// first and replacing any previous file. Returns the store-relative path.
    fn write_archive(
        &self,
        directory: &str,
        file_name: &str,
        stream: ByteStream,
    ) -> impl Future<Output = Result<String, StoreError>> + Send;

    fn create_platform(&self, platform: &str)
    -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Project directories under a platform. Empty on any failure.
    fn list_projects(&self, platform: &str) -> impl Future<Output = Vec<String>> + Send;

    /// Version directories under a project. Empty on any failure.
    fn list_versions(
        &self,
        platform: &str,
        project: &str,
    ) -> impl Future<Output = Vec<String>> + Send;
}

/// Opens a byte stream for a remote archive.
pub trait ArchiveFetcher: Send + Sync + 'static + Clone {
    fn fetch(&self, source: &str) -> impl Future<Output = Result<ByteStream, FetchError>> + Send;
}
