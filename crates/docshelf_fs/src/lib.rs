//! # docshelf FileSystem Store
//!
//! The local filesystem implementation of [`DocumentStore`].
//!
//! Archives live under the store root as
//! `{platform}/{project}/{version}/{project}-{version}-{platform}.zip`
//! and are opened fresh for every entry read.
//!
//! ## Features
//!
//! * **Staged Writes**: incoming archives are streamed into a hidden temporary file next to
//!   their destination and renamed into place, so readers never see a half-written archive.
//! * **Segment Validation**: every path segment is checked before it is joined onto the root.
//!
//! ## Usage
//!
//! ```no_run
//! use docshelf_fs::FileSystemStore;
//!
//! let store = FileSystemStore::new("./docs");
//! ```

use docshelf_core::prelude::*;
use futures::StreamExt;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

#[derive(Clone, Debug)]
pub struct FileSystemStore {
    root: PathBuf,
}

impl FileSystemStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { root: path.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn get_path(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|meta| meta.is_dir())
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|meta| meta.is_file())
}

async fn list_dirs(path: PathBuf) -> Vec<String> {
    let Ok(mut entries) = fs::read_dir(&path).await else {
        return Vec::new();
    };

    let mut names = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        if !entry.file_type().await.is_ok_and(|t| t.is_dir()) {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();
    names
}

fn read_failure(err: impl std::fmt::Display) -> ArchiveError {
    ArchiveError::ReadFailure(err.to_string())
}

fn read_zip_entry(path: &Path, name: &str) -> Result<Document, ArchiveError> {
    let file = std::fs::File::open(path).map_err(read_failure)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file)).map_err(read_failure)?;

    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(ArchiveError::EntryNotFound(name.to_string()));
        }
        Err(e) => return Err(read_failure(e)),
    };
    if entry.is_dir() {
        return Err(ArchiveError::EntryNotFound(name.to_string()));
    }

    let mut buffer = Vec::new();
    entry.read_to_end(&mut buffer).map_err(read_failure)?;

    Ok(Document {
        name: name.to_string(),
        bytes: buffer.into(),
        media_type: MediaType::of(name),
    })
}

async fn stream_to_file(path: &Path, mut stream: ByteStream) -> Result<(), StoreError> {
    let mut file = fs::File::create(path).await?;
    while let Some(res) = stream.next().await {
        let chunk = res.map_err(StoreError::Source)?;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    file.sync_all().await?;
    Ok(())
}

impl DocumentStore for FileSystemStore {
    async fn resolve(
        &self,
        platform: &str,
        project: &str,
        version: &str,
    ) -> Result<ArchiveLocation, ResolveError> {
        let artifact = Artifact::new(platform, project, version)?;

        let platform_dir = self.get_path(artifact.platform());
        if !is_dir(&platform_dir).await {
            return Err(ResolveError::PlatformNotFound(platform.to_string()));
        }

        let project_dir = platform_dir.join(artifact.project());
        if !is_dir(&project_dir).await {
            return Err(ResolveError::ProjectNotFound(project.to_string()));
        }

        let version_dir = project_dir.join(artifact.version());
        if !is_dir(&version_dir).await {
            return Err(ResolveError::VersionNotFound(version.to_string()));
        }

        let location = ArchiveLocation::new(artifact);
        if !is_file(&self.get_path(&location.path)).await {
            return Err(ResolveError::ArchiveNotFound(location.path));
        }

        Ok(location)
    }

    async fn read_entry(
        &self,
        archive: &ArchiveLocation,
        entry: &str,
    ) -> Result<Document, ArchiveError> {
        let path = self.get_path(&archive.path);
        let name = entry.to_string();

        tokio::task::spawn_blocking(move || read_zip_entry(&path, &name))
            .await
            .map_err(read_failure)?
    }

    async fn write_archive(
        &self,
        directory: &str,
        file_name: &str,
        stream: ByteStream,
    ) -> Result<String, StoreError> {
        for segment in directory.split('/') {
            validate_segment(segment)?;
        }
        validate_segment(file_name)?;

        let dir_path = self.get_path(directory);
        fs::create_dir_all(&dir_path).await?;

        let path = dir_path.join(file_name);
        let tmp_path = dir_path.join(format!(".{file_name}.{:016x}.tmp", rand::random::<u64>()));

        let staged = match stream_to_file(&tmp_path, stream).await {
            Ok(()) => fs::rename(&tmp_path, &path).await.map_err(StoreError::Io),
            Err(e) => Err(e),
        };
        if let Err(e) = staged {
            if let Err(cleanup) = fs::remove_file(&tmp_path).await {
                debug!("Could not remove staging file {tmp_path:?}: {cleanup}");
            }
            return Err(e);
        }

        Ok(format!("{directory}/{file_name}"))
    }

    async fn create_platform(&self, platform: &str) -> Result<(), StoreError> {
        validate_segment(platform)?;
        fs::create_dir_all(self.get_path(platform)).await?;
        Ok(())
    }

    async fn list_projects(&self, platform: &str) -> Vec<String> {
        if validate_segment(platform).is_err() {
            return Vec::new();
        }
        list_dirs(self.get_path(platform)).await
    }

    async fn list_versions(&self, platform: &str, project: &str) -> Vec<String> {
        if validate_segment(platform).is_err() || validate_segment(project).is_err() {
            return Vec::new();
        }
        list_dirs(self.get_path(platform).join(project)).await
    }
}
