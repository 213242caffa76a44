use crate::error::{AppError, Result};
use crate::services::preview::{Preview, render_preview};
use crate::services::staging::{StagedFile, StagingArea};
use crate::services::storage::ObjectStore;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

const REPORT_IDENTIFIER: &str = "report.txt";

/// Bucket operations shared by the interactive menu and the tool server.
///
/// Bucket names and keys are trimmed of surrounding whitespace and otherwise
/// passed through to the store unchanged.
pub struct FileManager {
    store: Arc<dyn ObjectStore>,
    staging: StagingArea,
}

impl FileManager {
    pub fn new(store: Arc<dyn ObjectStore>, staging: StagingArea) -> Self {
        Self { store, staging }
    }

    pub async fn list_files(&self, bucket: &str) -> Result<Vec<String>> {
        self.store.list_objects(bucket.trim()).await
    }

    pub async fn delete_file(&self, bucket: &str, key: &str) -> Result<()> {
        let (bucket, key) = (bucket.trim(), key.trim());
        self.store.delete_object(bucket, key).await?;
        info!("🗑️  Deleted '{}' from '{}'", key, bucket);
        Ok(())
    }

    pub async fn upload_text(&self, bucket: &str, key: &str, content: &str) -> Result<()> {
        let (bucket, key) = (bucket.trim(), key.trim());
        self.store
            .put_object(bucket, key, content.as_bytes().to_vec())
            .await?;
        info!("✅ Uploaded {} bytes of text as '{}'", content.len(), key);
        Ok(())
    }

    /// Uploads a local file, returning the key it was stored under. A missing or
    /// blank `key` defaults to the file's base name.
    pub async fn upload_file(
        &self,
        bucket: &str,
        file_path: &str,
        key: Option<&str>,
    ) -> Result<String> {
        let path = Path::new(file_path.trim());
        let key = match key.map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => key.to_string(),
            None => default_key(path)?,
        };

        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(AppError::LocalIo(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' is not a regular file", path.display()),
            )));
        }

        self.store.upload_from_path(bucket.trim(), path, &key).await?;
        info!("✅ Uploaded '{}' as '{}'", path.display(), key);
        Ok(key)
    }

    /// Downloads `key` into a staged file and renders it. The staged file is
    /// removed whether or not the download and render succeed.
    pub async fn download_and_preview(&self, bucket: &str, key: &str) -> Result<Preview> {
        let (bucket, key) = (bucket.trim(), key.trim());
        let staged = self.staging.stage_for_read(key)?;

        let result = match self.store.download_to_path(bucket, key, staged.path()).await {
            Ok(()) => preview_staged(staged.path().to_path_buf(), key.to_string()).await,
            Err(e) => Err(e),
        };

        release(staged);
        result
    }

    /// Joins `lines` with `\n`, stages the report and uploads it as `key`.
    pub async fn upload_report<S: AsRef<str>>(
        &self,
        bucket: &str,
        key: &str,
        lines: &[S],
    ) -> Result<()> {
        let (bucket, key) = (bucket.trim(), key.trim());
        let report = join_report(lines);
        let staged = self
            .staging
            .stage_for_write(REPORT_IDENTIFIER, report.as_bytes())?;

        let result = self
            .store
            .upload_from_path(bucket, staged.path(), key)
            .await;

        release(staged);
        if result.is_ok() {
            info!("✅ Report of {} lines uploaded as '{}'", lines.len(), key);
        }
        result
    }
}

pub fn join_report<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join("\n")
}

fn default_key(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            AppError::LocalIo(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' has no file name", path.display()),
            ))
        })
}

/// Text reads and PDF parsing are blocking, so they run off the async workers.
async fn preview_staged(path: PathBuf, declared_name: String) -> Result<Preview> {
    tokio::task::spawn_blocking(move || render_preview(&path, &declared_name))
        .await
        .map_err(|e| AppError::LocalIo(io::Error::other(e)))?
}

fn release(staged: StagedFile) {
    let path = staged.path().to_path_buf();
    if let Err(e) = staged.close() {
        warn!("Failed to remove staged file {}: {}", path.display(), e);
    }
}
