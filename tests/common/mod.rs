#![allow(dead_code)]

use async_trait::async_trait;
use s3_file_manager::error::{AppError, Result};
use s3_file_manager::services::file_manager::FileManager;
use s3_file_manager::services::staging::StagingArea;
use s3_file_manager::services::storage::ObjectStore;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// In-memory buckets with S3-like semantics for missing buckets and keys.
pub struct MockObjectStore {
    buckets: Mutex<HashMap<String, BTreeMap<String, Vec<u8>>>>,
    fail_uploads: AtomicBool,
    pin_uploaded_paths: AtomicBool,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            fail_uploads: AtomicBool::new(false),
            pin_uploaded_paths: AtomicBool::new(false),
        }
    }

    pub fn with_bucket(self, bucket: &str) -> Self {
        self.buckets
            .lock()
            .unwrap()
            .insert(bucket.to_string(), BTreeMap::new());
        self
    }

    pub fn fail_uploads(&self) {
        self.fail_uploads.store(true, Ordering::SeqCst);
    }

    /// After reading an uploaded local file, replaces it with a non-empty
    /// directory so that removing it as a file fails.
    pub fn pin_uploaded_paths(&self) {
        self.pin_uploaded_paths.store(true, Ordering::SeqCst);
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.buckets
            .lock()
            .unwrap()
            .get(bucket)
            .and_then(|objects| objects.get(key).cloned())
    }

    pub fn insert(&self, bucket: &str, key: &str, data: &[u8]) {
        self.buckets
            .lock()
            .unwrap()
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), data.to_vec());
    }

    fn store(&self, operation: &'static str, bucket: &str, key: &str, data: Vec<u8>) -> Result<()> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(AppError::store(operation, "AccessDenied"));
        }
        let mut buckets = self.buckets.lock().unwrap();
        let objects = buckets
            .get_mut(bucket)
            .ok_or_else(|| AppError::store(operation, "NoSuchBucket"))?;
        objects.insert(key.to_string(), data);
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn list_objects(&self, bucket: &str) -> Result<Vec<String>> {
        let buckets = self.buckets.lock().unwrap();
        let objects = buckets
            .get(bucket)
            .ok_or_else(|| AppError::store("list_objects", "NoSuchBucket"))?;
        Ok(objects.keys().cloned().collect())
    }

    async fn put_object(&self, bucket: &str, key: &str, data: Vec<u8>) -> Result<()> {
        self.store("put_object", bucket, key, data)
    }

    async fn upload_from_path(&self, bucket: &str, local_path: &Path, key: &str) -> Result<()> {
        let data = std::fs::read(local_path)?;
        if self.pin_uploaded_paths.load(Ordering::SeqCst) {
            std::fs::remove_file(local_path)?;
            std::fs::create_dir(local_path)?;
            std::fs::write(local_path.join("pinned"), b"x")?;
        }
        self.store("upload_file", bucket, key, data)
    }

    async fn download_to_path(&self, bucket: &str, key: &str, local_path: &Path) -> Result<()> {
        let data = self
            .object(bucket, key)
            .ok_or_else(|| AppError::store("get_object", "NoSuchKey"))?;
        std::fs::write(local_path, data)?;
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        let mut buckets = self.buckets.lock().unwrap();
        let objects = buckets
            .get_mut(bucket)
            .ok_or_else(|| AppError::store("delete_object", "NoSuchBucket"))?;
        objects.remove(key);
        Ok(())
    }
}

pub struct Fixture {
    pub store: Arc<MockObjectStore>,
    pub manager: Arc<FileManager>,
    pub staging_dir: TempDir,
}

impl Fixture {
    pub fn new(buckets: &[&str]) -> Self {
        let store = buckets
            .iter()
            .fold(MockObjectStore::new(), |store, bucket| store.with_bucket(bucket));
        let store = Arc::new(store);
        let staging_dir = tempfile::tempdir().unwrap();
        let manager = Arc::new(FileManager::new(
            store.clone(),
            StagingArea::new(staging_dir.path()),
        ));
        Self {
            store,
            manager,
            staging_dir,
        }
    }

    pub fn staged_files(&self) -> Vec<String> {
        std::fs::read_dir(self.staging_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect()
    }
}
