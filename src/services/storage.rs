use crate::error::{AppError, Result};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Whole-object primitives over an S3-compatible store, scoped to bucket + key.
///
/// Every call is a single request: no retries, no pagination, no multipart.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Keys in the first listing page of `bucket`. An empty bucket is `Ok(vec![])`.
    async fn list_objects(&self, bucket: &str) -> Result<Vec<String>>;
    async fn put_object(&self, bucket: &str, key: &str, data: Vec<u8>) -> Result<()>;
    async fn upload_from_path(&self, bucket: &str, local_path: &Path, key: &str) -> Result<()>;
    /// Writes the full object body to `local_path`, replacing its contents.
    async fn download_to_path(&self, bucket: &str, key: &str, local_path: &Path) -> Result<()>;
    /// Deleting a key that does not exist is not an error.
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;
}

pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn store_error<E>(operation: &'static str, err: E) -> AppError
where
    E: std::error::Error,
{
    AppError::store(operation, DisplayErrorContext(err).to_string())
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn list_objects(&self, bucket: &str) -> Result<Vec<String>> {
        let res = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| store_error("list_objects", e))?;

        if res.is_truncated.unwrap_or(false) {
            tracing::debug!("Listing of '{}' truncated at first page", bucket);
        }

        Ok(res
            .contents
            .unwrap_or_default()
            .into_iter()
            .filter_map(|object| object.key)
            .collect())
    }

    async fn put_object(&self, bucket: &str, key: &str, data: Vec<u8>) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| store_error("put_object", e))?;
        Ok(())
    }

    async fn upload_from_path(&self, bucket: &str, local_path: &Path, key: &str) -> Result<()> {
        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| AppError::LocalIo(std::io::Error::other(e)))?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| store_error("upload_file", e))?;
        Ok(())
    }

    async fn download_to_path(&self, bucket: &str, key: &str, local_path: &Path) -> Result<()> {
        let res = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| store_error("get_object", e))?;

        let data = res
            .body
            .collect()
            .await
            .map_err(|e| store_error("get_object", e))?
            .into_bytes();

        let mut file = tokio::fs::File::create(local_path).await?;
        file.write_all(&data).await?;
        file.flush().await?;
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| store_error("delete_object", e))?;
        Ok(())
    }
}
