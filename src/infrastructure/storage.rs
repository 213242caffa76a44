use crate::config::StorageConfig;
use crate::services::storage::S3ObjectStore;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::{Credentials, Region};
use std::sync::Arc;
use tracing::info;

pub async fn setup_storage(config: &StorageConfig) -> Arc<S3ObjectStore> {
    let mut loader = aws_config::from_env().region(Region::new(config.region.clone()));

    if let (Some(access_key), Some(secret_key)) =
        (&config.access_key_id, &config.secret_access_key)
    {
        loader = loader.credentials_provider(Credentials::new(
            access_key.clone(),
            secret_key.clone(),
            None,
            None,
            "static",
        ));
    }

    match &config.endpoint_url {
        Some(endpoint_url) => {
            info!("☁️  S3 Storage: {} (Region: {})", endpoint_url, config.region);
            loader = loader.endpoint_url(endpoint_url);
        }
        None => info!("☁️  S3 Storage: AWS (Region: {})", config.region),
    }

    let aws_config = loader.load().await;

    // Single attempt per call; failures surface to the caller immediately
    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(config.force_path_style)
        .retry_config(RetryConfig::disabled())
        .build();

    let s3_client = aws_sdk_s3::Client::from_conf(s3_config);
    Arc::new(S3ObjectStore::new(s3_client))
}
