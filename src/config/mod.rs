use std::env;
use std::path::PathBuf;

/// Object-storage connection and local staging configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Static access key; the SDK credential chain is used when unset
    pub access_key_id: Option<String>,

    /// Static secret key, paired with `access_key_id`
    pub secret_access_key: Option<String>,

    /// Region (default: "us-east-1")
    pub region: String,

    /// Custom S3-compatible endpoint, e.g. a MinIO server
    pub endpoint_url: Option<String>,

    /// Path-style addressing (default: true when a custom endpoint is set)
    pub force_path_style: bool,

    /// Directory holding staged files (default: ".")
    pub staging_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            access_key_id: None,
            secret_access_key: None,
            region: "us-east-1".to_string(),
            endpoint_url: None,
            force_path_style: false,
            staging_dir: PathBuf::from("."),
        }
    }
}

impl StorageConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let endpoint_url = non_empty("S3_ENDPOINT_URL");
        let force_path_style = non_empty("S3_FORCE_PATH_STYLE")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(endpoint_url.is_some());

        Self {
            access_key_id: non_empty("AWS_ACCESS_KEY_ID"),
            secret_access_key: non_empty("AWS_SECRET_ACCESS_KEY"),
            region: non_empty("AWS_DEFAULT_REGION").unwrap_or(default.region),
            endpoint_url,
            force_path_style,
            staging_dir: non_empty("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.staging_dir),
        }
    }

    pub fn has_static_credentials(&self) -> bool {
        self.access_key_id.is_some() && self.secret_access_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = StorageConfig::default();
        assert_eq!(config.region, "us-east-1");
        assert!(config.endpoint_url.is_none());
        assert!(!config.force_path_style);
        assert_eq!(config.staging_dir, PathBuf::from("."));
        assert!(!config.has_static_credentials());
    }

    #[test]
    fn test_region_falls_back_to_default() {
        let config = StorageConfig::from_lookup(lookup(&[("AWS_DEFAULT_REGION", "  ")]));
        assert_eq!(config.region, "us-east-1");

        let config = StorageConfig::from_lookup(lookup(&[("AWS_DEFAULT_REGION", "eu-west-2")]));
        assert_eq!(config.region, "eu-west-2");
    }

    #[test]
    fn test_static_credentials() {
        let config = StorageConfig::from_lookup(lookup(&[
            ("AWS_ACCESS_KEY_ID", "AKIA"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
        ]));
        assert!(config.has_static_credentials());

        let config = StorageConfig::from_lookup(lookup(&[("AWS_ACCESS_KEY_ID", "AKIA")]));
        assert!(!config.has_static_credentials());
    }

    #[test]
    fn test_endpoint_enables_path_style() {
        let config =
            StorageConfig::from_lookup(lookup(&[("S3_ENDPOINT_URL", "http://127.0.0.1:9000")]));
        assert!(config.force_path_style);

        let config = StorageConfig::from_lookup(lookup(&[
            ("S3_ENDPOINT_URL", "http://127.0.0.1:9000"),
            ("S3_FORCE_PATH_STYLE", "false"),
        ]));
        assert!(!config.force_path_style);
    }

    #[test]
    fn test_staging_dir_override() {
        let config = StorageConfig::from_lookup(lookup(&[("STAGING_DIR", "/tmp/staging")]));
        assert_eq!(config.staging_dir, PathBuf::from("/tmp/staging"));
    }
}
