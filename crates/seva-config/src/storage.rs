//! Image object-store configuration.

use serde::{Deserialize, Serialize};

/// Which object store issue photos are written to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Files under `root` on the local filesystem.
    #[default]
    Local,
    /// Process-local, lost on exit.
    Memory,
    /// Any S3-compatible service.
    S3,
}

fn default_root() -> String {
    String::from(".seva/uploads")
}

fn default_region() -> String {
    String::from("auto")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Root directory for the `local` backend.
    #[serde(default = "default_root")]
    pub root: String,

    #[serde(default)]
    pub bucket: String,

    /// Custom endpoint for S3-compatible services. Empty means AWS.
    #[serde(default)]
    pub endpoint: String,

    #[serde(default)]
    pub access_key_id: String,

    #[serde(default)]
    pub secret_access_key: String,

    #[serde(default = "default_region")]
    pub region: String,

    /// Prefix of the fetch URLs handed back after upload. When empty,
    /// `file://{root}` is used for the local backend and `memory://seva` for
    /// the in-memory one.
    #[serde(default)]
    pub public_base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            root: default_root(),
            bucket: String::new(),
            endpoint: String::new(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            region: default_region(),
            public_base_url: String::new(),
        }
    }
}

impl StorageConfig {
    /// Check if the selected backend has the fields it needs.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        match self.backend {
            StorageBackend::Local => !self.root.is_empty(),
            StorageBackend::Memory => true,
            StorageBackend::S3 => {
                !self.bucket.is_empty()
                    && !self.access_key_id.is_empty()
                    && !self.secret_access_key.is_empty()
            }
        }
    }

    /// Base of the public URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        let base = if self.public_base_url.is_empty() {
            match self.backend {
                StorageBackend::Local => format!("file://{}", self.root),
                StorageBackend::Memory => String::from("memory://seva"),
                StorageBackend::S3 if self.endpoint.is_empty() => {
                    format!("https://{}.s3.{}.amazonaws.com", self.bucket, self.region)
                }
                StorageBackend::S3 => format!(
                    "{}/{}",
                    self.endpoint.trim_end_matches('/'),
                    self.bucket
                ),
            }
        } else {
            self.public_base_url.clone()
        };
        base.trim_end_matches('/').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_local_and_configured() {
        let config = StorageConfig::default();
        assert_eq!(config.backend, StorageBackend::Local);
        assert!(config.is_configured());
        assert_eq!(config.base_url(), "file://.seva/uploads");
    }

    #[test]
    fn s3_requires_bucket_and_credentials() {
        let config = StorageConfig {
            backend: StorageBackend::S3,
            bucket: "seva".into(),
            ..StorageConfig::default()
        };
        assert!(!config.is_configured());
        let config = StorageConfig {
            access_key_id: "key".into(),
            secret_access_key: "secret".into(),
            ..config
        };
        assert!(config.is_configured());
    }

    #[test]
    fn s3_base_url_uses_endpoint_when_set() {
        let config = StorageConfig {
            backend: StorageBackend::S3,
            bucket: "seva".into(),
            endpoint: "http://localhost:9000/".into(),
            ..StorageConfig::default()
        };
        assert_eq!(config.base_url(), "http://localhost:9000/seva");
    }

    #[test]
    fn public_base_url_wins_and_loses_trailing_slash() {
        let config = StorageConfig {
            public_base_url: "https://cdn.example.org/".into(),
            ..StorageConfig::default()
        };
        assert_eq!(config.base_url(), "https://cdn.example.org");
    }
}
