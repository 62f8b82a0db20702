//! On-disk bearer token for the CLI.
//!
//! Lookup order: `SEVA_TOKEN` environment variable, then the credentials
//! file (`~/.config/seva/credentials` by default).

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AuthError;

const CREDENTIALS_FILE_NAME: &str = "credentials";
pub const TOKEN_ENV: &str = "SEVA_TOKEN";

#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the default location under the user config directory.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenStoreError` if no config directory exists.
    pub fn default_location() -> Result<Self, AuthError> {
        dirs::config_dir()
            .map(|dir| Self::new(dir.join("seva").join(CREDENTIALS_FILE_NAME)))
            .ok_or_else(|| {
                AuthError::TokenStoreError("config directory not found, cannot store credentials".into())
            })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `token`, owner-readable only on Unix.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenStoreError` if the file cannot be written.
    pub fn store(&self, token: &str) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AuthError::TokenStoreError(format!("mkdir {}: {e}", parent.display())))?;
        }
        fs::write(&self.path, token)
            .map_err(|e| AuthError::TokenStoreError(format!("write {}: {e}", self.path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600)).map_err(|e| {
                AuthError::TokenStoreError(format!("chmod {}: {e}", self.path.display()))
            })?;
        }
        Ok(())
    }

    /// Token from the environment or the file. Blank values count as absent.
    #[must_use]
    pub fn load(&self) -> Option<String> {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.trim().is_empty() {
                return Some(token.trim().to_string());
            }
        }
        self.load_file()
    }

    /// # Errors
    ///
    /// Returns `AuthError::TokenStoreError` if the file exists but cannot be
    /// removed.
    pub fn delete(&self) -> Result<(), AuthError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| {
                AuthError::TokenStoreError(format!("failed to delete {}: {e}", self.path.display()))
            })?;
        }
        Ok(())
    }

    fn load_file(&self) -> Option<String> {
        fs::read_to_string(&self.path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}
