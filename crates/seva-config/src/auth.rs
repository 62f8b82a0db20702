//! Email/password authentication settings.

use serde::{Deserialize, Serialize};

const fn default_min_password_len() -> usize {
    6
}

const fn default_session_ttl_hours() -> u32 {
    24 * 7
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default = "default_min_password_len")]
    pub min_password_len: usize,

    /// Lifetime of a bearer token issued at sign-in.
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            min_password_len: default_min_password_len(),
            session_ttl_hours: default_session_ttl_hours(),
        }
    }
}
