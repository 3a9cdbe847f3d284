//! Share token and link configuration.

use serde::{Deserialize, Serialize};

/// Settings governing share token generation and link construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Number of random bytes per token before encoding.
    ///
    /// Token entropy is the security boundary for invite and link
    /// redemption, so this must stay high enough to be unguessable.
    #[serde(default = "default_token_bytes")]
    pub token_bytes: usize,
    /// Base URL prefixed to share tokens when building public link URLs,
    /// e.g. `https://app.coursehub.io/shared`.
    #[serde(default = "default_link_base_url")]
    pub link_base_url: String,
    /// Default invite validity in days when the caller does not specify one.
    #[serde(default = "default_invite_expiry_days")]
    pub default_invite_expiry_days: i64,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            token_bytes: default_token_bytes(),
            link_base_url: default_link_base_url(),
            default_invite_expiry_days: default_invite_expiry_days(),
        }
    }
}

fn default_token_bytes() -> usize {
    32
}

fn default_link_base_url() -> String {
    "http://localhost:8080/shared".to_string()
}

fn default_invite_expiry_days() -> i64 {
    7
}
