//! Invitation notification dispatch configuration.

use serde::{Deserialize, Serialize};

/// Settings for the external mail-dispatch collaborator.
///
/// Dispatch is fire-and-forget: a delivery failure is logged and never
/// fails the invite operation that triggered it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Whether outbound dispatch is enabled. When disabled, notifications
    /// are logged instead of delivered.
    #[serde(default)]
    pub enabled: bool,
    /// Endpoint of the platform mail-dispatch service.
    #[serde(default)]
    pub endpoint: String,
    /// Request timeout in seconds for dispatch calls.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    5
}
