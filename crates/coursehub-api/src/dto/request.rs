//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create invitation request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateInviteRequest {
    /// Resource type being shared.
    pub resource_type: String,
    /// Resource ID being shared.
    #[validate(length(min = 1, message = "resource_id is required"))]
    pub resource_id: String,
    /// Recipient email address.
    #[validate(email(message = "invitee_email must be a valid email address"))]
    pub invitee_email: String,
    /// Permissions granted on acceptance, from {view, edit, share, delete}.
    #[validate(length(min = 1, message = "permissions must not be empty"))]
    pub permissions: Vec<String>,
    /// Validity in days (omit to use the configured default).
    #[validate(range(min = 1, max = 365, message = "expires_in_days must be in [1, 365]"))]
    pub expires_in_days: Option<i64>,
}

/// Create share link request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Resource type being shared.
    pub resource_type: String,
    /// Resource ID being shared.
    #[validate(length(min = 1, message = "resource_id is required"))]
    pub resource_id: String,
    /// Permissions granted on redemption.
    #[validate(length(min = 1, message = "permissions must not be empty"))]
    pub permissions: Vec<String>,
    /// Validity in days (omit for no expiry).
    #[validate(range(min = 1, max = 365, message = "expires_in_days must be in [1, 365]"))]
    pub expires_in_days: Option<i64>,
    /// Redemption ceiling (omit for unlimited).
    #[validate(range(min = 1, message = "max_access_count must be at least 1"))]
    pub max_access_count: Option<i32>,
}
