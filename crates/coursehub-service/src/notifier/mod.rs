//! Invitation notification dispatch.
//!
//! Delivery is the platform mail service's job; this core only hands it a
//! payload. Dispatch is fire-and-forget: failures are logged and never
//! propagate into the invite operation that triggered them.

pub mod webhook;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use coursehub_core::result::AppResult;

pub use webhook::WebhookNotifier;

/// Payload handed to the mail-dispatch collaborator when an invitation is
/// created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteNotification {
    /// The invite ID.
    pub invite_id: Uuid,
    /// Recipient email address.
    pub invitee_email: String,
    /// The user who sent the invitation.
    pub inviter_user_id: Uuid,
    /// Resource type as its wire string.
    pub resource_type: String,
    /// Resource ID.
    pub resource_id: String,
    /// URL the recipient follows to accept.
    pub accept_url: String,
    /// When the invitation lapses.
    pub expires_at: DateTime<Utc>,
}

/// Delivers invitation notifications to the external mail dispatcher.
#[async_trait]
pub trait InviteNotifier: Send + Sync {
    /// Hand a notification to the dispatcher.
    async fn notify(&self, notification: InviteNotification) -> AppResult<()>;
}

/// Notifier used when dispatch is disabled; records the notification in
/// the log and does nothing else.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl InviteNotifier for LogNotifier {
    async fn notify(&self, notification: InviteNotification) -> AppResult<()> {
        info!(
            invite_id = %notification.invite_id,
            invitee_email = %notification.invitee_email,
            "Notification dispatch disabled; invite email not sent"
        );
        Ok(())
    }
}
