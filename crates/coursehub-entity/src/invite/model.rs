//! Share invitation entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::permission::model::ResourceType;
use crate::permission::set::Permission;

/// Lifecycle status of a share invitation.
///
/// Transitions are one-way: `pending` moves to exactly one of `accepted`,
/// `declined`, or `expired` and never leaves that state. Expiry is derived
/// from `expires_at` at read time; the row is only rewritten to `expired`
/// when an accept or decline attempt forces the reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invite_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    /// Awaiting the invitee's response.
    Pending,
    /// Accepted; a permission grant was materialized.
    Accepted,
    /// Declined by the invitee.
    Declined,
    /// Lapsed past `expires_at` without a response.
    Expired,
}

impl InviteStatus {
    /// Whether the status admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Expired => "expired",
        };
        write!(f, "{s}")
    }
}

/// An email-based invitation to share a resource.
///
/// The token, not the invitee's identity, authenticates accept and decline,
/// so an invitation works for a recipient who has no account yet. The email
/// is their implicit identity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShareInvite {
    /// Unique invite identifier.
    pub id: Uuid,
    /// Type of resource being shared.
    pub resource_type: ResourceType,
    /// ID of the shared resource.
    pub resource_id: String,
    /// User who sent the invitation.
    pub inviter_user_id: Uuid,
    /// Email address of the invitee (lowercased).
    pub invitee_email: String,
    /// Permission flags the invitee will receive on acceptance.
    pub permissions: Vec<Permission>,
    /// Opaque, unguessable token authenticating invite actions.
    pub token: String,
    /// Persisted lifecycle status.
    pub status: InviteStatus,
    /// When the invitation lapses.
    pub expires_at: DateTime<Utc>,
    /// When the invitation was created.
    pub created_at: DateTime<Utc>,
}

impl ShareInvite {
    /// Whether the invite is pending but past its expiry time.
    pub fn is_lapsed(&self, now: DateTime<Utc>) -> bool {
        self.status == InviteStatus::Pending && self.expires_at <= now
    }

    /// The status as observed at `now`, applying lazy expiry.
    ///
    /// Every read path that branches on status must go through this rather
    /// than the raw `status` column, so a lazily-expired row is never
    /// treated as still pending.
    pub fn effective_status(&self, now: DateTime<Utc>) -> InviteStatus {
        if self.is_lapsed(now) {
            InviteStatus::Expired
        } else {
            self.status
        }
    }
}

/// Data required to persist a new invitation.
#[derive(Debug, Clone)]
pub struct CreateInvite {
    /// Type of resource.
    pub resource_type: ResourceType,
    /// ID of the resource.
    pub resource_id: String,
    /// User sending the invitation.
    pub inviter_user_id: Uuid,
    /// Invitee email (lowercased).
    pub invitee_email: String,
    /// Permission flags to grant on acceptance.
    pub permissions: Vec<Permission>,
    /// Generated token.
    pub token: String,
    /// Expiry time.
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn invite(status: InviteStatus, expires_in: Duration) -> ShareInvite {
        ShareInvite {
            id: Uuid::new_v4(),
            resource_type: ResourceType::Course,
            resource_id: "course-101".to_string(),
            inviter_user_id: Uuid::new_v4(),
            invitee_email: "bob@x.com".to_string(),
            permissions: vec![Permission::View],
            token: "tok".to_string(),
            status,
            expires_at: Utc::now() + expires_in,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_pending_within_expiry_stays_pending() {
        let inv = invite(InviteStatus::Pending, Duration::days(1));
        assert_eq!(inv.effective_status(Utc::now()), InviteStatus::Pending);
    }

    #[test]
    fn test_pending_past_expiry_reads_expired() {
        let inv = invite(InviteStatus::Pending, Duration::days(-1));
        assert_eq!(inv.effective_status(Utc::now()), InviteStatus::Expired);
        assert!(inv.is_lapsed(Utc::now()));
    }

    #[test]
    fn test_accepted_never_lapses() {
        let inv = invite(InviteStatus::Accepted, Duration::days(-10));
        assert_eq!(inv.effective_status(Utc::now()), InviteStatus::Accepted);
        assert!(!inv.is_lapsed(Utc::now()));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!InviteStatus::Pending.is_terminal());
        assert!(InviteStatus::Accepted.is_terminal());
        assert!(InviteStatus::Declined.is_terminal());
        assert!(InviteStatus::Expired.is_terminal());
    }
}
