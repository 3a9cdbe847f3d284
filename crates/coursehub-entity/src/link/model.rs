//! Tokenized public share link entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::permission::model::ResourceType;
use crate::permission::set::Permission;

/// A tokenized public link granting access to a resource on redemption.
///
/// `usable` is a derived predicate, never a stored state: it is recomputed
/// on every redemption attempt from `is_active`, `expires_at`,
/// `access_count`, and `max_access_count`. Revocation flips `is_active` to
/// false and is irreversible.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShareLink {
    /// Unique link identifier.
    pub id: Uuid,
    /// Type of resource being shared.
    pub resource_type: ResourceType,
    /// ID of the shared resource.
    pub resource_id: String,
    /// User who created the link.
    pub created_by: Uuid,
    /// Opaque, unguessable, URL-safe token.
    pub token: String,
    /// Permission flags granted on redemption.
    pub permissions: Vec<Permission>,
    /// Number of successful redemptions so far. Counts redemption events,
    /// not unique redeemers.
    pub access_count: i32,
    /// Optional ceiling on redemptions (None = unlimited).
    pub max_access_count: Option<i32>,
    /// Optional expiry (None = usable until exhausted or revoked).
    pub expires_at: Option<DateTime<Utc>>,
    /// Whether the link has not been revoked.
    pub is_active: bool,
    /// When the link was created.
    pub created_at: DateTime<Utc>,
}

impl ShareLink {
    /// Whether the link is past its expiry time.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|exp| exp <= now).unwrap_or(false)
    }

    /// Whether the link has reached its access-count ceiling.
    pub fn is_exhausted(&self) -> bool {
        self.max_access_count
            .map(|max| self.access_count >= max)
            .unwrap_or(false)
    }

    /// Whether a redemption attempt at `now` would succeed.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired(now) && !self.is_exhausted()
    }
}

/// Data required to persist a new share link.
#[derive(Debug, Clone)]
pub struct CreateLink {
    /// Type of resource.
    pub resource_type: ResourceType,
    /// ID of the resource.
    pub resource_id: String,
    /// User creating the link.
    pub created_by: Uuid,
    /// Generated token.
    pub token: String,
    /// Permission flags to grant on redemption.
    pub permissions: Vec<Permission>,
    /// Redemption ceiling (None = unlimited).
    pub max_access_count: Option<i32>,
    /// Expiry time (None = never).
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn link() -> ShareLink {
        ShareLink {
            id: Uuid::new_v4(),
            resource_type: ResourceType::Csv,
            resource_id: "abc123".to_string(),
            created_by: Uuid::new_v4(),
            token: "tok".to_string(),
            permissions: vec![Permission::View],
            access_count: 0,
            max_access_count: None,
            expires_at: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_fresh_link_is_usable() {
        assert!(link().is_usable(Utc::now()));
    }

    #[test]
    fn test_no_ceiling_means_unlimited_use() {
        let mut l = link();
        l.access_count = 1_000_000;
        assert!(!l.is_exhausted());
        assert!(l.is_usable(Utc::now()));
    }

    #[test]
    fn test_ceiling_reached_is_exhausted() {
        let mut l = link();
        l.max_access_count = Some(3);
        l.access_count = 3;
        assert!(l.is_exhausted());
        assert!(!l.is_usable(Utc::now()));
    }

    #[test]
    fn test_expired_link_not_usable() {
        let mut l = link();
        l.expires_at = Some(Utc::now() - Duration::hours(1));
        assert!(l.is_expired(Utc::now()));
        assert!(!l.is_usable(Utc::now()));
    }

    #[test]
    fn test_revoked_link_not_usable_despite_remaining_quota() {
        let mut l = link();
        l.max_access_count = Some(10);
        l.access_count = 1;
        l.is_active = false;
        assert!(!l.is_usable(Utc::now()));
    }

    #[test]
    fn test_no_expiry_means_indefinitely_usable() {
        let l = link();
        assert!(!l.is_expired(Utc::now() + Duration::days(10_000)));
    }
}
