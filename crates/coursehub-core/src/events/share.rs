//! Share-related domain events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to sharing operations, recorded on the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShareEvent {
    /// An invitation was created.
    InviteCreated {
        /// The invite ID.
        invite_id: Uuid,
        /// The resource type being shared.
        resource_type: String,
        /// The resource ID.
        resource_id: String,
        /// The invitee's email address.
        invitee_email: String,
    },
    /// An invitation was accepted.
    InviteAccepted {
        /// The invite ID.
        invite_id: Uuid,
        /// The grant materialized by the acceptance.
        grant_id: Uuid,
    },
    /// An invitation was declined.
    InviteDeclined {
        /// The invite ID.
        invite_id: Uuid,
    },
    /// A share link was created.
    LinkCreated {
        /// The link ID.
        link_id: Uuid,
        /// The resource type being shared.
        resource_type: String,
        /// The resource ID.
        resource_id: String,
    },
    /// A share link was redeemed.
    LinkRedeemed {
        /// The link ID.
        link_id: Uuid,
        /// Access count after this redemption.
        access_count: i32,
        /// Maximum accesses allowed (if set).
        max_access_count: Option<i32>,
    },
    /// A share link was revoked.
    LinkRevoked {
        /// The link ID.
        link_id: Uuid,
    },
    /// A permission grant was removed.
    GrantRevoked {
        /// The grant ID.
        grant_id: Uuid,
        /// The identity that lost access.
        grantee_identity: String,
    },
}

impl ShareEvent {
    /// Record the event under the `audit` log target as a JSON payload.
    pub fn emit(&self) {
        match serde_json::to_string(self) {
            Ok(payload) => tracing::info!(target: "audit", event = %payload, "share event"),
            Err(e) => {
                tracing::warn!(target: "audit", error = %e, "failed to serialize share event")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_payload_is_tagged() {
        let event = ShareEvent::LinkRevoked {
            link_id: Uuid::nil(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "LinkRevoked");
        assert_eq!(json["link_id"], Uuid::nil().to_string());
    }
}
