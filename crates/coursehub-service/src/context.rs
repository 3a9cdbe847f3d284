//! Request context carrying the authenticated identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context for the current authenticated request.
///
/// The upstream gateway authenticates callers and forwards their user ID
/// and email; this core trusts that identity. Extracted at the HTTP layer
/// and passed into service methods so that every operation knows *who* is
/// acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The user's email address (lowercased).
    pub email: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context. The email is normalized to lowercase.
    pub fn new(user_id: Uuid, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into().to_lowercase(),
            request_time: Utc::now(),
        }
    }

    /// The canonical identity string used when materializing grants for
    /// this user.
    pub fn grant_identity(&self) -> String {
        self.user_id.to_string()
    }

    /// Every identity string this user can hold grants under.
    ///
    /// Grants materialized from accepted invitations are keyed by email,
    /// while link redemptions key by user ID, so evaluation must match
    /// both forms.
    pub fn identities(&self) -> Vec<String> {
        vec![self.user_id.to_string(), self.email.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_normalized_to_lowercase() {
        let ctx = RequestContext::new(Uuid::new_v4(), "Bob@X.Com");
        assert_eq!(ctx.email, "bob@x.com");
    }

    #[test]
    fn test_identities_cover_id_and_email() {
        let user_id = Uuid::new_v4();
        let ctx = RequestContext::new(user_id, "bob@x.com");
        let identities = ctx.identities();
        assert!(identities.contains(&user_id.to_string()));
        assert!(identities.contains(&"bob@x.com".to_string()));
    }
}
