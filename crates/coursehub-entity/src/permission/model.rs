//! Permission grant entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::set::{Permission, PermissionSet};

/// Resource type for shareable resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resource_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// A market data set.
    MarketData,
    /// An uploaded CSV document.
    Csv,
    /// A course.
    Course,
    /// A generated report.
    Report,
    /// User-authored content.
    UserContent,
}

impl ResourceType {
    /// Return the type as its snake_case wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MarketData => "market_data",
            Self::Csv => "csv",
            Self::Course => "course",
            Self::Report => "report",
            Self::UserContent => "user_content",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ResourceType {
    type Err = coursehub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "market_data" => Ok(Self::MarketData),
            "csv" => Ok(Self::Csv),
            "course" => Ok(Self::Course),
            "report" => Ok(Self::Report),
            "user_content" => Ok(Self::UserContent),
            _ => Err(coursehub_core::AppError::validation(format!(
                "Invalid resource type: '{s}'"
            ))),
        }
    }
}

/// An active permission grant for an identity on a resource.
///
/// This is the *effective* record consulted by access decisions. At most one
/// active row exists per `(resource_type, resource_id, grantee_identity)`;
/// an upsert replaces the permission array rather than appending a
/// duplicate row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PermissionGrant {
    /// Unique grant identifier.
    pub id: Uuid,
    /// Type of resource this grant applies to.
    pub resource_type: ResourceType,
    /// ID of the resource.
    pub resource_id: String,
    /// The identity holding the grant: a user UUID rendered as a string,
    /// or a lowercased email address for recipients without an account.
    pub grantee_identity: String,
    /// The granted permission flags.
    pub permissions: Vec<Permission>,
    /// User who issued the grant.
    pub granted_by: Uuid,
    /// When the grant was issued or last replaced.
    pub granted_at: DateTime<Utc>,
}

impl PermissionGrant {
    /// The grant's permissions as a set.
    pub fn permission_set(&self) -> PermissionSet {
        PermissionSet::from_stored(&self.permissions)
    }
}
