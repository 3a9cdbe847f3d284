//! Resource registry row.
//!
//! Ownership of resources lives outside this subsystem; the wider platform
//! maintains a registry row per shareable resource, and the sharing core
//! reads it for existence and ownership checks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::permission::model::ResourceType;

/// A shareable resource known to the platform.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Resource {
    /// Type of the resource.
    pub resource_type: ResourceType,
    /// Platform-assigned resource ID (opaque to this core).
    pub id: String,
    /// The resource's single owner.
    pub owner_id: Uuid,
    /// When the registry row was created.
    pub created_at: DateTime<Utc>,
}
