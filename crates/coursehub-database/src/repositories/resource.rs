//! Resource registry repository implementation.

use sqlx::{PgConnection, PgPool};

use coursehub_core::error::{AppError, ErrorKind};
use coursehub_core::result::AppResult;
use coursehub_entity::permission::model::ResourceType;
use coursehub_entity::resource::Resource;

/// Read-only repository over the platform's resource registry.
#[derive(Debug, Clone)]
pub struct ResourceRepository {
    pool: PgPool,
}

impl ResourceRepository {
    /// Create a new resource repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a registry row.
    pub async fn find(
        &self,
        resource_type: ResourceType,
        resource_id: &str,
    ) -> AppResult<Option<Resource>> {
        sqlx::query_as::<_, Resource>(
            "SELECT * FROM resources WHERE resource_type = $1 AND id = $2",
        )
        .bind(resource_type)
        .bind(resource_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find resource", e))
    }

    /// Transaction-scoped variant of [`Self::find`].
    ///
    /// Takes a share lock on the registry row so ownership cannot change
    /// under a check-then-write sequence.
    pub async fn find_tx(
        &self,
        conn: &mut PgConnection,
        resource_type: ResourceType,
        resource_id: &str,
    ) -> AppResult<Option<Resource>> {
        sqlx::query_as::<_, Resource>(
            "SELECT * FROM resources WHERE resource_type = $1 AND id = $2 FOR SHARE",
        )
        .bind(resource_type)
        .bind(resource_id)
        .fetch_optional(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find resource", e))
    }
}
