//! Permission grant repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use coursehub_core::error::{AppError, ErrorKind};
use coursehub_core::result::AppResult;
use coursehub_entity::permission::model::{PermissionGrant, ResourceType};
use coursehub_entity::permission::set::Permission;

/// Repository for permission grant rows.
///
/// Methods suffixed `_tx` run on a caller-supplied connection so that a
/// permission check and its dependent write share one transaction.
#[derive(Debug, Clone)]
pub struct GrantRepository {
    pool: PgPool,
}

impl GrantRepository {
    /// Create a new grant repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a grant by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PermissionGrant>> {
        sqlx::query_as::<_, PermissionGrant>("SELECT * FROM permission_grants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find grant", e))
    }

    /// Find the grants matching any of the given identities on a resource.
    pub async fn find_for_identities(
        &self,
        resource_type: ResourceType,
        resource_id: &str,
        identities: &[String],
    ) -> AppResult<Vec<PermissionGrant>> {
        sqlx::query_as::<_, PermissionGrant>(
            "SELECT * FROM permission_grants \
             WHERE resource_type = $1 AND resource_id = $2 AND grantee_identity = ANY($3)",
        )
        .bind(resource_type)
        .bind(resource_id)
        .bind(identities)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find grants", e))
    }

    /// Transaction-scoped variant of [`Self::find_for_identities`].
    ///
    /// Takes a share lock on the matched rows so a concurrent revocation
    /// cannot slip between the permission check and the dependent write.
    pub async fn find_for_identities_tx(
        &self,
        conn: &mut PgConnection,
        resource_type: ResourceType,
        resource_id: &str,
        identities: &[String],
    ) -> AppResult<Vec<PermissionGrant>> {
        sqlx::query_as::<_, PermissionGrant>(
            "SELECT * FROM permission_grants \
             WHERE resource_type = $1 AND resource_id = $2 AND grantee_identity = ANY($3) \
             FOR SHARE",
        )
        .bind(resource_type)
        .bind(resource_id)
        .bind(identities)
        .fetch_all(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find grants", e))
    }

    /// List all grants on a resource (the collaborator view).
    pub async fn find_by_resource(
        &self,
        resource_type: ResourceType,
        resource_id: &str,
    ) -> AppResult<Vec<PermissionGrant>> {
        sqlx::query_as::<_, PermissionGrant>(
            "SELECT * FROM permission_grants \
             WHERE resource_type = $1 AND resource_id = $2 ORDER BY granted_at ASC",
        )
        .bind(resource_type)
        .bind(resource_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list grants", e))
    }

    /// Insert or replace the grant for an identity on a resource.
    ///
    /// The unique index on `(resource_type, resource_id, grantee_identity)`
    /// guarantees at most one active row; a later grant overwrites the
    /// permission array rather than merging with it.
    pub async fn upsert_tx(
        &self,
        conn: &mut PgConnection,
        resource_type: ResourceType,
        resource_id: &str,
        grantee_identity: &str,
        permissions: &[Permission],
        granted_by: Uuid,
    ) -> AppResult<PermissionGrant> {
        sqlx::query_as::<_, PermissionGrant>(
            "INSERT INTO permission_grants \
             (resource_type, resource_id, grantee_identity, permissions, granted_by) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (resource_type, resource_id, grantee_identity) \
             DO UPDATE SET permissions = EXCLUDED.permissions, \
                           granted_by = EXCLUDED.granted_by, \
                           granted_at = NOW() \
             RETURNING *",
        )
        .bind(resource_type)
        .bind(resource_id)
        .bind(grantee_identity)
        .bind(permissions)
        .bind(granted_by)
        .fetch_one(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert grant", e))
    }

    /// Delete a grant outright. Returns whether a row was removed.
    pub async fn delete(&self, grant_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM permission_grants WHERE id = $1")
            .bind(grant_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete grant", e))?;
        Ok(result.rows_affected() > 0)
    }
}
