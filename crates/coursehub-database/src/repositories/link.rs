//! Share link repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use coursehub_core::error::{AppError, ErrorKind};
use coursehub_core::result::AppResult;
use coursehub_core::types::pagination::{PageRequest, PageResponse};
use coursehub_entity::link::model::{CreateLink, ShareLink};
use coursehub_entity::permission::model::ResourceType;

/// Repository for share link rows, including the atomic
/// increment-with-ceiling-check redemption path.
#[derive(Debug, Clone)]
pub struct LinkRepository {
    pool: PgPool,
}

impl LinkRepository {
    /// Create a new link repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new share link inside the caller's transaction.
    pub async fn insert_tx(
        &self,
        conn: &mut PgConnection,
        data: &CreateLink,
    ) -> AppResult<ShareLink> {
        sqlx::query_as::<_, ShareLink>(
            "INSERT INTO share_links \
             (resource_type, resource_id, created_by, token, permissions, max_access_count, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(data.resource_type)
        .bind(&data.resource_id)
        .bind(data.created_by)
        .bind(&data.token)
        .bind(&data.permissions)
        .bind(data.max_access_count)
        .bind(data.expires_at)
        .fetch_one(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create link", e))
    }

    /// Find a link by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ShareLink>> {
        sqlx::query_as::<_, ShareLink>("SELECT * FROM share_links WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find link", e))
    }

    /// Transaction-scoped token lookup, used to classify a failed
    /// redemption.
    pub async fn find_by_token_tx(
        &self,
        conn: &mut PgConnection,
        token: &str,
    ) -> AppResult<Option<ShareLink>> {
        sqlx::query_as::<_, ShareLink>("SELECT * FROM share_links WHERE token = $1")
            .bind(token)
            .fetch_optional(conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find link by token", e)
            })
    }

    /// Atomically consume one redemption of a usable link.
    ///
    /// The usability predicate (active, unexpired, below ceiling) and the
    /// counter increment are a single conditional `UPDATE`, so concurrent
    /// redemptions of the same token serialize on the row and a ceiling of
    /// N admits exactly N successes. Never implemented as read-then-write
    /// in application code. A `None` return means the link was missing or
    /// unusable; the caller classifies by re-reading the row.
    pub async fn try_redeem_tx(
        &self,
        conn: &mut PgConnection,
        token: &str,
    ) -> AppResult<Option<ShareLink>> {
        sqlx::query_as::<_, ShareLink>(
            "UPDATE share_links SET access_count = access_count + 1 \
             WHERE token = $1 AND is_active = TRUE \
               AND (expires_at IS NULL OR expires_at > NOW()) \
               AND (max_access_count IS NULL OR access_count < max_access_count) \
             RETURNING *",
        )
        .bind(token)
        .fetch_optional(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to redeem link", e))
    }

    /// Deactivate a link. Irreversible. Returns whether a row was flipped.
    pub async fn deactivate(&self, link_id: Uuid) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE share_links SET is_active = FALSE WHERE id = $1 AND is_active = TRUE")
                .bind(link_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to deactivate link", e)
                })?;
        Ok(result.rows_affected() > 0)
    }

    /// List links on a resource, newest first.
    pub async fn find_by_resource(
        &self,
        resource_type: ResourceType,
        resource_id: &str,
    ) -> AppResult<Vec<ShareLink>> {
        sqlx::query_as::<_, ShareLink>(
            "SELECT * FROM share_links WHERE resource_type = $1 AND resource_id = $2 \
             ORDER BY created_at DESC",
        )
        .bind(resource_type)
        .bind(resource_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list links", e))
    }

    /// List links created by a user, newest first.
    pub async fn find_by_creator(
        &self,
        created_by: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareLink>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM share_links WHERE created_by = $1")
                .bind(created_by)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count links", e)
                })?;

        let links = sqlx::query_as::<_, ShareLink>(
            "SELECT * FROM share_links WHERE created_by = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(created_by)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list links", e))?;

        Ok(PageResponse::new(
            links,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
