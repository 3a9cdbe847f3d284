//! Share invitation repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use coursehub_core::error::{AppError, ErrorKind};
use coursehub_core::result::AppResult;
use coursehub_core::types::pagination::{PageRequest, PageResponse};
use coursehub_entity::invite::model::{CreateInvite, InviteStatus, ShareInvite};

/// Repository for invitation rows, including the compare-and-swap status
/// transitions that keep accept/decline linearizable per token.
#[derive(Debug, Clone)]
pub struct InviteRepository {
    pool: PgPool,
}

impl InviteRepository {
    /// Create a new invite repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new invitation inside the caller's transaction.
    pub async fn insert_tx(
        &self,
        conn: &mut PgConnection,
        data: &CreateInvite,
    ) -> AppResult<ShareInvite> {
        sqlx::query_as::<_, ShareInvite>(
            "INSERT INTO share_invites \
             (resource_type, resource_id, inviter_user_id, invitee_email, permissions, token, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(data.resource_type)
        .bind(&data.resource_id)
        .bind(data.inviter_user_id)
        .bind(&data.invitee_email)
        .bind(&data.permissions)
        .bind(&data.token)
        .bind(data.expires_at)
        .fetch_one(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create invite", e))
    }

    /// Find an invitation by token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareInvite>> {
        sqlx::query_as::<_, ShareInvite>("SELECT * FROM share_invites WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find invite by token", e)
            })
    }

    /// Transaction-scoped variant of [`Self::find_by_token`], used to
    /// classify a failed transition.
    pub async fn find_by_token_tx(
        &self,
        conn: &mut PgConnection,
        token: &str,
    ) -> AppResult<Option<ShareInvite>> {
        sqlx::query_as::<_, ShareInvite>("SELECT * FROM share_invites WHERE token = $1")
            .bind(token)
            .fetch_optional(conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find invite by token", e)
            })
    }

    /// Atomically transition a pending, unexpired invitation to a terminal
    /// status.
    ///
    /// This is the linearization point for accept/decline: the status and
    /// expiry predicates live in the `UPDATE` itself, so of two concurrent
    /// calls on the same token exactly one observes a row. A `None` return
    /// means the invite was missing, already resolved, or lapsed; the
    /// caller classifies by re-reading the row in the same transaction.
    pub async fn try_transition_tx(
        &self,
        conn: &mut PgConnection,
        token: &str,
        to: InviteStatus,
    ) -> AppResult<Option<ShareInvite>> {
        sqlx::query_as::<_, ShareInvite>(
            "UPDATE share_invites SET status = $2 \
             WHERE token = $1 AND status = 'pending' AND expires_at > NOW() \
             RETURNING *",
        )
        .bind(token)
        .bind(to)
        .fetch_optional(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to transition invite", e))
    }

    /// Persist the lazy pending→expired reconciliation for a lapsed row.
    pub async fn mark_expired_tx(&self, conn: &mut PgConnection, invite_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE share_invites SET status = 'expired' WHERE id = $1 AND status = 'pending'")
            .bind(invite_id)
            .execute(conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to mark invite expired", e)
            })?;
        Ok(())
    }

    /// List invitations sent by a user, newest first.
    pub async fn find_by_inviter(
        &self,
        inviter_user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareInvite>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM share_invites WHERE inviter_user_id = $1")
                .bind(inviter_user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count invites", e)
                })?;

        let invites = sqlx::query_as::<_, ShareInvite>(
            "SELECT * FROM share_invites WHERE inviter_user_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(inviter_user_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list sent invites", e))?;

        Ok(PageResponse::new(
            invites,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List invitations addressed to an email, newest first.
    pub async fn find_by_invitee(
        &self,
        invitee_email: &str,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareInvite>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM share_invites WHERE invitee_email = $1")
                .bind(invitee_email)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count invites", e)
                })?;

        let invites = sqlx::query_as::<_, ShareInvite>(
            "SELECT * FROM share_invites WHERE invitee_email = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(invitee_email)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list received invites", e)
        })?;

        Ok(PageResponse::new(
            invites,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
