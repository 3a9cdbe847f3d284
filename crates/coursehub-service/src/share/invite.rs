//! Invitation lifecycle service.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use coursehub_core::config::share::ShareConfig;
use coursehub_core::error::{AppError, ErrorKind};
use coursehub_core::events::ShareEvent;
use coursehub_core::result::AppResult;
use coursehub_core::types::pagination::{PageRequest, PageResponse};
use coursehub_database::repositories::grant::GrantRepository;
use coursehub_database::repositories::invite::InviteRepository;
use coursehub_entity::invite::model::{CreateInvite, InviteStatus, ShareInvite};
use coursehub_entity::permission::model::{PermissionGrant, ResourceType};
use coursehub_entity::permission::set::PermissionSet;

use crate::context::RequestContext;
use crate::notifier::{InviteNotification, InviteNotifier};
use crate::token::TokenGenerator;

use super::authority::ShareAuthorizer;

/// Minimum invite validity in days.
const MIN_EXPIRY_DAYS: i64 = 1;
/// Maximum invite validity in days.
const MAX_EXPIRY_DAYS: i64 = 365;

/// Input for creating a new invitation.
#[derive(Debug, Clone)]
pub struct CreateInviteInput {
    /// Resource type being shared.
    pub resource_type: ResourceType,
    /// Resource ID being shared.
    pub resource_id: String,
    /// Recipient email address.
    pub invitee_email: String,
    /// Permissions granted on acceptance.
    pub permissions: PermissionSet,
    /// Validity in days, within `[1, 365]`. `None` uses the configured
    /// default.
    pub expires_in_days: Option<i64>,
}

/// Result of a successful (or idempotently repeated) acceptance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptedInvite {
    /// The invitation, now in `accepted` status.
    pub invite: ShareInvite,
    /// The grant materialized for the invitee.
    pub grant: PermissionGrant,
}

/// Manages the invitation lifecycle: creation, accept/decline, and the
/// sent/received projections.
#[derive(Clone)]
pub struct InviteService {
    pool: PgPool,
    invite_repo: Arc<InviteRepository>,
    grant_repo: Arc<GrantRepository>,
    authorizer: Arc<ShareAuthorizer>,
    token_generator: Arc<TokenGenerator>,
    notifier: Arc<dyn InviteNotifier>,
    share_config: ShareConfig,
}

impl InviteService {
    /// Creates a new invite service.
    pub fn new(
        pool: PgPool,
        invite_repo: Arc<InviteRepository>,
        grant_repo: Arc<GrantRepository>,
        authorizer: Arc<ShareAuthorizer>,
        token_generator: Arc<TokenGenerator>,
        notifier: Arc<dyn InviteNotifier>,
        share_config: ShareConfig,
    ) -> Self {
        Self {
            pool,
            invite_repo,
            grant_repo,
            authorizer,
            token_generator,
            notifier,
            share_config,
        }
    }

    /// Creates an invitation and hands it to the mail dispatcher.
    ///
    /// The authority check and the insert share one transaction so a
    /// concurrent revocation of the inviter's `share` grant cannot slip
    /// between them. Dispatch happens after commit and is fire-and-forget.
    pub async fn create_invite(
        &self,
        ctx: &RequestContext,
        input: CreateInviteInput,
    ) -> AppResult<ShareInvite> {
        let expires_in_days = input
            .expires_in_days
            .unwrap_or(self.share_config.default_invite_expiry_days);
        if !(MIN_EXPIRY_DAYS..=MAX_EXPIRY_DAYS).contains(&expires_in_days) {
            return Err(AppError::validation(format!(
                "expires_in_days must be between {MIN_EXPIRY_DAYS} and {MAX_EXPIRY_DAYS}"
            )));
        }

        let invitee_email = input.invitee_email.to_lowercase();
        let token = self.token_generator.generate();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        self.authorizer
            .ensure_can_issue_tx(&mut tx, ctx, input.resource_type, &input.resource_id)
            .await?;

        let invite = self
            .invite_repo
            .insert_tx(
                &mut tx,
                &CreateInvite {
                    resource_type: input.resource_type,
                    resource_id: input.resource_id,
                    inviter_user_id: ctx.user_id,
                    invitee_email,
                    permissions: input.permissions.to_vec(),
                    token,
                    expires_at: Utc::now() + Duration::days(expires_in_days),
                },
            )
            .await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        info!(
            inviter = %ctx.user_id,
            invite_id = %invite.id,
            resource_type = %invite.resource_type,
            resource_id = %invite.resource_id,
            "Invite created"
        );
        ShareEvent::InviteCreated {
            invite_id: invite.id,
            resource_type: invite.resource_type.as_str().to_string(),
            resource_id: invite.resource_id.clone(),
            invitee_email: invite.invitee_email.clone(),
        }
        .emit();

        self.dispatch_notification(&invite);

        Ok(invite)
    }

    /// Accepts an invitation by token, materializing the permission grant.
    ///
    /// Idempotent for an already-accepted token: the existing grant is
    /// returned and no second grant row is created. A lapsed pending row
    /// has its expiry persisted as a side effect of the attempt.
    pub async fn accept_invite(&self, token: &str) -> AppResult<AcceptedInvite> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        if let Some(invite) = self
            .invite_repo
            .try_transition_tx(&mut tx, token, InviteStatus::Accepted)
            .await?
        {
            let grant = self
                .grant_repo
                .upsert_tx(
                    &mut tx,
                    invite.resource_type,
                    &invite.resource_id,
                    &invite.invitee_email,
                    &invite.permissions,
                    invite.inviter_user_id,
                )
                .await?;

            tx.commit().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
            })?;

            info!(invite_id = %invite.id, grant_id = %grant.id, "Invite accepted");
            ShareEvent::InviteAccepted {
                invite_id: invite.id,
                grant_id: grant.id,
            }
            .emit();

            return Ok(AcceptedInvite { invite, grant });
        }

        // The conditional update matched nothing: the invite is missing,
        // already resolved, or lapsed. Classify within the same transaction.
        let invite = self
            .invite_repo
            .find_by_token_tx(&mut tx, token)
            .await?
            .ok_or_else(|| AppError::not_found("Invite not found"))?;

        match invite.effective_status(Utc::now()) {
            InviteStatus::Expired => {
                self.expire_and_fail(tx, &invite).await
            }
            InviteStatus::Accepted => {
                // Repeat acceptance: return the grant materialized the
                // first time around.
                let existing = self
                    .grant_repo
                    .find_for_identities_tx(
                        &mut tx,
                        invite.resource_type,
                        &invite.resource_id,
                        &[invite.invitee_email.clone()],
                    )
                    .await?
                    .into_iter()
                    .next();

                tx.commit().await.map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
                })?;

                match existing {
                    Some(grant) => Ok(AcceptedInvite { invite, grant }),
                    // The grant was revoked after acceptance; accepting
                    // again must not resurrect it.
                    None => Err(AppError::conflict(
                        "Invite already accepted and its grant has since been revoked",
                    )),
                }
            }
            InviteStatus::Declined => Err(AppError::conflict("Invite has already been declined")),
            InviteStatus::Pending => Err(AppError::conflict(
                "Invite was resolved by a concurrent request",
            )),
        }
    }

    /// Declines an invitation by token. Leaves grants untouched.
    pub async fn decline_invite(&self, token: &str) -> AppResult<ShareInvite> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        if let Some(invite) = self
            .invite_repo
            .try_transition_tx(&mut tx, token, InviteStatus::Declined)
            .await?
        {
            tx.commit().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
            })?;

            info!(invite_id = %invite.id, "Invite declined");
            ShareEvent::InviteDeclined {
                invite_id: invite.id,
            }
            .emit();
            return Ok(invite);
        }

        let invite = self
            .invite_repo
            .find_by_token_tx(&mut tx, token)
            .await?
            .ok_or_else(|| AppError::not_found("Invite not found"))?;

        match invite.effective_status(Utc::now()) {
            // Expiry blocks decline the same way it blocks accept.
            InviteStatus::Expired => self.expire_and_fail(tx, &invite).await,
            InviteStatus::Accepted => Err(AppError::conflict("Invite has already been accepted")),
            InviteStatus::Declined => Err(AppError::conflict("Invite has already been declined")),
            InviteStatus::Pending => Err(AppError::conflict(
                "Invite was resolved by a concurrent request",
            )),
        }
    }

    /// Lists invitations sent by the current user.
    ///
    /// Lapsed pending rows are reported with effective status `expired`
    /// without rewriting them.
    pub async fn list_sent_invites(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> AppResult<PageResponse<ShareInvite>> {
        let mut result = self.invite_repo.find_by_inviter(ctx.user_id, &page).await?;
        apply_lazy_expiry(&mut result.items);
        Ok(result)
    }

    /// Lists invitations addressed to the current user's email.
    pub async fn list_received_invites(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> AppResult<PageResponse<ShareInvite>> {
        let mut result = self.invite_repo.find_by_invitee(&ctx.email, &page).await?;
        apply_lazy_expiry(&mut result.items);
        Ok(result)
    }

    /// Persist the pending→expired reconciliation forced by an action
    /// attempt, then fail with `Expired`.
    async fn expire_and_fail<T>(
        &self,
        mut tx: sqlx::Transaction<'_, sqlx::Postgres>,
        invite: &ShareInvite,
    ) -> AppResult<T> {
        self.invite_repo.mark_expired_tx(&mut tx, invite.id).await?;
        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;
        Err(AppError::expired("Invite has expired"))
    }

    fn dispatch_notification(&self, invite: &ShareInvite) {
        let notifier = Arc::clone(&self.notifier);
        let notification = InviteNotification {
            invite_id: invite.id,
            invitee_email: invite.invitee_email.clone(),
            inviter_user_id: invite.inviter_user_id,
            resource_type: invite.resource_type.as_str().to_string(),
            resource_id: invite.resource_id.clone(),
            accept_url: format!(
                "{}/accept?inviteToken={}",
                self.share_config.link_base_url.trim_end_matches('/'),
                invite.token
            ),
            expires_at: invite.expires_at,
        };
        let invite_id: Uuid = invite.id;

        tokio::spawn(async move {
            if let Err(e) = notifier.notify(notification).await {
                warn!(
                    invite_id = %invite_id,
                    error = %e,
                    "Invite notification dispatch failed"
                );
            }
        });
    }
}

/// Rewrite lapsed pending rows to effective status `expired`, in memory
/// only.
fn apply_lazy_expiry(invites: &mut [ShareInvite]) {
    let now = Utc::now();
    for invite in invites {
        invite.status = invite.effective_status(now);
    }
}
