//! Share link lifecycle service.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;

use coursehub_core::config::share::ShareConfig;
use coursehub_core::error::{AppError, ErrorKind};
use coursehub_core::events::ShareEvent;
use coursehub_core::result::AppResult;
use coursehub_core::types::pagination::{PageRequest, PageResponse};
use coursehub_database::repositories::grant::GrantRepository;
use coursehub_database::repositories::link::LinkRepository;
use coursehub_entity::link::model::{CreateLink, ShareLink};
use coursehub_entity::permission::model::{PermissionGrant, ResourceType};
use coursehub_entity::permission::set::PermissionSet;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::token::TokenGenerator;

use super::authority::ShareAuthorizer;

/// Minimum link validity in days, when an expiry is requested.
const MIN_EXPIRY_DAYS: i64 = 1;
/// Maximum link validity in days.
const MAX_EXPIRY_DAYS: i64 = 365;

/// Input for creating a new share link.
#[derive(Debug, Clone)]
pub struct CreateLinkInput {
    /// Resource type being shared.
    pub resource_type: ResourceType,
    /// Resource ID being shared.
    pub resource_id: String,
    /// Permissions granted on redemption.
    pub permissions: PermissionSet,
    /// Validity in days (None = no expiry).
    pub expires_in_days: Option<i64>,
    /// Redemption ceiling (None = unlimited).
    pub max_access_count: Option<i32>,
}

/// A link as presented in listings: the row plus derived fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkListing {
    /// The stored link row.
    #[serde(flatten)]
    pub link: ShareLink,
    /// Whether a redemption attempt right now would succeed.
    pub usable: bool,
    /// The public URL carrying the token.
    pub url: String,
}

/// Result of a successful redemption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemedLink {
    /// The link after the redemption was counted.
    pub link: ShareLink,
    /// The grant materialized for the redeemer.
    pub grant: PermissionGrant,
    /// The permission set the redeemer now holds from this link.
    pub permissions: PermissionSet,
}

/// Manages share link creation, redemption, revocation, and listings.
#[derive(Debug, Clone)]
pub struct LinkService {
    pool: PgPool,
    link_repo: Arc<LinkRepository>,
    grant_repo: Arc<GrantRepository>,
    authorizer: Arc<ShareAuthorizer>,
    token_generator: Arc<TokenGenerator>,
    share_config: ShareConfig,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(
        pool: PgPool,
        link_repo: Arc<LinkRepository>,
        grant_repo: Arc<GrantRepository>,
        authorizer: Arc<ShareAuthorizer>,
        token_generator: Arc<TokenGenerator>,
        share_config: ShareConfig,
    ) -> Self {
        Self {
            pool,
            link_repo,
            grant_repo,
            authorizer,
            token_generator,
            share_config,
        }
    }

    /// Creates a tokenized public link for a resource.
    pub async fn create_link(
        &self,
        ctx: &RequestContext,
        input: CreateLinkInput,
    ) -> AppResult<LinkListing> {
        if let Some(days) = input.expires_in_days {
            if !(MIN_EXPIRY_DAYS..=MAX_EXPIRY_DAYS).contains(&days) {
                return Err(AppError::validation(format!(
                    "expires_in_days must be between {MIN_EXPIRY_DAYS} and {MAX_EXPIRY_DAYS}"
                )));
            }
        }
        if let Some(max) = input.max_access_count {
            if max < 1 {
                return Err(AppError::validation(
                    "max_access_count must be at least 1",
                ));
            }
        }

        let token = self.token_generator.generate();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        self.authorizer
            .ensure_can_issue_tx(&mut tx, ctx, input.resource_type, &input.resource_id)
            .await?;

        let link = self
            .link_repo
            .insert_tx(
                &mut tx,
                &CreateLink {
                    resource_type: input.resource_type,
                    resource_id: input.resource_id,
                    created_by: ctx.user_id,
                    token,
                    permissions: input.permissions.to_vec(),
                    max_access_count: input.max_access_count,
                    expires_at: input
                        .expires_in_days
                        .map(|days| Utc::now() + Duration::days(days)),
                },
            )
            .await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        info!(
            creator = %ctx.user_id,
            link_id = %link.id,
            resource_type = %link.resource_type,
            resource_id = %link.resource_id,
            max_access_count = ?link.max_access_count,
            "Share link created"
        );
        ShareEvent::LinkCreated {
            link_id: link.id,
            resource_type: link.resource_type.as_str().to_string(),
            resource_id: link.resource_id.clone(),
        }
        .emit();

        Ok(self.to_listing(link))
    }

    /// Redeems a link token for the current identity.
    ///
    /// The access counter increment and its ceiling check are one atomic
    /// conditional update, so a ceiling of N admits exactly N successes
    /// under concurrent redemption. Redemption by the same identity counts
    /// again each time; the counter measures redemption events, not
    /// unique redeemers.
    pub async fn redeem_link(&self, ctx: &RequestContext, token: &str) -> AppResult<RedeemedLink> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        if let Some(link) = self.link_repo.try_redeem_tx(&mut tx, token).await? {
            let grant = self
                .grant_repo
                .upsert_tx(
                    &mut tx,
                    link.resource_type,
                    &link.resource_id,
                    &ctx.grant_identity(),
                    &link.permissions,
                    link.created_by,
                )
                .await?;

            tx.commit().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
            })?;

            info!(
                link_id = %link.id,
                redeemer = %ctx.user_id,
                access_count = link.access_count,
                "Share link redeemed"
            );
            ShareEvent::LinkRedeemed {
                link_id: link.id,
                access_count: link.access_count,
                max_access_count: link.max_access_count,
            }
            .emit();

            let permissions = grant.permission_set();
            return Ok(RedeemedLink {
                link,
                grant,
                permissions,
            });
        }

        // The conditional update matched nothing. Distinguish "never
        // existed" from "existed but no longer usable" for the caller.
        let link = self
            .link_repo
            .find_by_token_tx(&mut tx, token)
            .await?
            .ok_or_else(|| AppError::not_found("Share link not found"))?;

        if !link.is_active {
            Err(AppError::revoked("Share link has been revoked"))
        } else if link.is_expired(Utc::now()) {
            Err(AppError::expired("Share link has expired"))
        } else if link.is_exhausted() {
            Err(AppError::exhausted("Share link has reached its access limit"))
        } else {
            Err(AppError::conflict(
                "Share link was consumed by a concurrent request",
            ))
        }
    }

    /// Revokes a link. Only the creator or the resource owner may revoke;
    /// irreversible; there is no un-revoke.
    pub async fn revoke_link(&self, ctx: &RequestContext, link_id: Uuid) -> AppResult<()> {
        let link = self
            .link_repo
            .find_by_id(link_id)
            .await?
            .ok_or_else(|| AppError::not_found("Share link not found"))?;

        let authorized = link.created_by == ctx.user_id
            || self
                .authorizer
                .is_owner(ctx, link.resource_type, &link.resource_id)
                .await?;
        if !authorized {
            return Err(AppError::forbidden(
                "Only the link creator or resource owner may revoke a link",
            ));
        }

        let deactivated = self.link_repo.deactivate(link_id).await?;
        if !deactivated {
            return Err(AppError::revoked("Share link is already revoked"));
        }

        info!(link_id = %link_id, revoked_by = %ctx.user_id, "Share link revoked");
        ShareEvent::LinkRevoked { link_id }.emit();
        Ok(())
    }

    /// Lists links on a resource with derived usability.
    pub async fn list_links(
        &self,
        ctx: &RequestContext,
        resource_type: ResourceType,
        resource_id: &str,
    ) -> AppResult<Vec<LinkListing>> {
        self.authorize_listing(ctx, resource_type, resource_id)
            .await?;

        let links = self
            .link_repo
            .find_by_resource(resource_type, resource_id)
            .await?;

        Ok(links.into_iter().map(|l| self.to_listing(l)).collect())
    }

    /// Lists links created by the current user.
    pub async fn list_my_links(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> AppResult<PageResponse<LinkListing>> {
        let result = self.link_repo.find_by_creator(ctx.user_id, &page).await?;
        let listings = result.items.into_iter().map(|l| self.to_listing(l)).collect();
        Ok(PageResponse::new(
            listings,
            result.page,
            result.page_size,
            result.total_items,
        ))
    }

    /// Listing a resource's links reveals their tokens, so it is held to
    /// the same bar as issuing one.
    async fn authorize_listing(
        &self,
        ctx: &RequestContext,
        resource_type: ResourceType,
        resource_id: &str,
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;
        self.authorizer
            .ensure_can_issue_tx(&mut tx, ctx, resource_type, resource_id)
            .await?;
        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;
        Ok(())
    }

    fn to_listing(&self, link: ShareLink) -> LinkListing {
        let usable = link.is_usable(Utc::now());
        let url = format!(
            "{}?shareToken={}",
            self.share_config.link_base_url.trim_end_matches('/'),
            link.token
        );
        LinkListing { link, usable, url }
    }
}
