//! Shared authorization checks for issuance and revocation.

use std::sync::Arc;

use sqlx::PgConnection;

use coursehub_core::error::AppError;
use coursehub_core::result::AppResult;
use coursehub_database::repositories::grant::GrantRepository;
use coursehub_database::repositories::resource::ResourceRepository;
use coursehub_entity::permission::model::ResourceType;
use coursehub_entity::permission::set::{Permission, PermissionSet};
use coursehub_entity::resource::Resource;

use crate::context::RequestContext;

/// Resolves whether an actor may issue or revoke sharing artifacts on a
/// resource.
///
/// The owner is always authorized; any other actor needs an active grant
/// containing `share`. The transactional variants lock the rows they read
/// so the check and its dependent write cannot be split by a concurrent
/// revocation.
#[derive(Debug, Clone)]
pub struct ShareAuthorizer {
    resource_repo: Arc<ResourceRepository>,
    grant_repo: Arc<GrantRepository>,
}

impl ShareAuthorizer {
    /// Creates a new authorizer.
    pub fn new(resource_repo: Arc<ResourceRepository>, grant_repo: Arc<GrantRepository>) -> Self {
        Self {
            resource_repo,
            grant_repo,
        }
    }

    /// Look up the resource registry row, failing with `NotFound` if the
    /// resource does not exist.
    pub async fn require_resource_tx(
        &self,
        conn: &mut PgConnection,
        resource_type: ResourceType,
        resource_id: &str,
    ) -> AppResult<Resource> {
        self.resource_repo
            .find_tx(conn, resource_type, resource_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Resource {resource_type}/{resource_id} not found"))
            })
    }

    /// Ensure `ctx` may issue invitations or links for the resource.
    ///
    /// Returns the registry row so callers do not re-read it.
    pub async fn ensure_can_issue_tx(
        &self,
        conn: &mut PgConnection,
        ctx: &RequestContext,
        resource_type: ResourceType,
        resource_id: &str,
    ) -> AppResult<Resource> {
        let resource = self
            .require_resource_tx(conn, resource_type, resource_id)
            .await?;

        if resource.owner_id == ctx.user_id {
            return Ok(resource);
        }

        let grants = self
            .grant_repo
            .find_for_identities_tx(conn, resource_type, resource_id, &ctx.identities())
            .await?;

        let effective = grants
            .iter()
            .fold(PermissionSet::empty(), |acc, g| acc.union(&g.permission_set()));

        if effective.contains(Permission::Share) {
            Ok(resource)
        } else {
            Err(AppError::forbidden(format!(
                "User {} lacks share permission on {resource_type}/{resource_id}",
                ctx.user_id
            )))
        }
    }

    /// Whether `ctx` owns the resource. Missing registry rows count as
    /// not owned.
    pub async fn is_owner(
        &self,
        ctx: &RequestContext,
        resource_type: ResourceType,
        resource_id: &str,
    ) -> AppResult<bool> {
        Ok(self
            .resource_repo
            .find(resource_type, resource_id)
            .await?
            .map(|r| r.owner_id == ctx.user_id)
            .unwrap_or(false))
    }
}
