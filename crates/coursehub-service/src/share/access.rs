//! Access evaluation over permission grants.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use coursehub_core::error::AppError;
use coursehub_core::events::ShareEvent;
use coursehub_core::result::AppResult;
use coursehub_database::repositories::grant::GrantRepository;
use coursehub_entity::permission::model::{PermissionGrant, ResourceType};
use coursehub_entity::permission::set::{Permission, PermissionSet};

use crate::context::RequestContext;

use super::authority::ShareAuthorizer;

/// Computes effective permissions and manages grant revocation.
///
/// Grants are the single source of truth for access decisions; invites and
/// links are issuance records that materialize grants but are never
/// consulted here.
#[derive(Debug, Clone)]
pub struct AccessService {
    grant_repo: Arc<GrantRepository>,
    authorizer: Arc<ShareAuthorizer>,
}

impl AccessService {
    /// Creates a new access service.
    pub fn new(grant_repo: Arc<GrantRepository>, authorizer: Arc<ShareAuthorizer>) -> Self {
        Self {
            grant_repo,
            authorizer,
        }
    }

    /// The union of permission sets across all grants the identity holds
    /// on the resource. Empty set when no grant exists.
    pub async fn effective_permissions(
        &self,
        resource_type: ResourceType,
        resource_id: &str,
        identities: &[String],
    ) -> AppResult<PermissionSet> {
        let grants = self
            .grant_repo
            .find_for_identities(resource_type, resource_id, identities)
            .await?;

        Ok(grants
            .iter()
            .fold(PermissionSet::empty(), |acc, g| acc.union(&g.permission_set())))
    }

    /// Whether the identity holds the given permission. Flags are
    /// independent: `delete` and `edit` do not imply `view`.
    pub async fn has_permission(
        &self,
        resource_type: ResourceType,
        resource_id: &str,
        identities: &[String],
        permission: Permission,
    ) -> AppResult<bool> {
        Ok(self
            .effective_permissions(resource_type, resource_id, identities)
            .await?
            .contains(permission))
    }

    /// Removes a grant outright. Owner-only policy: a revoked collaborator
    /// has zero residual permissions.
    pub async fn revoke_access(&self, ctx: &RequestContext, grant_id: Uuid) -> AppResult<()> {
        let grant = self
            .grant_repo
            .find_by_id(grant_id)
            .await?
            .ok_or_else(|| AppError::not_found("Grant not found"))?;

        let is_owner = self
            .authorizer
            .is_owner(ctx, grant.resource_type, &grant.resource_id)
            .await?;
        if !is_owner {
            return Err(AppError::forbidden(
                "Only the resource owner may revoke access",
            ));
        }

        self.grant_repo.delete(grant_id).await?;

        info!(
            grant_id = %grant_id,
            grantee = %grant.grantee_identity,
            revoked_by = %ctx.user_id,
            "Access revoked"
        );
        ShareEvent::GrantRevoked {
            grant_id,
            grantee_identity: grant.grantee_identity,
        }
        .emit();
        Ok(())
    }

    /// Lists all grants on a resource (the collaborator view). Visible to
    /// the owner and to grantees holding `share`.
    pub async fn list_collaborators(
        &self,
        ctx: &RequestContext,
        resource_type: ResourceType,
        resource_id: &str,
    ) -> AppResult<Vec<PermissionGrant>> {
        let authorized = self
            .authorizer
            .is_owner(ctx, resource_type, resource_id)
            .await?
            || self
                .has_permission(
                    resource_type,
                    resource_id,
                    &ctx.identities(),
                    Permission::Share,
                )
                .await?;
        if !authorized {
            return Err(AppError::forbidden(
                "Viewing collaborators requires ownership or share permission",
            ));
        }

        self.grant_repo
            .find_by_resource(resource_type, resource_id)
            .await
    }
}
