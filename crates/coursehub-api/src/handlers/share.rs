//! Invitation and share link handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;
use validator::Validate;

use coursehub_core::error::AppError;
use coursehub_entity::permission::model::ResourceType;
use coursehub_entity::permission::set::PermissionSet;
use coursehub_service::share::invite::CreateInviteInput;
use coursehub_service::share::link::CreateLinkInput;

use crate::dto::request::{CreateInviteRequest, CreateLinkRequest};
use crate::error::ApiError;
use crate::extractors::{AuthIdentity, PaginationParams};
use crate::state::AppState;

/// POST /api/share/invite
pub async fn create_invite(
    State(state): State<AppState>,
    auth: AuthIdentity,
    Json(req): Json<CreateInviteRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let resource_type: ResourceType = req.resource_type.parse()?;
    let permissions = PermissionSet::parse(&req.permissions)?;

    let invite = state
        .invite_service
        .create_invite(
            &auth,
            CreateInviteInput {
                resource_type,
                resource_id: req.resource_id,
                invitee_email: req.invitee_email,
                permissions,
                expires_in_days: req.expires_in_days,
            },
        )
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "data": invite })))
}

/// POST /api/share/accept/{token}
///
/// Token-authenticated: the recipient may not have an account yet, so no
/// identity headers are required.
pub async fn accept_invite(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let accepted = state.invite_service.accept_invite(&token).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": accepted })))
}

/// POST /api/share/decline/{token}
pub async fn decline_invite(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let invite = state.invite_service.decline_invite(&token).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": invite })))
}

/// GET /api/share/sent-invites
pub async fn list_sent_invites(
    State(state): State<AppState>,
    auth: AuthIdentity,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = state
        .invite_service
        .list_sent_invites(&auth, params.into_page_request())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": result })))
}

/// GET /api/share/invites
pub async fn list_received_invites(
    State(state): State<AppState>,
    auth: AuthIdentity,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = state
        .invite_service
        .list_received_invites(&auth, params.into_page_request())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": result })))
}

/// POST /api/share/link
pub async fn create_link(
    State(state): State<AppState>,
    auth: AuthIdentity,
    Json(req): Json<CreateLinkRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let resource_type: ResourceType = req.resource_type.parse()?;
    let permissions = PermissionSet::parse(&req.permissions)?;

    let link = state
        .link_service
        .create_link(
            &auth,
            CreateLinkInput {
                resource_type,
                resource_id: req.resource_id,
                permissions,
                expires_in_days: req.expires_in_days,
                max_access_count: req.max_access_count,
            },
        )
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "data": link })))
}

/// POST /api/share/redeem/{token}
pub async fn redeem_link(
    State(state): State<AppState>,
    auth: AuthIdentity,
    Path(token): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let redeemed = state.link_service.redeem_link(&auth, &token).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": redeemed })))
}

/// GET /api/share/links
pub async fn list_my_links(
    State(state): State<AppState>,
    auth: AuthIdentity,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = state
        .link_service
        .list_my_links(&auth, params.into_page_request())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": result })))
}

/// GET /api/share/links/{resource_type}/{resource_id}
pub async fn list_links(
    State(state): State<AppState>,
    auth: AuthIdentity,
    Path((resource_type, resource_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let resource_type: ResourceType = resource_type.parse()?;
    let links = state
        .link_service
        .list_links(&auth, resource_type, &resource_id)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": links })))
}

/// DELETE /api/share/link/{id}
pub async fn revoke_link(
    State(state): State<AppState>,
    auth: AuthIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.link_service.revoke_link(&auth, id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "message": "Share link revoked" } }),
    ))
}
