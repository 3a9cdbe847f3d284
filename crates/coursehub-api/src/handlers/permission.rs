//! Permission grant handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use coursehub_entity::permission::model::ResourceType;

use crate::error::ApiError;
use crate::extractors::AuthIdentity;
use crate::state::AppState;

/// DELETE /api/permissions/{grant_id}
pub async fn revoke_access(
    State(state): State<AppState>,
    auth: AuthIdentity,
    Path(grant_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.access_service.revoke_access(&auth, grant_id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "message": "Access revoked" } }),
    ))
}

/// GET /api/resources/{resource_type}/{resource_id}/collaborators
pub async fn list_collaborators(
    State(state): State<AppState>,
    auth: AuthIdentity,
    Path((resource_type, resource_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let resource_type: ResourceType = resource_type.parse()?;
    let grants = state
        .access_service
        .list_collaborators(&auth, resource_type, &resource_id)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": grants })))
}
