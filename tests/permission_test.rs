//! Integration tests for grant revocation and effective permissions.

mod common;

use http::StatusCode;
use serde_json::json;

use common::{TestApp, TestIdentity};

/// Share a resource with `collaborator` via an invite and return the grant ID.
async fn grant_via_invite(
    app: &TestApp,
    owner: &TestIdentity,
    collaborator: &TestIdentity,
    resource_type: &str,
    resource_id: &str,
    permissions: serde_json::Value,
) -> String {
    let response = app
        .request(
            "POST",
            "/api/share/invite",
            Some(json!({
                "resource_type": resource_type,
                "resource_id": resource_id,
                "invitee_email": collaborator.email,
                "permissions": permissions,
                "expires_in_days": 7,
            })),
            Some(owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let token = response.data()["token"].as_str().unwrap().to_string();

    let response = app
        .request("POST", &format!("/api/share/accept/{token}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    response.data()["grant"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_owner_revokes_grant() {
    let app = TestApp::new().await;
    let owner = TestIdentity::random("owner");
    let collaborator = TestIdentity::random("collab");
    let resource_id = app.seed_resource("course", owner.user_id).await;

    let grant_id = grant_via_invite(
        &app,
        &owner,
        &collaborator,
        "course",
        &resource_id,
        json!(["view", "edit"]),
    )
    .await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/permissions/{grant_id}"),
            None,
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    // The collaborator drops out of the listing entirely.
    let response = app
        .request(
            "GET",
            &format!("/api/resources/course/{resource_id}/collaborators"),
            None,
            Some(&owner),
        )
        .await;
    assert!(response.data().as_array().unwrap().is_empty());

    // Revoking the same grant again is a 404, not an error 500.
    let response = app
        .request(
            "DELETE",
            &format!("/api/permissions/{grant_id}"),
            None,
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_only_owner_may_revoke() {
    let app = TestApp::new().await;
    let owner = TestIdentity::random("owner");
    let collaborator = TestIdentity::random("collab");
    let resource_id = app.seed_resource("report", owner.user_id).await;

    let grant_id = grant_via_invite(
        &app,
        &owner,
        &collaborator,
        "report",
        &resource_id,
        json!(["view", "share"]),
    )
    .await;

    // Even a collaborator holding the share permission cannot revoke.
    let response = app
        .request(
            "DELETE",
            &format!("/api/permissions/{grant_id}"),
            None,
            Some(&collaborator),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "GET",
            &format!("/api/resources/report/{resource_id}/collaborators"),
            None,
            Some(&owner),
        )
        .await;
    assert_eq!(response.data().as_array().unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_share_holder_may_invite_others() {
    let app = TestApp::new().await;
    let owner = TestIdentity::random("owner");
    let delegate = TestIdentity::random("delegate");
    let third = TestIdentity::random("third");
    let resource_id = app.seed_resource("course", owner.user_id).await;

    grant_via_invite(
        &app,
        &owner,
        &delegate,
        "course",
        &resource_id,
        json!(["view", "share"]),
    )
    .await;

    // The delegate holds share, so their invite goes through.
    let response = app
        .request(
            "POST",
            "/api/share/invite",
            Some(json!({
                "resource_type": "course",
                "resource_id": resource_id,
                "invitee_email": third.email,
                "permissions": ["view"],
                "expires_in_days": 7,
            })),
            Some(&delegate),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_view_only_holder_may_not_invite() {
    let app = TestApp::new().await;
    let owner = TestIdentity::random("owner");
    let viewer = TestIdentity::random("viewer");
    let third = TestIdentity::random("third");
    let resource_id = app.seed_resource("csv", owner.user_id).await;

    grant_via_invite(&app, &owner, &viewer, "csv", &resource_id, json!(["view"])).await;

    // There is no hierarchy; view does not imply share.
    let response = app
        .request(
            "POST",
            "/api/share/invite",
            Some(json!({
                "resource_type": "csv",
                "resource_id": resource_id,
                "invitee_email": third.email,
                "permissions": ["view"],
                "expires_in_days": 7,
            })),
            Some(&viewer),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_collaborator_listing_requires_standing() {
    let app = TestApp::new().await;
    let owner = TestIdentity::random("owner");
    let collaborator = TestIdentity::random("collab");
    let stranger = TestIdentity::random("stranger");
    let resource_id = app.seed_resource("user_content", owner.user_id).await;

    grant_via_invite(
        &app,
        &owner,
        &collaborator,
        "user_content",
        &resource_id,
        json!(["view", "share"]),
    )
    .await;

    let response = app
        .request(
            "GET",
            &format!("/api/resources/user_content/{resource_id}/collaborators"),
            None,
            Some(&stranger),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "GET",
            &format!("/api/resources/user_content/{resource_id}/collaborators"),
            None,
            Some(&collaborator),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_invite_regrant_overwrites_permissions() {
    let app = TestApp::new().await;
    let owner = TestIdentity::random("owner");
    let collaborator = TestIdentity::random("collab");
    let resource_id = app.seed_resource("course", owner.user_id).await;

    let first = grant_via_invite(
        &app,
        &owner,
        &collaborator,
        "course",
        &resource_id,
        json!(["view"]),
    )
    .await;

    // A second accepted invite for the same person replaces, never stacks.
    let second = grant_via_invite(
        &app,
        &owner,
        &collaborator,
        "course",
        &resource_id,
        json!(["view", "edit"]),
    )
    .await;
    assert_eq!(first, second);

    let response = app
        .request(
            "GET",
            &format!("/api/resources/course/{resource_id}/collaborators"),
            None,
            Some(&owner),
        )
        .await;
    let grants = response.data().as_array().unwrap();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0]["permissions"], json!(["view", "edit"]));
}
