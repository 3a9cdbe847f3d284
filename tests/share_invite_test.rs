//! Integration tests for the invitation lifecycle.

mod common;

use http::StatusCode;
use serde_json::json;

use common::{TestApp, TestIdentity};

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_create_then_accept_yields_effective_permissions() {
    let app = TestApp::new().await;
    let owner = TestIdentity::random("owner");
    let invitee = TestIdentity::random("invitee");
    let resource_id = app.seed_resource("course", owner.user_id).await;

    let response = app
        .request(
            "POST",
            "/api/share/invite",
            Some(json!({
                "resource_type": "course",
                "resource_id": resource_id,
                "invitee_email": invitee.email,
                "permissions": ["view", "edit"],
                "expires_in_days": 7,
            })),
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["status"], "pending");
    let token = response.data()["token"].as_str().unwrap().to_string();

    let response = app
        .request("POST", &format!("/api/share/accept/{token}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["invite"]["status"], "accepted");
    assert_eq!(response.data()["grant"]["permissions"], json!(["view", "edit"]));

    // The invitee sees the grant in the collaborator listing.
    let response = app
        .request(
            "GET",
            &format!("/api/resources/course/{resource_id}/collaborators"),
            None,
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let grants = response.data().as_array().unwrap();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0]["grantee_identity"], invitee.email.to_lowercase());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_accept_is_idempotent() {
    let app = TestApp::new().await;
    let owner = TestIdentity::random("owner");
    let invitee = TestIdentity::random("invitee");
    let resource_id = app.seed_resource("report", owner.user_id).await;

    let response = app
        .request(
            "POST",
            "/api/share/invite",
            Some(json!({
                "resource_type": "report",
                "resource_id": resource_id,
                "invitee_email": invitee.email,
                "permissions": ["view"],
                "expires_in_days": 30,
            })),
            Some(&owner),
        )
        .await;
    let token = response.data()["token"].as_str().unwrap().to_string();

    let first = app
        .request("POST", &format!("/api/share/accept/{token}"), None, None)
        .await;
    assert_eq!(first.status, StatusCode::OK);
    let first_grant_id = first.data()["grant"]["id"].as_str().unwrap().to_string();

    let second = app
        .request("POST", &format!("/api/share/accept/{token}"), None, None)
        .await;
    assert_eq!(second.status, StatusCode::OK, "{:?}", second.body);
    let second_grant_id = second.data()["grant"]["id"].as_str().unwrap().to_string();

    // Same grant both times, not a duplicate row.
    assert_eq!(first_grant_id, second_grant_id);

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
async fn test_expiry_blocks_accept_and_decline_symmetrically() {
    let app = TestApp::new().await;
    let owner = TestIdentity::random("owner");
    let resource_id = app.seed_resource("csv", owner.user_id).await;

    let response = app
        .request(
            "POST",
            "/api/share/invite",
            Some(json!({
                "resource_type": "csv",
                "resource_id": resource_id,
                "invitee_email": "late@test.coursehub.io",
                "permissions": ["view"],
                "expires_in_days": 1,
            })),
            Some(&owner),
        )
        .await;
    let token = response.data()["token"].as_str().unwrap().to_string();
    app.lapse_invite(&token).await;

    let accept = app
        .request("POST", &format!("/api/share/accept/{token}"), None, None)
        .await;
    assert_eq!(accept.status, StatusCode::CONFLICT);
    assert_eq!(accept.error_code(), "EXPIRED");

    let decline = app
        .request("POST", &format!("/api/share/decline/{token}"), None, None)
        .await;
    assert_eq!(decline.status, StatusCode::CONFLICT);
    assert_eq!(decline.error_code(), "EXPIRED");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_lapsed_invite_listed_as_expired_without_rewrite() {
    let app = TestApp::new().await;
    let owner = TestIdentity::random("owner");
    let resource_id = app.seed_resource("course", owner.user_id).await;

    let response = app
        .request(
            "POST",
            "/api/share/invite",
            Some(json!({
                "resource_type": "course",
                "resource_id": resource_id,
                "invitee_email": "slow@test.coursehub.io",
                "permissions": ["view"],
                "expires_in_days": 1,
            })),
            Some(&owner),
        )
        .await;
    let token = response.data()["token"].as_str().unwrap().to_string();
    app.lapse_invite(&token).await;

    let response = app
        .request("GET", "/api/share/sent-invites", None, Some(&owner))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let listed = response.data()["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["token"] == token.as_str())
        .expect("invite missing from listing");
    assert_eq!(listed["status"], "expired");

    // The row itself is still pending until an action forces the rewrite.
    let stored: String =
        sqlx::query_scalar("SELECT status::text FROM share_invites WHERE token = $1")
            .bind(&token)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert_eq!(stored, "pending");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_decline_is_terminal() {
    let app = TestApp::new().await;
    let owner = TestIdentity::random("owner");
    let resource_id = app.seed_resource("user_content", owner.user_id).await;

    let response = app
        .request(
            "POST",
            "/api/share/invite",
            Some(json!({
                "resource_type": "user_content",
                "resource_id": resource_id,
                "invitee_email": "nope@test.coursehub.io",
                "permissions": ["view", "edit"],
                "expires_in_days": 7,
            })),
            Some(&owner),
        )
        .await;
    let token = response.data()["token"].as_str().unwrap().to_string();

    let decline = app
        .request("POST", &format!("/api/share/decline/{token}"), None, None)
        .await;
    assert_eq!(decline.status, StatusCode::OK);
    assert_eq!(decline.data()["status"], "declined");

    // Accepting after declining is rejected and creates no grant.
    let accept = app
        .request("POST", &format!("/api/share/accept/{token}"), None, None)
        .await;
    assert_eq!(accept.status, StatusCode::CONFLICT);
    assert_eq!(accept.error_code(), "CONFLICT");

    let response = app
        .request(
            "GET",
            &format!("/api/resources/user_content/{resource_id}/collaborators"),
            None,
            Some(&owner),
        )
        .await;
    assert!(response.data().as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_invite_validation_and_authorization() {
    let app = TestApp::new().await;
    let owner = TestIdentity::random("owner");
    let stranger = TestIdentity::random("stranger");
    let resource_id = app.seed_resource("market_data", owner.user_id).await;

    // Empty permission set.
    let response = app
        .request(
            "POST",
            "/api/share/invite",
            Some(json!({
                "resource_type": "market_data",
                "resource_id": resource_id,
                "invitee_email": "a@test.coursehub.io",
                "permissions": [],
                "expires_in_days": 7,
            })),
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    // Out-of-range expiry.
    let response = app
        .request(
            "POST",
            "/api/share/invite",
            Some(json!({
                "resource_type": "market_data",
                "resource_id": resource_id,
                "invitee_email": "a@test.coursehub.io",
                "permissions": ["view"],
                "expires_in_days": 400,
            })),
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    // Unknown resource.
    let response = app
        .request(
            "POST",
            "/api/share/invite",
            Some(json!({
                "resource_type": "market_data",
                "resource_id": "no-such-resource",
                "invitee_email": "a@test.coursehub.io",
                "permissions": ["view"],
                "expires_in_days": 7,
            })),
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    // Actor without share permission.
    let response = app
        .request(
            "POST",
            "/api/share/invite",
            Some(json!({
                "resource_type": "market_data",
                "resource_id": resource_id,
                "invitee_email": "a@test.coursehub.io",
                "permissions": ["view"],
                "expires_in_days": 7,
            })),
            Some(&stranger),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // No identity headers at all.
    let response = app
        .request("GET", "/api/share/sent-invites", None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_unknown_invite_token_is_not_found() {
    let app = TestApp::new().await;
    let response = app
        .request("POST", "/api/share/accept/no-such-token", None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "NOT_FOUND");
}
