//! User administration API integration tests.
//!
//! Drives the live server end-to-end: realm role replacement, user
//! CRUD, password resets, per-user role assignment, and the access
//! rules of every operation.

use serde::Deserialize;
use serde_json::json;

use crate::common::{TestEnv, ADMIN_TOKEN, OUTSIDER_TOKEN, REALM_ADMIN_TOKEN, USER_TOKEN};

/// User representation as seen on the wire.
#[derive(Debug, Deserialize)]
pub struct UserRepresentation {
    pub id: uuid::Uuid,
    pub realm: String,
    pub username: String,
    pub enabled: bool,
    pub email: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
}

/// Role representation as seen on the wire.
#[derive(Debug, Deserialize)]
pub struct RoleRepresentation {
    pub id: Option<uuid::Uuid>,
    pub name: String,
    pub description: Option<String>,
}

/// Tests health and info endpoints.
#[tokio::test]
async fn test_health_and_root() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    for path in ["/health", "/health/live", "/health/ready"] {
        let response = env
            .client
            .get(format!("{}{}", env.base_url, path))
            .send()
            .await?;
        assert!(
            response.status().is_success(),
            "{path} should return success"
        );
    }

    let response = env.client.get(&env.base_url).send().await?;
    let body: serde_json::Value = response.json().await?;
    assert!(body.get("name").is_some(), "Should have name field");
    assert!(body.get("version").is_some(), "Should have version field");

    Ok(())
}

/// Tests that requests without a bearer token are rejected.
#[tokio::test]
async fn test_missing_token_is_unauthorized() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let response = env
        .client
        .get(format!("{}/user/acme/users", env.base_url))
        .send()
        .await?;

    assert_eq!(response.status(), 401);
    assert_eq!(
        response
            .headers()
            .get("WWW-Authenticate")
            .and_then(|v| v.to_str().ok()),
        Some("Bearer")
    );

    let response = env.get("/user/acme/users", "no-such-token").send().await?;
    assert_eq!(response.status(), 401);

    Ok(())
}

/// Replace semantics: `updateRoles` followed by `getRoles` returns
/// exactly the new set, no merge.
#[tokio::test]
async fn test_update_roles_replaces_the_set() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let response = env
        .put("/user/acme/roles", ADMIN_TOKEN)
        .json(&json!([
            {"name": "editor", "description": "Can edit"},
            {"name": "viewer"},
        ]))
        .send()
        .await?;
    assert_eq!(response.status(), 204);

    let roles: Vec<RoleRepresentation> = env
        .get("/user/acme/roles", ADMIN_TOKEN)
        .send()
        .await?
        .json()
        .await?;
    let mut names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["editor", "viewer"]);
    assert!(roles.iter().all(|r| r.id.is_some()));
    let editor_id = roles.iter().find(|r| r.name == "editor").unwrap().id;

    // The second replace drops viewer and keeps editor's identity.
    let response = env
        .put("/user/acme/roles", ADMIN_TOKEN)
        .json(&json!([{"name": "editor", "description": "Still edits"}]))
        .send()
        .await?;
    assert_eq!(response.status(), 204);

    let roles: Vec<RoleRepresentation> = env
        .get("/user/acme/roles", ADMIN_TOKEN)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].name, "editor");
    assert_eq!(roles[0].id, editor_id);
    assert_eq!(roles[0].description.as_deref(), Some("Still edits"));

    Ok(())
}

/// The role listing is an admin operation per the contract.
#[tokio::test]
async fn test_get_roles_requires_write_admin() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let response = env.get("/user/acme/roles", USER_TOKEN).send().await?;
    assert_eq!(response.status(), 403);

    let response = env.get("/user/acme/roles", REALM_ADMIN_TOKEN).send().await?;
    assert_eq!(response.status(), 200);

    Ok(())
}

/// Create then get returns the same user modulo server-assigned fields.
#[tokio::test]
async fn test_create_then_get_round_trip() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let response = env
        .post("/user/acme/users", ADMIN_TOKEN)
        .json(&json!({
            "username": "alice",
            "email": "alice@acme.example",
            "firstName": "Alice",
            "lastName": "Smith",
        }))
        .send()
        .await?;
    assert_eq!(response.status(), 201);
    let location = response
        .headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    let created: UserRepresentation = response.json().await?;
    assert_eq!(created.username, "alice");
    assert_eq!(created.realm, env.acme.name);
    assert!(created.enabled);
    assert_eq!(
        location.as_deref(),
        Some(format!("/user/acme/{}", created.id).as_str())
    );

    let fetched: UserRepresentation = env
        .get(&format!("/user/acme/{}", created.id), ADMIN_TOKEN)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.username, "alice");
    assert_eq!(fetched.email.as_deref(), Some("alice@acme.example"));
    assert_eq!(fetched.first_name.as_deref(), Some("Alice"));
    assert_eq!(fetched.last_name.as_deref(), Some("Smith"));

    // And it shows up in the full listing.
    let all: Vec<UserRepresentation> = env
        .get("/user/acme/users", ADMIN_TOKEN)
        .send()
        .await?
        .json()
        .await?;
    assert!(all.iter().any(|u| u.id == created.id));

    Ok(())
}

/// Malformed payloads fail validation before any store call.
#[tokio::test]
async fn test_create_validates_payload() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let response = env
        .post("/user/acme/users", ADMIN_TOKEN)
        .json(&json!({"username": ""}))
        .send()
        .await?;
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"], "validation_error");

    let response = env
        .post("/user/acme/users", ADMIN_TOKEN)
        .json(&json!({"username": "alice", "email": "not-an-email"}))
        .send()
        .await?;
    assert_eq!(response.status(), 400);

    // Duplicate username is a conflict, not a validation error.
    let response = env
        .post("/user/acme/users", ADMIN_TOKEN)
        .json(&json!({"username": "bob"}))
        .send()
        .await?;
    assert_eq!(response.status(), 409);

    Ok(())
}

/// Updates apply partially and are visible on the next read.
#[tokio::test]
async fn test_update_user() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let response = env
        .put(&format!("/user/acme/users/{}", env.bob_id), ADMIN_TOKEN)
        .json(&json!({"email": "bob@new.example", "enabled": false}))
        .send()
        .await?;
    assert_eq!(response.status(), 204);

    let fetched: UserRepresentation = env
        .get(&format!("/user/acme/{}", env.bob_id), ADMIN_TOKEN)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(fetched.email.as_deref(), Some("bob@new.example"));
    assert!(!fetched.enabled);
    assert_eq!(fetched.username, "bob");

    Ok(())
}

/// Delete followed by get yields not-found.
#[tokio::test]
async fn test_delete_then_get_is_not_found() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let created: UserRepresentation = env
        .post("/user/acme/users", ADMIN_TOKEN)
        .json(&json!({"username": "shortlived"}))
        .send()
        .await?
        .json()
        .await?;

    let response = env
        .delete(&format!("/user/acme/users/{}", created.id), ADMIN_TOKEN)
        .send()
        .await?;
    assert_eq!(response.status(), 204);

    let response = env
        .get(&format!("/user/acme/{}", created.id), ADMIN_TOKEN)
        .send()
        .await?;
    assert_eq!(response.status(), 404);

    Ok(())
}

/// Admin-scoped operations fail with 403 for callers without the
/// write-admin capability, regardless of payload validity.
#[tokio::test]
async fn test_admin_operations_require_write_admin() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let valid_user = json!({"username": "mallory"});
    let invalid_user = json!({"username": ""});

    for payload in [&valid_user, &invalid_user] {
        let response = env
            .post("/user/acme/users", USER_TOKEN)
            .json(payload)
            .send()
            .await?;
        assert_eq!(response.status(), 403);
    }

    let response = env
        .put("/user/acme/roles", OUTSIDER_TOKEN)
        .json(&json!([{"name": "editor"}]))
        .send()
        .await?;
    assert_eq!(response.status(), 403);

    let response = env
        .delete(&format!("/user/acme/users/{}", env.bob_id), USER_TOKEN)
        .send()
        .await?;
    assert_eq!(response.status(), 403);

    let response = env
        .put(
            &format!("/user/acme/reset-password/{}", env.bob_id),
            USER_TOKEN,
        )
        .json(&json!({"value": "new-password"}))
        .send()
        .await?;
    assert_eq!(response.status(), 403);

    // A realm admin's capability stops at the realm boundary.
    let response = env
        .post("/user/globex/users", REALM_ADMIN_TOKEN)
        .json(&valid_user)
        .send()
        .await?;
    assert_eq!(response.status(), 403);

    Ok(())
}

/// Authenticated reads are scoped to the caller's own realm.
#[tokio::test]
async fn test_cross_realm_reads_are_denied() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let response = env.get("/user/acme/users", USER_TOKEN).send().await?;
    assert_eq!(response.status(), 200);

    let response = env.get("/user/acme/users", OUTSIDER_TOKEN).send().await?;
    assert_eq!(response.status(), 403);

    let response = env
        .get(&format!("/user/acme/{}", env.bob_id), OUTSIDER_TOKEN)
        .send()
        .await?;
    assert_eq!(response.status(), 403);

    Ok(())
}

/// The current-caller endpoints resolve identity from the token, not
/// from a path parameter.
#[tokio::test]
async fn test_current_user_endpoints() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let me: UserRepresentation = env
        .get("/user/user", USER_TOKEN)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(me.id, env.bob_id);
    assert_eq!(me.username, "bob");
    assert_eq!(me.realm, "acme");

    let roles: Vec<RoleRepresentation> = env
        .get("/user/userRoles", USER_TOKEN)
        .send()
        .await?
        .json()
        .await?;
    assert!(roles.is_empty());

    // Assign a role and the caller sees it.
    env.put("/user/acme/roles", ADMIN_TOKEN)
        .json(&json!([{"name": "viewer"}]))
        .send()
        .await?;
    let response = env
        .put(&format!("/user/acme/userRoles/{}", env.bob_id), ADMIN_TOKEN)
        .json(&json!([{"name": "viewer"}]))
        .send()
        .await?;
    assert_eq!(response.status(), 204);

    let roles: Vec<RoleRepresentation> = env
        .get("/user/userRoles", USER_TOKEN)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].name, "viewer");

    Ok(())
}

/// The acceptance scenario: create a user, assign a role set, read it
/// back.
#[tokio::test]
async fn test_user_role_assignment_flow() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    env.put("/user/acme/roles", ADMIN_TOKEN)
        .json(&json!([{"name": "editor"}, {"name": "viewer"}]))
        .send()
        .await?;

    let alice: UserRepresentation = env
        .post("/user/acme/users", ADMIN_TOKEN)
        .json(&json!({"username": "alice"}))
        .send()
        .await?
        .json()
        .await?;

    let fetched: UserRepresentation = env
        .get(&format!("/user/acme/{}", alice.id), ADMIN_TOKEN)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(fetched.username, "alice");

    let response = env
        .put(&format!("/user/acme/userRoles/{}", alice.id), ADMIN_TOKEN)
        .json(&json!([{"name": "editor"}]))
        .send()
        .await?;
    assert_eq!(response.status(), 204);

    let roles: Vec<RoleRepresentation> = env
        .get(&format!("/user/acme/userRoles/{}", alice.id), ADMIN_TOKEN)
        .send()
        .await?
        .json()
        .await?;
    let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["editor"]);

    // Replace, not merge: a new assignment drops the old one.
    env.put(&format!("/user/acme/userRoles/{}", alice.id), ADMIN_TOKEN)
        .json(&json!([{"name": "viewer"}]))
        .send()
        .await?;
    let roles: Vec<RoleRepresentation> = env
        .get(&format!("/user/acme/userRoles/{}", alice.id), ADMIN_TOKEN)
        .send()
        .await?
        .json()
        .await?;
    let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["viewer"]);

    // Unknown role names fail validation and nothing is applied.
    let response = env
        .put(&format!("/user/acme/userRoles/{}", alice.id), ADMIN_TOKEN)
        .json(&json!([{"name": "no-such-role"}]))
        .send()
        .await?;
    assert_eq!(response.status(), 400);

    Ok(())
}

/// Credentials are write-only: the reset lands in the store and never
/// appears in any read response.
#[tokio::test]
async fn test_reset_password_is_write_only() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let secret = "correct-horse-battery";

    let response = env
        .put(
            &format!("/user/acme/reset-password/{}", env.bob_id),
            REALM_ADMIN_TOKEN,
        )
        .json(&json!({"value": secret, "temporary": true}))
        .send()
        .await?;
    assert_eq!(response.status(), 204);

    // The credential reached the store.
    assert_eq!(env.store.password_value(env.bob_id).as_deref(), Some(secret));
    assert_eq!(env.store.password_is_temporary(env.bob_id), Some(true));

    // No read endpoint ever echoes it.
    for path in [
        format!("/user/acme/{}", env.bob_id),
        "/user/acme/users".to_string(),
        "/user/user".to_string(),
    ] {
        let token = if path == format!("/user/acme/{}", env.bob_id) {
            ADMIN_TOKEN
        } else {
            USER_TOKEN
        };
        let body = env.get(&path, token).send().await?.text().await?;
        assert!(
            !body.contains(secret),
            "credential leaked in response of {path}"
        );
    }

    // An empty credential value is rejected.
    let response = env
        .put(
            &format!("/user/acme/reset-password/{}", env.bob_id),
            REALM_ADMIN_TOKEN,
        )
        .json(&json!({"value": ""}))
        .send()
        .await?;
    assert_eq!(response.status(), 400);

    Ok(())
}

/// Unknown realms and users resolve to 404.
#[tokio::test]
async fn test_unknown_realm_and_user_are_not_found() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let response = env.get("/user/nowhere/users", ADMIN_TOKEN).send().await?;
    assert_eq!(response.status(), 404);

    let response = env
        .get(
            &format!("/user/acme/{}", uuid::Uuid::now_v7()),
            ADMIN_TOKEN,
        )
        .send()
        .await?;
    assert_eq!(response.status(), 404);

    Ok(())
}

/// Concurrent requests are served independently.
#[tokio::test]
async fn test_concurrent_requests() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let client = env.client.clone();
            let url = format!("{}/user/acme/users", env.base_url);
            tokio::spawn(async move {
                client.get(&url).bearer_auth(ADMIN_TOKEN).send().await
            })
        })
        .collect();

    let results = futures::future::join_all(handles).await;

    for result in results {
        let response = result??;
        assert!(response.status().is_success(), "Concurrent request failed");
    }

    Ok(())
}
