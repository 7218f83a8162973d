//! Operation handlers for the user administration API.
//!
//! Handlers contain no authorization logic: the access guard derived
//! from the endpoint table runs before any of these. Each handler
//! resolves the realm first and then resolves entities strictly within
//! that realm.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use rg_model::{Realm, Role, User};
use uuid::Uuid;

use crate::audit::{AuditEvent, AuditKind};
use crate::auth::AuthContext;
use crate::dto::{
    validate_role_set, CreateUserRequest, CredentialRequest, RoleRepresentation,
    UpdateUserRequest, UserRepresentation,
};
use crate::error::{ApiError, ApiResult};
use crate::state::UserApiState;

// ============================================================================
// Helpers
// ============================================================================

async fn resolve_realm(state: &UserApiState, name: &str) -> ApiResult<Realm> {
    state
        .realms
        .get_by_name(name)
        .await?
        .ok_or_else(|| ApiError::not_found("Realm", name))
}

async fn resolve_user(state: &UserApiState, realm: &Realm, user_id: Uuid) -> ApiResult<User> {
    state
        .users
        .get_by_id(realm.id, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found_id("User", user_id))
}

/// Roles assigned to a user, resolved against the realm's role set.
async fn assigned_roles(
    state: &UserApiState,
    realm: &Realm,
    user_id: Uuid,
) -> ApiResult<Vec<Role>> {
    let assigned = state.users.get_roles(realm.id, user_id).await?;
    let all = state.roles.list_realm_roles(realm.id).await?;
    Ok(all
        .into_iter()
        .filter(|r| assigned.contains(&r.id))
        .collect())
}

async fn record(state: &UserApiState, event: AuditEvent) {
    if let Err(err) = state.audit.log(event).await {
        tracing::warn!(error = %err, "failed to record audit event");
    }
}

// ============================================================================
// Realm Role Handlers
// ============================================================================

/// GET /{realm}/roles
pub async fn get_roles(
    State(state): State<UserApiState>,
    Path(realm_name): Path<String>,
) -> ApiResult<Json<Vec<RoleRepresentation>>> {
    let realm = resolve_realm(&state, &realm_name).await?;
    let roles = state.roles.list_realm_roles(realm.id).await?;
    Ok(Json(roles.into_iter().map(RoleRepresentation::from).collect()))
}

/// PUT /{realm}/roles
pub async fn update_roles(
    State(state): State<UserApiState>,
    auth: AuthContext,
    Path(realm_name): Path<String>,
    Json(request): Json<Vec<RoleRepresentation>>,
) -> ApiResult<impl IntoResponse> {
    validate_role_set(&request).map_err(ApiError::Validation)?;

    let realm = resolve_realm(&state, &realm_name).await?;
    let existing = state.roles.list_realm_roles(realm.id).await?;

    // Roles matched by name keep their identity; the rest are minted.
    let next: Vec<Role> = request
        .into_iter()
        .map(|rep| {
            let prev = existing.iter().find(|r| r.name == rep.name);
            rep.into_role(realm.id, prev)
        })
        .collect();
    let names: Vec<&str> = next.iter().map(|r| r.name.as_str()).collect();
    let names = names.join(",");

    state.roles.replace_realm_roles(realm.id, &next).await?;

    record(
        &state,
        AuditEvent::builder(AuditKind::RealmRolesReplaced)
            .realm(&realm.name)
            .actor(&auth)
            .detail("roles", names)
            .build(),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// User Handlers
// ============================================================================

/// GET /{realm}/users
pub async fn get_all(
    State(state): State<UserApiState>,
    Path(realm_name): Path<String>,
) -> ApiResult<Json<Vec<UserRepresentation>>> {
    let realm = resolve_realm(&state, &realm_name).await?;
    let users = state.users.list(realm.id).await?;
    Ok(Json(
        users
            .into_iter()
            .map(|u| UserRepresentation::new(&realm.name, u))
            .collect(),
    ))
}

/// GET /{realm}/{userId}
pub async fn get(
    State(state): State<UserApiState>,
    Path((realm_name, user_id)): Path<(String, Uuid)>,
) -> ApiResult<Json<UserRepresentation>> {
    let realm = resolve_realm(&state, &realm_name).await?;
    let user = resolve_user(&state, &realm, user_id).await?;
    Ok(Json(UserRepresentation::new(&realm.name, user)))
}

/// GET /user
pub async fn get_current(
    State(state): State<UserApiState>,
    auth: AuthContext,
) -> ApiResult<Json<UserRepresentation>> {
    let realm = resolve_realm(&state, &auth.realm).await?;
    let user = resolve_user(&state, &realm, auth.user_id).await?;
    Ok(Json(UserRepresentation::new(&realm.name, user)))
}

/// PUT /{realm}/users/{userId}
pub async fn update(
    State(state): State<UserApiState>,
    auth: AuthContext,
    Path((realm_name, user_id)): Path<(String, Uuid)>,
    Json(request): Json<UpdateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    request.validate().map_err(ApiError::Validation)?;

    let realm = resolve_realm(&state, &realm_name).await?;
    let mut user = resolve_user(&state, &realm, user_id).await?;

    if let Some(ref new_username) = request.username {
        if new_username != &user.username {
            if let Some(other) = state
                .users
                .get_by_username(realm.id, new_username)
                .await?
            {
                if other.id != user_id {
                    return Err(ApiError::conflict("User", "username", new_username));
                }
            }
        }
    }

    request.apply_to(&mut user);
    state.users.update(&user).await?;

    record(
        &state,
        AuditEvent::builder(AuditKind::UserUpdated)
            .realm(&realm.name)
            .actor(&auth)
            .target_id(user.id)
            .target_name(&user.username)
            .build(),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /{realm}/users
pub async fn create(
    State(state): State<UserApiState>,
    auth: AuthContext,
    Path(realm_name): Path<String>,
    Json(request): Json<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    request.validate().map_err(ApiError::Validation)?;

    let realm = resolve_realm(&state, &realm_name).await?;

    if state
        .users
        .get_by_username(realm.id, &request.username)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict("User", "username", &request.username));
    }

    let user = request.into_user(realm.id);
    let username = user.username.clone();
    state.users.create(&user).await.map_err(|e| {
        if e.is_duplicate() {
            ApiError::conflict("User", "username", &username)
        } else {
            ApiError::from(e)
        }
    })?;

    record(
        &state,
        AuditEvent::builder(AuditKind::UserCreated)
            .realm(&realm.name)
            .actor(&auth)
            .target_id(user.id)
            .target_name(&user.username)
            .build(),
    )
    .await;

    Ok((
        StatusCode::CREATED,
        [(
            header::LOCATION,
            format!("/user/{}/{}", realm.name, user.id),
        )],
        Json(UserRepresentation::new(&realm.name, user)),
    ))
}

/// DELETE /{realm}/users/{userId}
pub async fn delete(
    State(state): State<UserApiState>,
    auth: AuthContext,
    Path((realm_name, user_id)): Path<(String, Uuid)>,
) -> ApiResult<impl IntoResponse> {
    let realm = resolve_realm(&state, &realm_name).await?;
    let user = resolve_user(&state, &realm, user_id).await?;

    state.users.delete(realm.id, user_id).await?;

    record(
        &state,
        AuditEvent::builder(AuditKind::UserDeleted)
            .realm(&realm.name)
            .actor(&auth)
            .target_id(user.id)
            .target_name(&user.username)
            .build(),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Credential Handlers
// ============================================================================

/// PUT /{realm}/reset-password/{userId}
pub async fn reset_password(
    State(state): State<UserApiState>,
    auth: AuthContext,
    Path((realm_name, user_id)): Path<(String, Uuid)>,
    Json(request): Json<CredentialRequest>,
) -> ApiResult<impl IntoResponse> {
    request.validate().map_err(ApiError::Validation)?;

    let realm = resolve_realm(&state, &realm_name).await?;
    let user = resolve_user(&state, &realm, user_id).await?;

    let temporary = request.temporary;
    state
        .credentials
        .set_password(realm.id, user.id, &request.into_credential())
        .await?;

    // The credential value must never reach the audit trail.
    record(
        &state,
        AuditEvent::builder(AuditKind::PasswordReset)
            .realm(&realm.name)
            .actor(&auth)
            .target_id(user.id)
            .target_name(&user.username)
            .detail("temporary", temporary.to_string())
            .build(),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// User Role Handlers
// ============================================================================

/// GET /{realm}/userRoles/{userId}
pub async fn get_user_roles(
    State(state): State<UserApiState>,
    Path((realm_name, user_id)): Path<(String, Uuid)>,
) -> ApiResult<Json<Vec<RoleRepresentation>>> {
    let realm = resolve_realm(&state, &realm_name).await?;
    let user = resolve_user(&state, &realm, user_id).await?;
    let roles = assigned_roles(&state, &realm, user.id).await?;
    Ok(Json(roles.into_iter().map(RoleRepresentation::from).collect()))
}

/// GET /userRoles
pub async fn get_current_user_roles(
    State(state): State<UserApiState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<RoleRepresentation>>> {
    let realm = resolve_realm(&state, &auth.realm).await?;
    let user = resolve_user(&state, &realm, auth.user_id).await?;
    let roles = assigned_roles(&state, &realm, user.id).await?;
    Ok(Json(roles.into_iter().map(RoleRepresentation::from).collect()))
}

/// PUT /{realm}/userRoles/{userId}
pub async fn update_user_roles(
    State(state): State<UserApiState>,
    auth: AuthContext,
    Path((realm_name, user_id)): Path<(String, Uuid)>,
    Json(request): Json<Vec<RoleRepresentation>>,
) -> ApiResult<impl IntoResponse> {
    validate_role_set(&request).map_err(ApiError::Validation)?;

    let realm = resolve_realm(&state, &realm_name).await?;
    let user = resolve_user(&state, &realm, user_id).await?;

    // The assignment may only reference roles the realm already has.
    let mut role_ids = Vec::with_capacity(request.len());
    let mut names = Vec::with_capacity(request.len());
    for rep in &request {
        let role = state
            .roles
            .get_by_name(realm.id, &rep.name)
            .await?
            .ok_or_else(|| ApiError::Validation(format!("Unknown role: '{}'", rep.name)))?;
        role_ids.push(role.id);
        names.push(role.name);
    }

    state
        .users
        .replace_roles(realm.id, user.id, &role_ids)
        .await?;

    record(
        &state,
        AuditEvent::builder(AuditKind::UserRolesReplaced)
            .realm(&realm.name)
            .actor(&auth)
            .target_id(user.id)
            .target_name(&user.username)
            .detail("roles", names.join(","))
            .build(),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
