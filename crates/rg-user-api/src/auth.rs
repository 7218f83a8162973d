//! Authentication and capability checks for the user administration API.
//!
//! The API receives authorization out-of-band as a bearer token. A
//! middleware layer validates the token through a [`TokenValidator`]
//! (the authorization collaborator) and injects an [`AuthContext`] into
//! the request; the per-endpoint access guard then checks the context
//! against the capability the endpoint table declares.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use rg_model::realm::MASTER_REALM;
use rg_model::role::capabilities;
use uuid::Uuid;

use crate::error::ApiError;

// ============================================================================
// Authentication Context
// ============================================================================

/// Authenticated caller context.
///
/// Extracted from the bearer token and made available to handlers.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// User ID from the token.
    pub user_id: Uuid,
    /// Username.
    pub username: String,
    /// Realm the caller belongs to.
    pub realm: String,
    /// Capabilities granted to the caller.
    pub capabilities: Vec<String>,
    /// Raw token (for forwarding to other services).
    pub token: String,
}

impl AuthContext {
    /// Checks if the caller holds a specific capability.
    #[must_use]
    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }

    /// Checks if the caller may perform administrative writes in the
    /// given realm.
    ///
    /// The write-admin capability applies to the caller's own realm;
    /// held from the master realm it applies everywhere.
    #[must_use]
    pub fn can_write_admin(&self, target_realm: &str) -> bool {
        self.has_capability(capabilities::WRITE_ADMIN)
            && (self.realm == target_realm || self.realm == MASTER_REALM)
    }

    /// Checks if the caller may read user and role data of the given
    /// realm.
    ///
    /// Authenticated callers read their own realm; cross-realm reads
    /// require an administrative capability held from the master realm.
    #[must_use]
    pub fn can_read_realm(&self, target_realm: &str) -> bool {
        self.realm == target_realm
            || self.can_write_admin(target_realm)
            || (self.realm == MASTER_REALM && self.has_capability(capabilities::READ_ADMIN))
    }

    /// Ensures the caller may perform administrative writes in the
    /// given realm.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Forbidden` if the caller lacks the capability.
    pub fn require_write_admin(&self, target_realm: &str) -> Result<(), ApiError> {
        if self.can_write_admin(target_realm) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(format!(
                "Missing required capability: {}",
                capabilities::WRITE_ADMIN
            )))
        }
    }
}

// ============================================================================
// Token Validator Trait
// ============================================================================

/// Trait for validating bearer tokens.
///
/// This is the authorization collaborator seam. Implementations verify
/// the token and produce the caller's identity and capabilities.
#[allow(async_fn_in_trait)]
pub trait TokenValidator: Send + Sync {
    /// Validates a bearer token and extracts the caller context.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is invalid or expired.
    async fn validate(&self, token: &str) -> Result<AuthContext, ApiError>;
}

/// Simple in-memory token validator.
///
/// Maps opaque tokens to predefined contexts. Used by tests and the
/// default server wiring; production deployments substitute a validator
/// backed by their token infrastructure.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenValidator {
    valid_tokens: std::collections::HashMap<String, AuthContext>,
}

impl StaticTokenValidator {
    /// Creates a new empty validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a valid token.
    pub fn add_token(&mut self, token: impl Into<String>, context: AuthContext) {
        self.valid_tokens.insert(token.into(), context);
    }
}

impl TokenValidator for StaticTokenValidator {
    async fn validate(&self, token: &str) -> Result<AuthContext, ApiError> {
        self.valid_tokens
            .get(token)
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}

// ============================================================================
// Axum Middleware
// ============================================================================

/// Shared state for the authentication middleware.
#[derive(Clone)]
pub struct AuthState<V: TokenValidator> {
    /// Token validator implementation.
    pub validator: Arc<V>,
}

impl<V: TokenValidator> AuthState<V> {
    /// Creates a new auth state with the given validator.
    pub fn new(validator: V) -> Self {
        Self {
            validator: Arc::new(validator),
        }
    }
}

/// Authentication middleware that validates bearer tokens.
///
/// Extracts the `Authorization: Bearer <token>` header, validates it,
/// and injects [`AuthContext`] into the request extensions.
pub async fn auth_middleware<V: TokenValidator + 'static>(
    State(state): State<AuthState<V>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_bearer_token(&request) else {
        return (
            StatusCode::UNAUTHORIZED,
            [("WWW-Authenticate", "Bearer")],
            "Missing or invalid Authorization header",
        )
            .into_response();
    };

    match state.validator.validate(&token).await {
        Ok(context) => {
            request.extensions_mut().insert(context);
            next.run(request).await
        }
        Err(err) => err.into_response(),
    }
}

/// Extracts the bearer token from the request.
fn extract_bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(String::from)
}

// ============================================================================
// Extractor Implementation
// ============================================================================

/// Axum extractor for [`AuthContext`].
///
/// Use this in handler functions that need the caller's identity:
///
/// ```ignore
/// async fn handler(auth: AuthContext) -> impl IntoResponse {
///     // auth.user_id, auth.realm, etc.
/// }
/// ```
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or((StatusCode::UNAUTHORIZED, "Not authenticated"))
    }
}
