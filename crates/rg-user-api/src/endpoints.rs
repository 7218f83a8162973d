//! The endpoint table and its dispatcher.
//!
//! The HTTP contract lives in one place: [`ENDPOINTS`], a const table
//! of `{operation, method, path, access, success}` records.
//! [`user_router`] consumes the table to build the router, layering an
//! access guard on every route that enforces the declared access level
//! before the handler runs. Adding an operation means adding a table
//! entry; nothing else grants or checks permissions.

use axum::{
    extract::Request,
    middleware::{from_fn, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put, MethodRouter},
    Router,
};
use rg_model::role::capabilities;

use crate::auth::AuthContext;
use crate::error::ApiError;
use crate::handlers;
use crate::state::UserApiState;

/// Access level an endpoint requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Any authenticated caller; realm-scoped paths are further limited
    /// to the caller's own realm.
    Authenticated,
    /// The realm's write-admin capability.
    WriteAdmin,
}

/// A single entry of the endpoint table.
///
/// Paths are relative to the `/user` root the router is nested under.
pub struct EndpointSpec {
    /// Operation name from the contract.
    pub operation: &'static str,
    /// HTTP method.
    pub method: &'static str,
    /// Route path.
    pub path: &'static str,
    /// Required access level.
    pub access: Access,
    /// Status code a successful call answers with.
    pub success: u16,
    handler: fn() -> MethodRouter<UserApiState>,
}

fn bind_get_roles() -> MethodRouter<UserApiState> {
    get(handlers::get_roles)
}
fn bind_update_roles() -> MethodRouter<UserApiState> {
    put(handlers::update_roles)
}
fn bind_get_all() -> MethodRouter<UserApiState> {
    get(handlers::get_all)
}
fn bind_get() -> MethodRouter<UserApiState> {
    get(handlers::get)
}
fn bind_get_current() -> MethodRouter<UserApiState> {
    get(handlers::get_current)
}
fn bind_update() -> MethodRouter<UserApiState> {
    put(handlers::update)
}
fn bind_create() -> MethodRouter<UserApiState> {
    post(handlers::create)
}
fn bind_delete() -> MethodRouter<UserApiState> {
    delete(handlers::delete)
}
fn bind_reset_password() -> MethodRouter<UserApiState> {
    put(handlers::reset_password)
}
fn bind_get_user_roles() -> MethodRouter<UserApiState> {
    get(handlers::get_user_roles)
}
fn bind_get_current_user_roles() -> MethodRouter<UserApiState> {
    get(handlers::get_current_user_roles)
}
fn bind_update_user_roles() -> MethodRouter<UserApiState> {
    put(handlers::update_user_roles)
}

/// The complete endpoint table of the user administration API.
pub const ENDPOINTS: &[EndpointSpec] = &[
    EndpointSpec {
        operation: "getRoles",
        method: "GET",
        path: "/{realm}/roles",
        access: Access::WriteAdmin,
        success: 200,
        handler: bind_get_roles,
    },
    EndpointSpec {
        operation: "updateRoles",
        method: "PUT",
        path: "/{realm}/roles",
        access: Access::WriteAdmin,
        success: 204,
        handler: bind_update_roles,
    },
    EndpointSpec {
        operation: "getAll",
        method: "GET",
        path: "/{realm}/users",
        access: Access::Authenticated,
        success: 200,
        handler: bind_get_all,
    },
    EndpointSpec {
        operation: "get",
        method: "GET",
        path: "/{realm}/{userId}",
        access: Access::Authenticated,
        success: 200,
        handler: bind_get,
    },
    EndpointSpec {
        operation: "getCurrent",
        method: "GET",
        path: "/user",
        access: Access::Authenticated,
        success: 200,
        handler: bind_get_current,
    },
    EndpointSpec {
        operation: "update",
        method: "PUT",
        path: "/{realm}/users/{userId}",
        access: Access::WriteAdmin,
        success: 204,
        handler: bind_update,
    },
    EndpointSpec {
        operation: "create",
        method: "POST",
        path: "/{realm}/users",
        access: Access::WriteAdmin,
        success: 201,
        handler: bind_create,
    },
    EndpointSpec {
        operation: "delete",
        method: "DELETE",
        path: "/{realm}/users/{userId}",
        access: Access::WriteAdmin,
        success: 204,
        handler: bind_delete,
    },
    EndpointSpec {
        operation: "resetPassword",
        method: "PUT",
        path: "/{realm}/reset-password/{userId}",
        access: Access::WriteAdmin,
        success: 204,
        handler: bind_reset_password,
    },
    EndpointSpec {
        operation: "getUserRoles",
        method: "GET",
        path: "/{realm}/userRoles/{userId}",
        access: Access::Authenticated,
        success: 200,
        handler: bind_get_user_roles,
    },
    EndpointSpec {
        operation: "getCurrentUserRoles",
        method: "GET",
        path: "/userRoles",
        access: Access::Authenticated,
        success: 200,
        handler: bind_get_current_user_roles,
    },
    EndpointSpec {
        operation: "updateUserRoles",
        method: "PUT",
        path: "/{realm}/userRoles/{userId}",
        access: Access::WriteAdmin,
        success: 204,
        handler: bind_update_user_roles,
    },
];

impl EndpointSpec {
    /// Binds the operation's handler with its access guard.
    fn bind(&'static self) -> MethodRouter<UserApiState> {
        (self.handler)().layer(from_fn(move |request: Request, next: Next| {
            access_guard(self, request, next)
        }))
    }
}

/// Enforces the access level an endpoint declares.
///
/// Runs after the authentication middleware, which injects the
/// [`AuthContext`]; a missing context means the request never passed
/// authentication.
async fn access_guard(spec: &'static EndpointSpec, request: Request, next: Next) -> Response {
    let Some(auth) = request.extensions().get::<AuthContext>().cloned() else {
        return ApiError::Unauthorized.into_response();
    };

    let target_realm = extract_target_realm(request.uri().path());
    let allowed = match (spec.access, target_realm.as_deref()) {
        (Access::WriteAdmin, Some(realm)) => auth.can_write_admin(realm),
        // Every write-admin operation is realm-scoped by construction.
        (Access::WriteAdmin, None) => false,
        (Access::Authenticated, Some(realm)) => auth.can_read_realm(realm),
        (Access::Authenticated, None) => true,
    };

    if allowed {
        next.run(request).await
    } else {
        let denial = match spec.access {
            Access::WriteAdmin => format!(
                "Missing required capability: {}",
                capabilities::WRITE_ADMIN
            ),
            Access::Authenticated => "Caller realm does not match the target realm".to_string(),
        };
        ApiError::Forbidden(denial).into_response()
    }
}

/// Extracts the target realm from a request path.
///
/// Paths are relative to the `/user` nest. The current-caller
/// endpoints (`/user`, `/userRoles`) have no realm segment; everything
/// else starts with one. Those two segment names are reserved and
/// cannot be used as realm names.
fn extract_target_realm(path: &str) -> Option<String> {
    let mut parts = path.split('/').filter(|s| !s.is_empty());
    let first = parts.next()?;
    match (first, parts.next()) {
        ("user" | "userRoles", None) => None,
        _ => Some(first.to_string()),
    }
}

/// Builds the user administration router from the endpoint table.
///
/// Nest the result under the `/user` root and layer the authentication
/// middleware on top:
///
/// ```ignore
/// let api = user_router()
///     .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
///     .with_state(api_state);
/// let app = Router::new().nest("/user", api);
/// ```
pub fn user_router() -> Router<UserApiState> {
    let mut router = Router::new();
    for spec in ENDPOINTS {
        router = router.route(spec.path, spec.bind());
    }
    router
}
