//! # rg-user-api
//!
//! The Realmgate user administration API.
//!
//! The HTTP contract is a single declarative table: [`ENDPOINTS`]
//! lists every operation with its method, path, required access level,
//! and success status. [`user_router`] consumes that table to build the
//! axum router, layering a per-endpoint access guard derived from the
//! declared access level. Handlers contain no authorization logic of
//! their own.
//!
//! ## Modules
//!
//! - [`auth`] - bearer-token authentication and capability checks
//! - [`audit`] - audit event logging for administrative mutations
//! - [`dto`] - wire representations for requests/responses
//! - [`endpoints`] - the endpoint table and the dispatcher
//! - [`error`] - error types and HTTP error responses
//! - [`handlers`] - the operation handlers
//! - [`state`] - application state (provider handles)
//!
//! ## Operations
//!
//! All paths are relative to the `/user` root the router is nested
//! under.
//!
//! | Method | Path | Access | Success |
//! |--------|------|--------|---------|
//! | GET | `/{realm}/roles` | write-admin | 200 |
//! | PUT | `/{realm}/roles` | write-admin | 204 |
//! | GET | `/{realm}/users` | authenticated | 200 |
//! | GET | `/{realm}/{userId}` | authenticated | 200 |
//! | GET | `/user` | authenticated | 200 |
//! | PUT | `/{realm}/users/{userId}` | write-admin | 204 |
//! | POST | `/{realm}/users` | write-admin | 201 |
//! | DELETE | `/{realm}/users/{userId}` | write-admin | 204 |
//! | PUT | `/{realm}/reset-password/{userId}` | write-admin | 204 |
//! | GET | `/{realm}/userRoles/{userId}` | authenticated | 200 |
//! | GET | `/userRoles` | authenticated | 200 |
//! | PUT | `/{realm}/userRoles/{userId}` | write-admin | 204 |

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod audit;
pub mod auth;
pub mod dto;
pub mod endpoints;
pub mod error;
pub mod handlers;
pub mod state;

pub use audit::{AuditEvent, AuditKind, AuditLogger, InMemoryAuditLogger, TracingAuditLogger};
pub use auth::{
    auth_middleware, AuthContext, AuthState, StaticTokenValidator, TokenValidator,
};
pub use endpoints::{user_router, Access, EndpointSpec, ENDPOINTS};
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use state::UserApiState;
