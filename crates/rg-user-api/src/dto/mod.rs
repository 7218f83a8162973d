//! Data Transfer Objects for the user administration API.
//!
//! Wire types use camelCase field names. Requests are validated before
//! any store call; representations never carry credential data.

pub mod credential;
pub mod role;
pub mod user;

pub use credential::CredentialRequest;
pub use role::{validate_role_set, RoleRepresentation};
pub use user::{CreateUserRequest, UpdateUserRequest, UserRepresentation};
