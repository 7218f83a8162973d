//! # rg-storage
//!
//! Storage abstraction for Realmgate.
//!
//! This crate defines the provider interfaces behind which the actual
//! user store lives. The administration API only ever talks to these
//! traits; a deployment backs them with whatever store it has.
//!
//! ## Provider Traits
//!
//! - [`RealmProvider`] - realm resolution
//! - [`UserProvider`] - user records and per-user role assignment
//! - [`RoleProvider`] - the realm-level role set
//! - [`CredentialProvider`] - write-only password storage
//!
//! [`MemoryStore`] implements all four providers in-process and is used
//! by the test suite and the default server wiring.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod credential;
pub mod error;
pub mod memory;
pub mod realm;
pub mod role;
pub mod user;

pub use credential::CredentialProvider;
pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use realm::RealmProvider;
pub use role::RoleProvider;
pub use user::UserProvider;
