//! # rg-model
//!
//! Domain models for Realmgate (Realm, User, Role, Credential).
//!
//! This crate defines the core entities managed by the user
//! administration service. Everything is scoped to a realm: a user or
//! role belongs to exactly one realm and is only ever resolved through
//! that realm.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod credential;
pub mod realm;
pub mod role;
pub mod user;

pub use credential::Credential;
pub use realm::Realm;
pub use role::Role;
pub use user::User;
