//! API state management.
//!
//! The state carries the collaborator provider handles as trait
//! objects so the endpoint table can name one concrete state type.

use std::sync::Arc;

use rg_storage::{
    CredentialProvider, MemoryStore, RealmProvider, RoleProvider, UserProvider,
};

use crate::audit::{AuditLogger, TracingAuditLogger};

/// User administration API state.
///
/// Holds the storage providers and the audit logger. Cloning is cheap;
/// all handles are `Arc`s.
#[derive(Clone)]
pub struct UserApiState {
    /// Realm storage provider.
    pub realms: Arc<dyn RealmProvider>,
    /// User storage provider.
    pub users: Arc<dyn UserProvider>,
    /// Role storage provider.
    pub roles: Arc<dyn RoleProvider>,
    /// Credential storage provider.
    pub credentials: Arc<dyn CredentialProvider>,
    /// Audit event logger.
    pub audit: Arc<dyn AuditLogger>,
}

impl UserApiState {
    /// Creates a new state with the given providers and a tracing
    /// audit logger.
    pub fn new(
        realms: Arc<dyn RealmProvider>,
        users: Arc<dyn UserProvider>,
        roles: Arc<dyn RoleProvider>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            realms,
            users,
            roles,
            credentials,
            audit: Arc::new(TracingAuditLogger::new()),
        }
    }

    /// Creates a state backed entirely by one in-memory store.
    #[must_use]
    pub fn from_store(store: Arc<MemoryStore>) -> Self {
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store,
        )
    }

    /// Replaces the audit logger.
    #[must_use]
    pub fn with_audit_logger(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }
}
