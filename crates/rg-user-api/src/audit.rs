//! Audit event logging for administrative operations.
//!
//! Every successful administrative mutation emits a structured audit
//! event through an [`AuditLogger`]. Credential values never appear in
//! event details.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthContext;

/// Kinds of auditable administrative operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditKind {
    /// Realm role set replaced.
    RealmRolesReplaced,
    /// User created.
    UserCreated,
    /// User updated.
    UserUpdated,
    /// User deleted.
    UserDeleted,
    /// User password reset.
    PasswordReset,
    /// User role assignment replaced.
    UserRolesReplaced,
}

/// Outcome of an audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditOutcome {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Failure,
}

/// A structured audit record of an administrative operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event identifier.
    pub id: Uuid,
    /// Timestamp of the event.
    pub timestamp: DateTime<Utc>,
    /// Kind of operation.
    pub kind: AuditKind,
    /// Outcome of the operation.
    pub outcome: AuditOutcome,
    /// Realm name the operation targeted.
    pub realm: Option<String>,
    /// ID of the caller that performed the operation.
    pub actor_id: Option<Uuid>,
    /// Username of the caller.
    pub actor_username: Option<String>,
    /// ID of the affected entity.
    pub target_id: Option<Uuid>,
    /// Name of the affected entity.
    pub target_name: Option<String>,
    /// Error message (for failure events).
    pub error: Option<String>,
    /// Additional details as key-value pairs.
    pub details: Vec<(String, String)>,
}

impl AuditEvent {
    /// Creates a new event builder.
    #[must_use]
    pub const fn builder(kind: AuditKind) -> AuditEventBuilder {
        AuditEventBuilder::new(kind)
    }
}

/// Builder for audit events.
pub struct AuditEventBuilder {
    kind: AuditKind,
    outcome: AuditOutcome,
    realm: Option<String>,
    actor_id: Option<Uuid>,
    actor_username: Option<String>,
    target_id: Option<Uuid>,
    target_name: Option<String>,
    error: Option<String>,
    details: Vec<(String, String)>,
}

impl AuditEventBuilder {
    /// Creates a new builder.
    #[must_use]
    pub const fn new(kind: AuditKind) -> Self {
        Self {
            kind,
            outcome: AuditOutcome::Success,
            realm: None,
            actor_id: None,
            actor_username: None,
            target_id: None,
            target_name: None,
            error: None,
            details: Vec::new(),
        }
    }

    /// Sets the realm name.
    #[must_use]
    pub fn realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = Some(realm.into());
        self
    }

    /// Sets the actor from the caller's authentication context.
    #[must_use]
    pub fn actor(mut self, auth: &AuthContext) -> Self {
        self.actor_id = Some(auth.user_id);
        self.actor_username = Some(auth.username.clone());
        self
    }

    /// Sets the affected entity ID.
    #[must_use]
    pub const fn target_id(mut self, id: Uuid) -> Self {
        self.target_id = Some(id);
        self
    }

    /// Sets the affected entity name.
    #[must_use]
    pub fn target_name(mut self, name: impl Into<String>) -> Self {
        self.target_name = Some(name.into());
        self
    }

    /// Adds a detail key-value pair.
    #[must_use]
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.push((key.into(), value.into()));
        self
    }

    /// Sets the outcome to failure with an error message.
    #[must_use]
    pub fn failure(mut self, error: impl Into<String>) -> Self {
        self.outcome = AuditOutcome::Failure;
        self.error = Some(error.into());
        self
    }

    /// Builds the event.
    #[must_use]
    pub fn build(self) -> AuditEvent {
        AuditEvent {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            kind: self.kind,
            outcome: self.outcome,
            realm: self.realm,
            actor_id: self.actor_id,
            actor_username: self.actor_username,
            target_id: self.target_id,
            target_name: self.target_name,
            error: self.error,
            details: self.details,
        }
    }
}

/// Errors that can occur during audit logging.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// The audit sink rejected the event.
    #[error("Audit sink error: {0}")]
    Sink(String),
}

/// Trait for logging audit events.
///
/// Implementations can write to various destinations: the tracing
/// framework, a database, or a message queue.
#[async_trait::async_trait]
pub trait AuditLogger: Send + Sync {
    /// Logs an audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event could not be logged.
    async fn log(&self, event: AuditEvent) -> Result<(), AuditError>;
}

/// Audit logger that writes structured records to the tracing framework.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditLogger;

impl TracingAuditLogger {
    /// Creates a new tracing logger.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl AuditLogger for TracingAuditLogger {
    async fn log(&self, event: AuditEvent) -> Result<(), AuditError> {
        tracing::info!(
            event_id = %event.id,
            kind = ?event.kind,
            outcome = ?event.outcome,
            realm = ?event.realm,
            actor_id = ?event.actor_id,
            actor_username = ?event.actor_username,
            target_id = ?event.target_id,
            target_name = ?event.target_name,
            error = ?event.error,
            "audit_event"
        );
        Ok(())
    }
}

/// In-memory audit logger for testing.
#[derive(Debug, Default)]
pub struct InMemoryAuditLogger {
    events: parking_lot::RwLock<Vec<AuditEvent>>,
}

impl InMemoryAuditLogger {
    /// Creates a new in-memory logger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all logged events.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.read().clone()
    }

    /// Clears all logged events.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

#[async_trait::async_trait]
impl AuditLogger for InMemoryAuditLogger {
    async fn log(&self, event: AuditEvent) -> Result<(), AuditError> {
        self.events.write().push(event);
        Ok(())
    }
}
