//! Realm domain model.
//!
//! A realm is the tenant boundary: each realm manages its own users and
//! roles in complete isolation from every other realm.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the administrative realm.
///
/// Callers holding the write-admin capability in this realm may
/// administer any realm.
pub const MASTER_REALM: &str = "master";

/// A tenant realm.
///
/// Realms are provisioned out-of-band; the user administration API
/// only resolves them by name to scope user and role operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Realm {
    /// Unique identifier.
    pub id: Uuid,
    /// Unique realm name (used in URL paths).
    pub name: String,
    /// Display name for UIs.
    pub display_name: Option<String>,
    /// Whether the realm is enabled.
    pub enabled: bool,
    /// When the realm was created.
    pub created_at: DateTime<Utc>,
    /// When the realm was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Realm {
    /// Creates a new enabled realm with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            display_name: None,
            enabled: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Sets whether the realm is enabled.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Checks if this is the administrative realm.
    #[must_use]
    pub fn is_master(&self) -> bool {
        self.name == MASTER_REALM
    }
}
