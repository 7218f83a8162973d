//! Role domain model.
//!
//! Roles are named permission groupings within a realm. They can be
//! assigned to users individually and may include other roles of the
//! same realm (composite roles).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A realm role.
///
/// Role names are unique within a realm. A role never references
/// entities outside its own realm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    // === Identity ===
    /// Unique identifier.
    pub id: Uuid,
    /// Role name (unique within the realm).
    pub name: String,
    /// Role description.
    pub description: Option<String>,

    // === Scope ===
    /// Realm this role belongs to.
    pub realm_id: Uuid,

    // === Timestamps ===
    /// When the role was created.
    pub created_at: DateTime<Utc>,
    /// When the role was last updated.
    pub updated_at: DateTime<Utc>,

    // === Composite Roles ===
    /// IDs of roles included in this role.
    pub composite_role_ids: Vec<Uuid>,
}

impl Role {
    /// Creates a new realm role.
    #[must_use]
    pub fn new(realm_id: Uuid, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            description: None,
            realm_id,
            created_at: now,
            updated_at: now,
            composite_role_ids: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Adds an included role.
    #[must_use]
    pub fn with_composite(mut self, role_id: Uuid) -> Self {
        self.composite_role_ids.push(role_id);
        self
    }

    /// Checks if this role includes other roles.
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        !self.composite_role_ids.is_empty()
    }
}

/// Well-known capability names.
pub mod capabilities {
    /// Capability required for mutating and administrative operations.
    pub const WRITE_ADMIN: &str = "write:admin";
    /// Capability granting read access across realms.
    pub const READ_ADMIN: &str = "read:admin";
}
