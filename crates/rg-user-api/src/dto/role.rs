//! Role DTOs.

use chrono::Utc;
use rg_model::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role representation for API requests and responses.
///
/// The same shape serves as the element type of the bulk replace
/// payloads: `PUT {realm}/roles` and `PUT {realm}/userRoles/{userId}`
/// both take an array of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRepresentation {
    /// Unique identifier (absent for roles that don't exist yet).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Role name.
    pub name: String,
    /// Role description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether this role includes other roles.
    #[serde(default)]
    pub composite: bool,
}

impl RoleRepresentation {
    /// Converts this representation to a domain role.
    ///
    /// When a role of the same name already exists in the realm its
    /// identity is preserved and the mutable fields are updated;
    /// otherwise a new role is minted.
    #[must_use]
    pub fn into_role(self, realm_id: Uuid, existing: Option<&Role>) -> Role {
        match existing {
            Some(prev) => {
                let mut role = prev.clone();
                role.description = self.description;
                role.updated_at = Utc::now();
                role
            }
            None => {
                let mut role = Role::new(realm_id, self.name);
                role.description = self.description;
                role
            }
        }
    }
}

impl From<Role> for RoleRepresentation {
    fn from(role: Role) -> Self {
        let composite = role.is_composite();
        Self {
            id: Some(role.id),
            name: role.name,
            description: role.description,
            composite,
        }
    }
}

/// Validates a role set payload.
///
/// # Errors
///
/// Returns a description of the first violation found: an empty or
/// malformed role name, or a name appearing twice in the payload.
pub fn validate_role_set(roles: &[RoleRepresentation]) -> Result<(), String> {
    for (i, role) in roles.iter().enumerate() {
        if role.name.is_empty() {
            return Err("Role name cannot be empty".to_string());
        }
        if role.name.len() > 255 {
            return Err("Role name cannot exceed 255 characters".to_string());
        }
        if roles[..i].iter().any(|r| r.name == role.name) {
            return Err(format!("Duplicate role name in payload: '{}'", role.name));
        }
    }
    Ok(())
}
