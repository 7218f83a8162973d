//! Role storage provider trait.

use async_trait::async_trait;
use rg_model::Role;
use uuid::Uuid;

use crate::error::StorageResult;

/// Provider for role storage operations.
///
/// Implementations must be thread-safe and support concurrent access.
#[async_trait]
pub trait RoleProvider: Send + Sync {
    /// Lists all roles of a realm.
    async fn list_realm_roles(&self, realm_id: Uuid) -> StorageResult<Vec<Role>>;

    /// Replaces the realm's entire role set in a single atomic
    /// operation. Roles absent from the new set are removed, together
    /// with any user assignments that reference them. Partial
    /// application is not a valid outcome.
    async fn replace_realm_roles(&self, realm_id: Uuid, roles: &[Role]) -> StorageResult<()>;

    /// Gets a role by ID.
    async fn get_by_id(&self, realm_id: Uuid, id: Uuid) -> StorageResult<Option<Role>>;

    /// Gets a role by name.
    async fn get_by_name(&self, realm_id: Uuid, name: &str) -> StorageResult<Option<Role>>;
}
