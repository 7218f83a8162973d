//! User storage provider trait.

use async_trait::async_trait;
use rg_model::User;
use uuid::Uuid;

use crate::error::StorageResult;

/// Provider for user storage operations.
///
/// Implementations must be thread-safe and support concurrent access.
/// All operations are scoped by realm; a user is never visible outside
/// the realm it belongs to.
#[async_trait]
pub trait UserProvider: Send + Sync {
    /// Creates a new user.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Duplicate` if a user with the same username
    /// exists in the realm.
    async fn create(&self, user: &User) -> StorageResult<()>;

    /// Updates an existing user.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the user doesn't exist.
    async fn update(&self, user: &User) -> StorageResult<()>;

    /// Deletes a user by ID, along with its role assignments and
    /// credentials.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the user doesn't exist.
    async fn delete(&self, realm_id: Uuid, id: Uuid) -> StorageResult<()>;

    /// Gets a user by ID.
    async fn get_by_id(&self, realm_id: Uuid, id: Uuid) -> StorageResult<Option<User>>;

    /// Gets a user by username.
    async fn get_by_username(&self, realm_id: Uuid, username: &str) -> StorageResult<Option<User>>;

    /// Lists all users of a realm.
    async fn list(&self, realm_id: Uuid) -> StorageResult<Vec<User>>;

    /// Gets the IDs of the roles assigned to a user.
    async fn get_roles(&self, realm_id: Uuid, user_id: Uuid) -> StorageResult<Vec<Uuid>>;

    /// Replaces the user's entire role assignment in a single atomic
    /// operation. Partial application is not a valid outcome.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the user doesn't exist.
    async fn replace_roles(
        &self,
        realm_id: Uuid,
        user_id: Uuid,
        role_ids: &[Uuid],
    ) -> StorageResult<()>;
}
