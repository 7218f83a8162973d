//! Credential storage provider trait.

use async_trait::async_trait;
use rg_model::Credential;
use uuid::Uuid;

use crate::error::StorageResult;

/// Provider for credential storage operations.
///
/// Implementations must be thread-safe and support concurrent access.
///
/// ## Security Note
///
/// Credential values are sensitive. Implementations must ensure they
/// are never logged; hashing and policy enforcement are the backing
/// store's concern.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Sets the user's password, replacing any existing one.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the user doesn't exist.
    async fn set_password(
        &self,
        realm_id: Uuid,
        user_id: Uuid,
        credential: &Credential,
    ) -> StorageResult<()>;

    /// Checks if the user has a password set.
    async fn has_password(&self, realm_id: Uuid, user_id: Uuid) -> StorageResult<bool>;
}
