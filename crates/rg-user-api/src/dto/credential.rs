//! Credential DTOs.

use std::fmt;

use rg_model::Credential;
use serde::Deserialize;

/// Request body of the reset-password operation.
///
/// Deserialize-only: the type has no `Serialize` implementation, so a
/// credential can never be echoed back in a response, and its `Debug`
/// output redacts the value.
#[derive(Clone, Deserialize)]
pub struct CredentialRequest {
    /// The new password value.
    pub value: String,
    /// Whether the user must change the password on next login.
    #[serde(default)]
    pub temporary: bool,
}

impl CredentialRequest {
    /// Validates the payload.
    ///
    /// # Errors
    ///
    /// Returns a description of the violation. Password policy beyond
    /// basic shape is the credential store's concern.
    pub fn validate(&self) -> Result<(), String> {
        if self.value.is_empty() {
            return Err("Credential value cannot be empty".to_string());
        }
        Ok(())
    }

    /// Converts this request to a domain credential.
    #[must_use]
    pub fn into_credential(self) -> Credential {
        Credential::new(self.value).with_temporary(self.temporary)
    }
}

impl fmt::Debug for CredentialRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRequest")
            .field("value", &"<redacted>")
            .field("temporary", &self.temporary)
            .finish()
    }
}
