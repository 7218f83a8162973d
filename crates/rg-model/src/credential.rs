//! Credential domain model.
//!
//! A credential is a secret delivered to the credential store through
//! the reset-password operation. It is strictly write-only: the type
//! deliberately implements `Deserialize` but not `Serialize`, so a
//! credential can never end up in a response body, and its `Debug`
//! output redacts the value so it can never end up in a log line.

use std::fmt;

use serde::Deserialize;

/// A password credential.
#[derive(Clone, Deserialize)]
pub struct Credential {
    /// The secret value.
    pub value: String,
    /// Whether the user must change the password on next login.
    #[serde(default)]
    pub temporary: bool,
}

impl Credential {
    /// Creates a new permanent credential.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            temporary: false,
        }
    }

    /// Marks the credential as temporary.
    #[must_use]
    pub const fn with_temporary(mut self, temporary: bool) -> Self {
        self.temporary = temporary;
        self
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("value", &"<redacted>")
            .field("temporary", &self.temporary)
            .finish()
    }
}
