//! User DTOs.

use std::collections::HashMap;

use chrono::Utc;
use rg_model::User;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Username (required, unique within realm).
    pub username: String,
    /// Whether the user is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// User's email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Whether the email has been verified.
    #[serde(default)]
    pub email_verified: bool,
    /// User's first name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// User's last name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Custom user attributes.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, Vec<String>>,
}

fn default_enabled() -> bool {
    true
}

impl CreateUserRequest {
    /// Validates the payload.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violation found.
    pub fn validate(&self) -> Result<(), String> {
        validate_username(&self.username)?;
        if let Some(ref email) = self.email {
            validate_email(email)?;
        }
        Ok(())
    }

    /// Converts this request to a domain `User` model.
    #[must_use]
    pub fn into_user(self, realm_id: Uuid) -> User {
        let mut user = User::new(realm_id, self.username);
        user.enabled = self.enabled;
        user.email = self.email;
        user.email_verified = self.email_verified;
        user.first_name = self.first_name;
        user.last_name = self.last_name;
        user.attributes = self.attributes;
        user
    }
}

/// Request to update a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// Username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Whether the user is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// User's email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Whether the email has been verified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    /// User's first name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// User's last name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Custom user attributes (replaces existing).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<HashMap<String, Vec<String>>>,
}

impl UpdateUserRequest {
    /// Validates the payload.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violation found.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref username) = self.username {
            validate_username(username)?;
        }
        if let Some(ref email) = self.email {
            validate_email(email)?;
        }
        Ok(())
    }

    /// Applies this update to an existing user.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(ref v) = self.username {
            user.username = v.clone();
        }
        if let Some(v) = self.enabled {
            user.enabled = v;
        }
        if let Some(ref v) = self.email {
            user.email = Some(v.clone());
        }
        if let Some(v) = self.email_verified {
            user.email_verified = v;
        }
        if let Some(ref v) = self.first_name {
            user.first_name = Some(v.clone());
        }
        if let Some(ref v) = self.last_name {
            user.last_name = Some(v.clone());
        }
        if let Some(ref v) = self.attributes {
            user.attributes = v.clone();
        }
        user.updated_at = Utc::now();
    }
}

/// Full user representation for API responses.
///
/// Deliberately has no credential-bearing field; credentials are
/// write-only through this API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRepresentation {
    /// Unique identifier.
    pub id: Uuid,
    /// Realm the user belongs to.
    pub realm: String,
    /// Username.
    pub username: String,
    /// Whether the user is enabled.
    pub enabled: bool,
    /// User's email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Whether the email has been verified.
    pub email_verified: bool,
    /// User's first name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// User's last name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// When the user was created (milliseconds since epoch).
    pub created_timestamp: i64,
    /// Custom user attributes.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, Vec<String>>,
}

impl UserRepresentation {
    /// Builds a representation of a user in the named realm.
    #[must_use]
    pub fn new(realm: &str, user: User) -> Self {
        Self {
            id: user.id,
            realm: realm.to_string(),
            username: user.username,
            enabled: user.enabled,
            email: user.email,
            email_verified: user.email_verified,
            first_name: user.first_name,
            last_name: user.last_name,
            created_timestamp: user.created_at.timestamp_millis(),
            attributes: user.attributes,
        }
    }
}

/// Validates a username.
///
/// # Errors
///
/// Returns a description of the violation.
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username cannot be empty".to_string());
    }
    if username.len() > 255 {
        return Err("Username cannot exceed 255 characters".to_string());
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '@'))
    {
        return Err(format!("Username contains invalid characters: '{username}'"));
    }
    Ok(())
}

/// Validates an email address.
///
/// # Errors
///
/// Returns a description of the violation.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.len() > 320 {
        return Err("Email cannot exceed 320 characters".to_string());
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(format!("Invalid email address: '{email}'"));
    };
    if local.is_empty() || domain.is_empty() || email.chars().any(char::is_whitespace) {
        return Err(format!("Invalid email address: '{email}'"));
    }
    Ok(())
}
