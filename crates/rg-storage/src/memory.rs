//! In-memory reference store.
//!
//! Implements every provider trait over a single `RwLock`, which makes
//! the bulk replace operations trivially atomic: the whole swap happens
//! under one write lock. Used by the test suite and the default server
//! wiring; real deployments substitute their own providers.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use rg_model::{Credential, Realm, Role, User};
use uuid::Uuid;

use crate::credential::CredentialProvider;
use crate::error::{StorageError, StorageResult};
use crate::realm::RealmProvider;
use crate::role::RoleProvider;
use crate::user::UserProvider;

/// A stored password credential.
#[derive(Debug, Clone)]
struct StoredPassword {
    value: String,
    temporary: bool,
}

#[derive(Debug, Default)]
struct Inner {
    realms: HashMap<Uuid, Realm>,
    users: HashMap<Uuid, User>,
    roles: HashMap<Uuid, Role>,
    /// user id -> assigned role ids
    user_roles: HashMap<Uuid, Vec<Uuid>>,
    /// user id -> password
    passwords: HashMap<Uuid, StoredPassword>,
}

/// In-memory store implementing all provider traits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored password value for a user, if any.
    ///
    /// Test-support accessor; the API surface never reads credentials.
    #[must_use]
    pub fn password_value(&self, user_id: Uuid) -> Option<String> {
        self.inner
            .read()
            .passwords
            .get(&user_id)
            .map(|p| p.value.clone())
    }

    /// Returns whether the user's stored password is temporary.
    ///
    /// Test-support accessor; the API surface never reads credentials.
    #[must_use]
    pub fn password_is_temporary(&self, user_id: Uuid) -> Option<bool> {
        self.inner
            .read()
            .passwords
            .get(&user_id)
            .map(|p| p.temporary)
    }
}

#[async_trait]
impl RealmProvider for MemoryStore {
    async fn create(&self, realm: &Realm) -> StorageResult<()> {
        let mut inner = self.inner.write();
        if inner.realms.values().any(|r| r.name == realm.name) {
            return Err(StorageError::duplicate("Realm", "name", &realm.name));
        }
        inner.realms.insert(realm.id, realm.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> StorageResult<Option<Realm>> {
        Ok(self.inner.read().realms.get(&id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> StorageResult<Option<Realm>> {
        Ok(self
            .inner
            .read()
            .realms
            .values()
            .find(|r| r.name == name)
            .cloned())
    }

    async fn list(&self) -> StorageResult<Vec<Realm>> {
        let mut realms: Vec<Realm> = self.inner.read().realms.values().cloned().collect();
        realms.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(realms)
    }
}

#[async_trait]
impl UserProvider for MemoryStore {
    async fn create(&self, user: &User) -> StorageResult<()> {
        let mut inner = self.inner.write();
        if !inner.realms.contains_key(&user.realm_id) {
            return Err(StorageError::not_found("Realm", user.realm_id));
        }
        let duplicate = inner
            .users
            .values()
            .any(|u| u.realm_id == user.realm_id && u.username == user.username);
        if duplicate {
            return Err(StorageError::duplicate("User", "username", &user.username));
        }
        inner.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> StorageResult<()> {
        let mut inner = self.inner.write();
        match inner.users.get(&user.id) {
            Some(existing) if existing.realm_id == user.realm_id => {
                inner.users.insert(user.id, user.clone());
                Ok(())
            }
            _ => Err(StorageError::not_found("User", user.id)),
        }
    }

    async fn delete(&self, realm_id: Uuid, id: Uuid) -> StorageResult<()> {
        let mut inner = self.inner.write();
        match inner.users.get(&id) {
            Some(existing) if existing.realm_id == realm_id => {
                inner.users.remove(&id);
                inner.user_roles.remove(&id);
                inner.passwords.remove(&id);
                Ok(())
            }
            _ => Err(StorageError::not_found("User", id)),
        }
    }

    async fn get_by_id(&self, realm_id: Uuid, id: Uuid) -> StorageResult<Option<User>> {
        Ok(self
            .inner
            .read()
            .users
            .get(&id)
            .filter(|u| u.realm_id == realm_id)
            .cloned())
    }

    async fn get_by_username(&self, realm_id: Uuid, username: &str) -> StorageResult<Option<User>> {
        Ok(self
            .inner
            .read()
            .users
            .values()
            .find(|u| u.realm_id == realm_id && u.username == username)
            .cloned())
    }

    async fn list(&self, realm_id: Uuid) -> StorageResult<Vec<User>> {
        let mut users: Vec<User> = self
            .inner
            .read()
            .users
            .values()
            .filter(|u| u.realm_id == realm_id)
            .cloned()
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn get_roles(&self, realm_id: Uuid, user_id: Uuid) -> StorageResult<Vec<Uuid>> {
        let inner = self.inner.read();
        match inner.users.get(&user_id) {
            Some(user) if user.realm_id == realm_id => {
                Ok(inner.user_roles.get(&user_id).cloned().unwrap_or_default())
            }
            _ => Err(StorageError::not_found("User", user_id)),
        }
    }

    async fn replace_roles(
        &self,
        realm_id: Uuid,
        user_id: Uuid,
        role_ids: &[Uuid],
    ) -> StorageResult<()> {
        let mut inner = self.inner.write();
        match inner.users.get(&user_id) {
            Some(user) if user.realm_id == realm_id => {}
            _ => return Err(StorageError::not_found("User", user_id)),
        }
        // Cross-realm role references are never valid.
        for role_id in role_ids {
            match inner.roles.get(role_id) {
                Some(role) if role.realm_id == realm_id => {}
                _ => {
                    return Err(StorageError::InvalidData(format!(
                        "role {role_id} does not belong to the realm"
                    )));
                }
            }
        }
        inner.user_roles.insert(user_id, role_ids.to_vec());
        Ok(())
    }
}

#[async_trait]
impl RoleProvider for MemoryStore {
    async fn list_realm_roles(&self, realm_id: Uuid) -> StorageResult<Vec<Role>> {
        let mut roles: Vec<Role> = self
            .inner
            .read()
            .roles
            .values()
            .filter(|r| r.realm_id == realm_id)
            .cloned()
            .collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn replace_realm_roles(&self, realm_id: Uuid, roles: &[Role]) -> StorageResult<()> {
        for role in roles {
            if role.realm_id != realm_id {
                return Err(StorageError::InvalidData(format!(
                    "role '{}' does not belong to the realm",
                    role.name
                )));
            }
        }
        let mut inner = self.inner.write();
        if !inner.realms.contains_key(&realm_id) {
            return Err(StorageError::not_found("Realm", realm_id));
        }
        inner.roles.retain(|_, r| r.realm_id != realm_id);
        for role in roles {
            inner.roles.insert(role.id, role.clone());
        }
        // Assignments referencing removed roles are stale; drop them.
        let live: Vec<Uuid> = roles.iter().map(|r| r.id).collect();
        for assigned in inner.user_roles.values_mut() {
            assigned.retain(|id| live.contains(id));
        }
        Ok(())
    }

    async fn get_by_id(&self, realm_id: Uuid, id: Uuid) -> StorageResult<Option<Role>> {
        Ok(self
            .inner
            .read()
            .roles
            .get(&id)
            .filter(|r| r.realm_id == realm_id)
            .cloned())
    }

    async fn get_by_name(&self, realm_id: Uuid, name: &str) -> StorageResult<Option<Role>> {
        Ok(self
            .inner
            .read()
            .roles
            .values()
            .find(|r| r.realm_id == realm_id && r.name == name)
            .cloned())
    }
}

#[async_trait]
impl CredentialProvider for MemoryStore {
    async fn set_password(
        &self,
        realm_id: Uuid,
        user_id: Uuid,
        credential: &Credential,
    ) -> StorageResult<()> {
        let mut inner = self.inner.write();
        match inner.users.get(&user_id) {
            Some(user) if user.realm_id == realm_id => {}
            _ => return Err(StorageError::not_found("User", user_id)),
        }
        inner.passwords.insert(
            user_id,
            StoredPassword {
                value: credential.value.clone(),
                temporary: credential.temporary,
            },
        );
        Ok(())
    }

    async fn has_password(&self, realm_id: Uuid, user_id: Uuid) -> StorageResult<bool> {
        let inner = self.inner.read();
        match inner.users.get(&user_id) {
            Some(user) if user.realm_id == realm_id => {
                Ok(inner.passwords.contains_key(&user_id))
            }
            _ => Err(StorageError::not_found("User", user_id)),
        }
    }
}
