//! In-memory user storage

use crate::error::{Error, Result};
use crate::service::UserService;
use crate::user::{ListFilter, User, UserPatch, generate_user_id};
use crate::validation::{validate_patch, validate_user};
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory user store
///
/// Reads share the lock; every mutation takes it exclusively. Nothing is
/// persisted, so a restart starts from an empty store.
pub struct UserStore {
    /// Users indexed by id
    users: RwLock<HashMap<String, User>>,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    /// Create a new empty user store
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.users.read().len()
    }
}

impl UserService for UserStore {
    fn get_user(&self, id: &str) -> Result<User> {
        self.users
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn create_user(&self, mut user: User) -> Result<User> {
        validate_user(&user)?;

        let mut users = self.users.write();
        let mut id = generate_user_id();
        while users.contains_key(&id) {
            id = generate_user_id();
        }
        user.id = id;
        users.insert(user.id.clone(), user.clone());

        Ok(user)
    }

    fn update_user(&self, user: User) -> Result<User> {
        let mut users = self.users.write();
        let stored = users
            .get_mut(&user.id)
            .ok_or_else(|| Error::NotFound(user.id.clone()))?;
        validate_user(&user)?;

        stored.name = user.name;
        stored.email = user.email;
        stored.age = user.age;

        Ok(stored.clone())
    }

    fn patch_user(&self, patch: UserPatch) -> Result<User> {
        if patch.is_empty() {
            return self.get_user(&patch.id);
        }

        let mut users = self.users.write();
        let stored = users
            .get_mut(&patch.id)
            .ok_or_else(|| Error::NotFound(patch.id.clone()))?;
        validate_patch(&patch)?;

        if let Some(name) = patch.name {
            stored.name = name;
        }
        if let Some(email) = patch.email {
            stored.email = email;
        }
        if let Some(age) = patch.age {
            stored.age = age;
        }

        Ok(stored.clone())
    }

    fn delete_user(&self, id: &str) -> Result<()> {
        self.users
            .write()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn list_users(&self, filter: &ListFilter) -> Vec<User> {
        self.users
            .read()
            .values()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect()
    }
}
