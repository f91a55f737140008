//! User service operation contract
//!
//! The store and every decorator implement [`UserService`], so decorators
//! can be stacked in any order at construction time.

use crate::error::Result;
use crate::user::{ListFilter, User, UserPatch};
use std::sync::Arc;

/// Operations on the user collection
pub trait UserService: Send + Sync {
    /// Get a user by ID
    fn get_user(&self, id: &str) -> Result<User>;

    /// Validate and store a new user, returning it with its assigned ID
    fn create_user(&self, user: User) -> Result<User>;

    /// Replace an existing user; the stored ID is kept
    fn update_user(&self, user: User) -> Result<User>;

    /// Apply the fields present in `patch` to an existing user
    fn patch_user(&self, patch: UserPatch) -> Result<User>;

    /// Remove a user
    fn delete_user(&self, id: &str) -> Result<()>;

    /// List users matching `filter`, in no particular order
    fn list_users(&self, filter: &ListFilter) -> Vec<User>;
}

impl<S: UserService + ?Sized> UserService for Arc<S> {
    fn get_user(&self, id: &str) -> Result<User> {
        (**self).get_user(id)
    }

    fn create_user(&self, user: User) -> Result<User> {
        (**self).create_user(user)
    }

    fn update_user(&self, user: User) -> Result<User> {
        (**self).update_user(user)
    }

    fn patch_user(&self, patch: UserPatch) -> Result<User> {
        (**self).patch_user(patch)
    }

    fn delete_user(&self, id: &str) -> Result<()> {
        (**self).delete_user(id)
    }

    fn list_users(&self, filter: &ListFilter) -> Vec<User> {
        (**self).list_users(filter)
    }
}
