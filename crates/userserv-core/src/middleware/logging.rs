//! Structured logging decorator

use crate::error::Result;
use crate::service::UserService;
use crate::user::{ListFilter, User, UserPatch};
use std::time::Instant;
use tracing::{info, warn};

/// Logs one structured event per call, then returns the inner result unchanged
pub struct LoggingMiddleware<S> {
    next: S,
}

impl<S: UserService> LoggingMiddleware<S> {
    pub fn new(next: S) -> Self {
        Self { next }
    }
}

fn elapsed_us(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX)
}

fn log_result<T>(method: &'static str, id: &str, result: &Result<T>, start: Instant) {
    let took_us = elapsed_us(start);
    match result {
        Ok(_) => info!(method, id, took_us, "request completed"),
        Err(e) => warn!(
            method,
            id,
            error = %e,
            kind = %e.kind(),
            took_us,
            "request failed"
        ),
    }
}

impl<S: UserService> UserService for LoggingMiddleware<S> {
    fn get_user(&self, id: &str) -> Result<User> {
        let start = Instant::now();
        let result = self.next.get_user(id);
        log_result("GetUser", id, &result, start);
        result
    }

    fn create_user(&self, user: User) -> Result<User> {
        let start = Instant::now();
        let name = user.name.clone();
        let result = self.next.create_user(user);
        let took_us = elapsed_us(start);
        match &result {
            Ok(created) => info!(
                method = "CreateUser",
                id = %created.id,
                name = %name,
                took_us,
                "request completed"
            ),
            Err(e) => warn!(
                method = "CreateUser",
                name = %name,
                error = %e,
                kind = %e.kind(),
                took_us,
                "request failed"
            ),
        }
        result
    }

    fn update_user(&self, user: User) -> Result<User> {
        let start = Instant::now();
        let id = user.id.clone();
        let result = self.next.update_user(user);
        log_result("UpdateUser", &id, &result, start);
        result
    }

    fn patch_user(&self, patch: UserPatch) -> Result<User> {
        let start = Instant::now();
        let id = patch.id.clone();
        let result = self.next.patch_user(patch);
        log_result("PatchUser", &id, &result, start);
        result
    }

    fn delete_user(&self, id: &str) -> Result<()> {
        let start = Instant::now();
        let result = self.next.delete_user(id);
        log_result("DeleteUser", id, &result, start);
        result
    }

    fn list_users(&self, filter: &ListFilter) -> Vec<User> {
        let start = Instant::now();
        let users = self.next.list_users(filter);
        info!(
            method = "ListUsers",
            name = %filter.name,
            min_age = filter.min_age,
            max_age = filter.max_age,
            count = users.len(),
            took_us = elapsed_us(start),
            "request completed"
        );
        users
    }
}
