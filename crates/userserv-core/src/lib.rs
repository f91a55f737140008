//! userserv core
//!
//! This crate provides:
//! - The user record model and partial-update types
//! - Field validation with aggregated errors
//! - A concurrency-safe in-memory user store
//! - Logging and metrics decorators over the store's operation contract
//!
//! It knows nothing about HTTP or JSON; the `userserv` binary maps
//! requests onto [`UserService`] calls.
//!
//! # Example
//!
//! ```rust,ignore
//! use userserv_core::{LoggingMiddleware, MetricsMiddleware, User, UserService, UserStore};
//!
//! let svc = LoggingMiddleware::new(MetricsMiddleware::new(UserStore::new()));
//! let user = svc.create_user(User::new("Ann", "ann@example.com", 30))?;
//! assert_eq!(svc.get_user(&user.id)?, user);
//! ```

pub mod error;
pub mod middleware;
pub mod service;
pub mod store;
pub mod user;
pub mod validation;

pub use error::{Error, ErrorKind, Field, FieldError, FieldErrors, Result};
pub use middleware::{LoggingMiddleware, MetricsMiddleware};
pub use service::UserService;
pub use store::UserStore;
pub use user::{ListFilter, User, UserPatch};
