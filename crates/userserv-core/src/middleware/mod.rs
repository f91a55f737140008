//! Observability decorators over [`UserService`](crate::service::UserService)
//!
//! Each decorator forwards every call to the service it wraps and only
//! observes the outcome. Stack them at construction time:
//!
//! ```rust,ignore
//! let svc = LoggingMiddleware::new(MetricsMiddleware::new(UserStore::new()));
//! ```
//!
//! The outermost decorator's timings include everything beneath it.

pub mod logging;
pub mod metrics;

pub use logging::LoggingMiddleware;
pub use metrics::MetricsMiddleware;
