//! userserv HTTP service
//!
//! Wires the core [`UserStore`] behind its observability decorators and
//! exposes it over an axum router.

pub mod config;
pub mod error;
pub mod transport;

use std::sync::Arc;
use userserv_core::{LoggingMiddleware, MetricsMiddleware, UserService, UserStore};

/// Wrap a store in its decorator chain
///
/// Logging is outermost, so logged latencies include metrics recording.
pub fn build_service(store: UserStore, with_metrics: bool) -> Arc<dyn UserService> {
    if with_metrics {
        Arc::new(LoggingMiddleware::new(MetricsMiddleware::new(store)))
    } else {
        Arc::new(LoggingMiddleware::new(store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use userserv_core::{Error, User};

    #[test]
    fn test_build_service_chains() {
        for with_metrics in [true, false] {
            let svc = build_service(UserStore::new(), with_metrics);
            let created = svc
                .create_user(User::new("Ann", "ann@example.com", 30))
                .unwrap();
            assert_eq!(svc.get_user(&created.id).unwrap(), created);
            svc.delete_user(&created.id).unwrap();
            assert!(matches!(
                svc.get_user(&created.id),
                Err(Error::NotFound(_))
            ));
        }
    }
}
