//! Request metrics decorator
//!
//! Records through the `metrics` facade; whichever recorder the process
//! installs (Prometheus in the server binary) receives the samples.

use crate::error::{ErrorKind, Result};
use crate::service::UserService;
use crate::user::{ListFilter, User, UserPatch};
use ::metrics::{Unit, counter, describe_counter, describe_histogram, histogram};
use std::time::Instant;

/// Requests received, labelled by `method` and `error`
pub const REQUEST_COUNT: &str = "user_service_request_count";
/// Failed requests, labelled by `method` and `kind`
pub const REQUEST_ERRORS: &str = "user_service_request_errors";
/// Request latency in microseconds, labelled by `method` and `error`
pub const REQUEST_LATENCY: &str = "user_service_request_latency_microseconds";

/// Register help text and units with the installed recorder
pub fn describe_metrics() {
    describe_counter!(REQUEST_COUNT, "Number of requests received");
    describe_counter!(REQUEST_ERRORS, "Number of errors encountered");
    describe_histogram!(
        REQUEST_LATENCY,
        Unit::Microseconds,
        "Duration of requests in microseconds"
    );
}

/// Records count, error and latency samples per call
pub struct MetricsMiddleware<S> {
    next: S,
}

impl<S: UserService> MetricsMiddleware<S> {
    pub fn new(next: S) -> Self {
        Self { next }
    }
}

fn track(method: &'static str, error: Option<ErrorKind>, start: Instant) {
    let latency_us = start.elapsed().as_secs_f64() * 1_000_000.0;
    let error_label = if error.is_some() { "true" } else { "false" };

    if let Some(kind) = error {
        counter!(REQUEST_ERRORS, "method" => method, "kind" => kind.as_str()).increment(1);
    }
    counter!(REQUEST_COUNT, "method" => method, "error" => error_label).increment(1);
    histogram!(REQUEST_LATENCY, "method" => method, "error" => error_label).record(latency_us);
}

fn track_result<T>(method: &'static str, result: &Result<T>, start: Instant) {
    track(method, result.as_ref().err().map(|e| e.kind()), start);
}

impl<S: UserService> UserService for MetricsMiddleware<S> {
    fn get_user(&self, id: &str) -> Result<User> {
        let start = Instant::now();
        let result = self.next.get_user(id);
        track_result("GetUser", &result, start);
        result
    }

    fn create_user(&self, user: User) -> Result<User> {
        let start = Instant::now();
        let result = self.next.create_user(user);
        track_result("CreateUser", &result, start);
        result
    }

    fn update_user(&self, user: User) -> Result<User> {
        let start = Instant::now();
        let result = self.next.update_user(user);
        track_result("UpdateUser", &result, start);
        result
    }

    fn patch_user(&self, patch: UserPatch) -> Result<User> {
        let start = Instant::now();
        let result = self.next.patch_user(patch);
        track_result("PatchUser", &result, start);
        result
    }

    fn delete_user(&self, id: &str) -> Result<()> {
        let start = Instant::now();
        let result = self.next.delete_user(id);
        track_result("DeleteUser", &result, start);
        result
    }

    fn list_users(&self, filter: &ListFilter) -> Vec<User> {
        let start = Instant::now();
        let users = self.next.list_users(filter);
        track("ListUsers", None, start);
        users
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::UserStore;
    use metrics_exporter_prometheus::PrometheusBuilder;

    /// Find the value of the sample `name` carrying every label in `labels`
    fn sample(rendered: &str, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
        rendered
            .lines()
            .filter(|line| line.starts_with(&format!("{name}{{")))
            .find(|line| {
                labels
                    .iter()
                    .all(|(k, v)| line.contains(&format!("{k}=\"{v}\"")))
            })
            .and_then(|line| line.rsplit(' ').next())
            .and_then(|value| value.parse().ok())
    }

    fn record<T>(f: impl FnOnce() -> T) -> (T, String) {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let out = ::metrics::with_local_recorder(&recorder, f);
        (out, handle.render())
    }

    #[test]
    fn test_counts_success_and_error() {
        let svc = MetricsMiddleware::new(UserStore::new());
        let (_, rendered) = record(|| {
            let created = svc
                .create_user(User::new("Ann", "ann@example.com", 30))
                .unwrap();
            svc.get_user(&created.id).unwrap();
            svc.get_user(&created.id).unwrap();
            svc.get_user("missing").unwrap_err();
        });

        assert_eq!(
            sample(
                &rendered,
                REQUEST_COUNT,
                &[("method", "GetUser"), ("error", "false")]
            ),
            Some(2.0)
        );
        assert_eq!(
            sample(
                &rendered,
                REQUEST_COUNT,
                &[("method", "GetUser"), ("error", "true")]
            ),
            Some(1.0)
        );
        assert_eq!(
            sample(
                &rendered,
                REQUEST_ERRORS,
                &[("method", "GetUser"), ("kind", "not_found")]
            ),
            Some(1.0)
        );
        assert_eq!(
            sample(
                &rendered,
                REQUEST_COUNT,
                &[("method", "CreateUser"), ("error", "false")]
            ),
            Some(1.0)
        );
    }

    #[test]
    fn test_records_latency_samples() {
        let svc = MetricsMiddleware::new(UserStore::new());
        let (_, rendered) = record(|| {
            svc.list_users(&ListFilter::default());
            svc.delete_user("missing").unwrap_err();
        });

        let count_name = format!("{REQUEST_LATENCY}_count");
        assert_eq!(
            sample(
                &rendered,
                &count_name,
                &[("method", "ListUsers"), ("error", "false")]
            ),
            Some(1.0)
        );
        assert_eq!(
            sample(
                &rendered,
                &count_name,
                &[("method", "DeleteUser"), ("error", "true")]
            ),
            Some(1.0)
        );
    }

    #[test]
    fn test_invalid_field_kind_label() {
        let svc = MetricsMiddleware::new(UserStore::new());
        let (result, rendered) = record(|| svc.create_user(User::new("", "", 0)));

        assert!(result.is_err());
        assert_eq!(
            sample(
                &rendered,
                REQUEST_ERRORS,
                &[("method", "CreateUser"), ("kind", "invalid_field")]
            ),
            Some(1.0)
        );
    }
}
