//! HTTP routes for the user service
//!
//! Handlers decode requests into domain values, call the service and wrap
//! results as `{"data": ...}`. Decoding failures become `BadRequest`.

use crate::error::ApiError;
use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use userserv_core::{Error, ListFilter, User, UserPatch, UserService};

type Result<T> = std::result::Result<T, ApiError>;

/// Shared state for the HTTP handlers
pub struct AppState {
    /// Outermost layer of the service chain
    pub users: Arc<dyn UserService>,
    /// Prometheus handle; `None` disables `/metrics`
    pub metrics: Option<PrometheusHandle>,
}

/// Success envelope
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    fn json(data: T) -> Json<Self> {
        Json(Self { data })
    }
}

/// Query parameters for `GET /users`
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub name: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
}

/// Build the user API router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_check))
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user)
                .put(update_user)
                .patch(patch_user)
                .delete(delete_user),
        )
        .with_state(state)
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<User>>> {
    let user = state.users.get_user(&id)?;
    Ok(DataResponse::json(user))
}

/// POST /users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<DataResponse<User>>> {
    let user = decode_user(&body)?;
    let created = state.users.create_user(user)?;
    Ok(DataResponse::json(created))
}

/// PUT /users/{id}
///
/// The path id replaces any id in the body.
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<DataResponse<User>>> {
    let user = decode_user(&body)?.with_id(id);
    let updated = state.users.update_user(user)?;
    Ok(DataResponse::json(updated))
}

/// PATCH /users/{id}
pub async fn patch_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<DataResponse<User>>> {
    let patch = decode_patch(id, &body)?;
    let patched = state.users.patch_user(patch)?;
    Ok(DataResponse::json(patched))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Value>>> {
    state.users.delete_user(&id)?;
    Ok(DataResponse::json(
        serde_json::json!({ "message": "user deleted successfully" }),
    ))
}

/// GET /users?name=&min=&max=
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<DataResponse<Vec<User>>>> {
    let filter = decode_filter(&params)?;
    Ok(DataResponse::json(state.users.list_users(&filter)))
}

/// GET /metrics
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

fn decode_user(body: &[u8]) -> std::result::Result<User, Error> {
    serde_json::from_slice(body).map_err(|e| Error::bad_request(format!("invalid JSON: {e}")))
}

/// Decode a patch body leniently
///
/// Unknown keys and values of the wrong JSON type are skipped rather than
/// rejected. Any `id` in the body is ignored in favour of the path.
pub fn decode_patch(id: String, body: &[u8]) -> std::result::Result<UserPatch, Error> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| Error::bad_request(format!("invalid JSON: {e}")))?;
    let Value::Object(fields) = value else {
        return Err(Error::bad_request("patch body must be a JSON object"));
    };

    let mut patch = UserPatch::new(id);
    for (key, value) in fields {
        match (key.as_str(), value) {
            ("name", Value::String(name)) => patch.name = Some(name),
            ("email", Value::String(email)) => patch.email = Some(email),
            ("age", Value::Number(n)) => {
                if let Some(age) = integral(&n) {
                    patch.age = Some(age);
                }
            }
            _ => {}
        }
    }
    Ok(patch)
}

/// JSON numbers with no fractional part, including `40.0`
#[allow(clippy::cast_possible_truncation)]
fn integral(n: &serde_json::Number) -> Option<i64> {
    // i64::MAX is not representable as f64; 2^63 is the first value past it
    let bound = 2f64.powi(63);
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && (-bound..bound).contains(f))
            .map(|f| f as i64)
    })
}

/// Empty parameters leave the corresponding bound unset
pub fn decode_filter(params: &ListParams) -> std::result::Result<ListFilter, Error> {
    let mut filter = ListFilter::default();
    if let Some(name) = &params.name {
        filter = filter.with_name(name.clone());
    }
    if let Some(min) = params.min.as_deref().filter(|s| !s.is_empty()) {
        let min = min
            .parse()
            .map_err(|_| Error::bad_request(format!("invalid min age: {min}")))?;
        filter = filter.with_min_age(min);
    }
    if let Some(max) = params.max.as_deref().filter(|s| !s.is_empty()) {
        let max = max
            .parse()
            .map_err(|_| Error::bad_request(format!("invalid max age: {max}")))?;
        filter = filter.with_max_age(max);
    }
    Ok(filter)
}
