use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{ScoreRequest, UserId};
use super::engine::ScoreError;
use super::repository::{MetricRepository, RepositoryError, UserDirectory};
use super::service::{ScoreService, ScoreServiceError};

/// Router builder exposing the scoring API.
pub fn score_router<R, U>(service: Arc<ScoreService<R, U>>) -> Router
where
    R: MetricRepository + 'static,
    U: UserDirectory + 'static,
{
    Router::new()
        .route("/api/calculate", post(calculate_handler::<R, U>))
        .route("/api/metrics", post(commit_handler::<R, U>))
        .route("/api/metrics/:user_id", get(history_handler::<R, U>))
        .route("/api/all_metrics", get(all_metrics_handler::<R, U>))
        .route("/api/leaderboard", get(leaderboard_handler::<R, U>))
        .route(
            "/api/users",
            get(list_users_handler::<R, U>).post(create_user_handler::<R, U>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitQuery {
    #[serde(default = "default_user_id")]
    pub(crate) user_id: u64,
}

fn default_user_id() -> u64 {
    1
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateUserRequest {
    pub(crate) name: String,
    #[serde(default = "default_role")]
    pub(crate) role: String,
}

fn default_role() -> String {
    "Staff".to_string()
}

pub(crate) async fn calculate_handler<R, U>(
    State(service): State<Arc<ScoreService<R, U>>>,
    axum::Json(request): axum::Json<ScoreRequest>,
) -> Response
where
    R: MetricRepository + 'static,
    U: UserDirectory + 'static,
{
    match service.calculate(&request) {
        Ok(breakdown) => (StatusCode::OK, axum::Json(breakdown)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn commit_handler<R, U>(
    State(service): State<Arc<ScoreService<R, U>>>,
    Query(query): Query<CommitQuery>,
    axum::Json(request): axum::Json<ScoreRequest>,
) -> Response
where
    R: MetricRepository + 'static,
    U: UserDirectory + 'static,
{
    match service.commit(UserId(query.user_id), request, Utc::now()) {
        Ok(committed) => (StatusCode::CREATED, axum::Json(committed)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn history_handler<R, U>(
    State(service): State<Arc<ScoreService<R, U>>>,
    Path(user_id): Path<u64>,
) -> Response
where
    R: MetricRepository + 'static,
    U: UserDirectory + 'static,
{
    match service.history(UserId(user_id)) {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn all_metrics_handler<R, U>(
    State(service): State<Arc<ScoreService<R, U>>>,
) -> Response
where
    R: MetricRepository + 'static,
    U: UserDirectory + 'static,
{
    match service.all_metrics() {
        Ok(rows) => (StatusCode::OK, axum::Json(rows)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn leaderboard_handler<R, U>(
    State(service): State<Arc<ScoreService<R, U>>>,
) -> Response
where
    R: MetricRepository + 'static,
    U: UserDirectory + 'static,
{
    match service.leaderboard() {
        Ok(board) => (StatusCode::OK, axum::Json(board)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_users_handler<R, U>(
    State(service): State<Arc<ScoreService<R, U>>>,
) -> Response
where
    R: MetricRepository + 'static,
    U: UserDirectory + 'static,
{
    match service.list_users() {
        Ok(users) => (StatusCode::OK, axum::Json(users)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_user_handler<R, U>(
    State(service): State<Arc<ScoreService<R, U>>>,
    axum::Json(body): axum::Json<CreateUserRequest>,
) -> Response
where
    R: MetricRepository + 'static,
    U: UserDirectory + 'static,
{
    match service.create_user(&body.name, &body.role) {
        Ok(user) => (StatusCode::CREATED, axum::Json(user)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ScoreServiceError) -> Response {
    let status = match &error {
        ScoreServiceError::Score(ScoreError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        ScoreServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ScoreServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
