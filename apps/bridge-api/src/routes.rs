use std::any::Any;

use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, patch},
};
use serde::{Deserialize, Serialize};
use tower_http::catch_panic::CatchPanicLayer;
use uuid::Uuid;

use bridge_domain::{ActivityEntry, Milestone, Paper, SearchResult, WritingSection};
use bridge_service::{
	LogActivityRequest, ServiceError, SetMilestoneStatusRequest, SetTaskCheckedRequest,
	SetWordCountRequest, TaskListResponse,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/api/search", get(search))
		.route("/api/papers", get(list_papers))
		.route("/api/activity", get(recent_activity).post(log_activity))
		.route("/api/milestones", get(list_milestones))
		.route("/api/milestones/{id}", patch(set_milestone_status))
		.route("/api/writing", get(list_writing_sections))
		.route("/api/writing/{id}", patch(set_word_count))
		.route("/api/notion/tasks", get(list_tasks).patch(set_task_checked))
		.layer(CatchPanicLayer::custom(handle_panic))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

#[derive(Debug, Deserialize)]
struct SearchParams {
	#[serde(default)]
	q: Option<String>,
}

// A missing or blank query is a valid "no search", not an error.
async fn search(
	State(state): State<AppState>,
	Query(params): Query<SearchParams>,
) -> Json<Vec<SearchResult>> {
	let results = state.service.search(params.q.as_deref().unwrap_or("")).await;

	Json(results)
}

async fn list_papers(State(state): State<AppState>) -> Result<Json<Vec<Paper>>, ApiError> {
	Ok(Json(state.service.list_papers().await?))
}

async fn recent_activity(
	State(state): State<AppState>,
) -> Result<Json<Vec<ActivityEntry>>, ApiError> {
	Ok(Json(state.service.recent_activity().await?))
}

async fn log_activity(
	State(state): State<AppState>,
	Json(payload): Json<LogActivityRequest>,
) -> Result<Json<ActivityEntry>, ApiError> {
	Ok(Json(state.service.log_activity(payload).await?))
}

async fn list_milestones(State(state): State<AppState>) -> Result<Json<Vec<Milestone>>, ApiError> {
	Ok(Json(state.service.list_milestones().await?))
}

async fn set_milestone_status(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	Json(payload): Json<SetMilestoneStatusRequest>,
) -> Result<StatusCode, ApiError> {
	state.service.set_milestone_status(id, payload).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn list_writing_sections(
	State(state): State<AppState>,
) -> Result<Json<Vec<WritingSection>>, ApiError> {
	Ok(Json(state.service.list_writing_sections().await?))
}

async fn set_word_count(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	Json(payload): Json<SetWordCountRequest>,
) -> Result<StatusCode, ApiError> {
	state.service.set_word_count(id, payload).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn list_tasks(State(state): State<AppState>) -> Result<Json<TaskListResponse>, ApiError> {
	Ok(Json(state.service.list_tasks().await?))
}

async fn set_task_checked(
	State(state): State<AppState>,
	Json(payload): Json<SetTaskCheckedRequest>,
) -> Result<StatusCode, ApiError> {
	state.service.set_task_checked(payload).await?;

	Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: &'static str,
	message: String,
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let (status, error_code) = match &err {
			ServiceError::InvalidRequest { .. } => (StatusCode::BAD_REQUEST, "invalid_request"),
			ServiceError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
			ServiceError::Upstream(_) => (StatusCode::BAD_GATEWAY, "upstream"),
			ServiceError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
		};

		if status.is_server_error() {
			tracing::error!(error = %err, "Request failed.");
		}

		Self { status, error_code, message: err.to_string() }
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code.to_string(), message: self.message };

		(self.status, Json(body)).into_response()
	}
}

// A panicking handler still answers a generic JSON 500; the panic message
// stays server-side.
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
	let detail = if let Some(message) = panic.downcast_ref::<&str>() {
		(*message).to_string()
	} else if let Some(message) = panic.downcast_ref::<String>() {
		message.clone()
	} else {
		"non-string panic payload".to_string()
	};

	tracing::error!(panic = %detail, "Handler panicked.");

	ApiError {
		status: StatusCode::INTERNAL_SERVER_ERROR,
		error_code: "internal",
		message: "Unexpected internal failure.".to_string(),
	}
	.into_response()
}
