//! HTTP API for rendering task display info

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::display::TaskDisplayInfoMapper;
use crate::error::Error;
use crate::models::{TaskDisplayInfo, TaskRecord};
use crate::strings::MessageCatalog;

/// Application state shared across handlers
pub struct AppState {
    pub mapper: TaskDisplayInfoMapper<MessageCatalog>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Arc<Self> {
        let mapper = config.mapper();
        Arc::new(Self { mapper, config })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DisplayRequest {
    pub tasks: Vec<TaskRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DisplayResponse {
    pub tasks: Vec<TaskDisplayInfo>,
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/display-info", post(display_info))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "facility-taskview",
        "version": env!("CARGO_PKG_VERSION"),
        "byte_units": state.config.display.byte_units
    }))
}

/// Render display info for a batch of task records
async fn display_info(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<DisplayResponse>, ApiError> {
    // Parsed by hand so malformed records get the same JSON error body
    let request: DisplayRequest = serde_json::from_slice(&body).map_err(Error::TaskParse)?;
    tracing::info!(tasks = request.tasks.len(), "Display info request received");

    let tasks = request
        .tasks
        .iter()
        .map(|task| state.mapper.display_info(task))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(DisplayResponse { tasks }))
}

/// API error type
#[derive(Debug)]
pub struct ApiError(Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            Error::MissingTaskKind | Error::UnsupportedTaskKind(_) | Error::TaskParse(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!(error = %self.0, %status, "API error");
        (
            status,
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(AppState::new(Config::default()))
    }

    fn post_json(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/display-info")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "facility-taskview");
        assert_eq!(body["byte_units"], "decimal");
    }

    #[tokio::test]
    async fn test_display_info_batch() {
        let response = app()
            .oneshot(post_json(serde_json::json!({
                "tasks": [
                    {
                        "type": "SYNCPEERFULL",
                        "status": "QUEUED",
                        "sync_state": "PULLING",
                        "facility": "abcd1234",
                        "facility_name": "X"
                    },
                    {
                        "type": "DELETEFACILITY",
                        "status": "REMOVING_FACILITY",
                        "facility_id": "abcd1234",
                        "facility_name": "X"
                    }
                ]
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let tasks = body["tasks"].as_array().unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0]["statusMsg"], "Step 3 of 7: Waiting");
        assert_eq!(tasks[0]["isRunning"], true);
        assert_eq!(tasks[1]["statusMsg"], "Removing facility");
        assert_eq!(tasks[1]["canCancel"], false);
    }

    #[tokio::test]
    async fn test_unsupported_kind_is_unprocessable() {
        let response = app()
            .oneshot(post_json(serde_json::json!({
                "tasks": [{ "type": "EXPORTCHANNEL", "status": "QUEUED" }]
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("EXPORTCHANNEL"));
    }

    #[tokio::test]
    async fn test_missing_kind_is_unprocessable() {
        let response = app()
            .oneshot(post_json(serde_json::json!({
                "tasks": [{ "status": "QUEUED", "facility_name": "X" }]
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["error"], "task record has no type");
    }

    #[tokio::test]
    async fn test_malformed_record_gets_json_error() {
        let response = app()
            .oneshot(post_json(serde_json::json!({
                "tasks": [{ "type": "SYNCPEERFULL" }]
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        let error = body["error"].as_str().unwrap();
        assert!(error.starts_with("invalid task record"));
        assert!(error.contains("status"));
    }

    #[tokio::test]
    async fn test_non_json_body_gets_json_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/display-info")
            .body(Body::from("not json"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert!(body["error"].is_string());
    }
}
