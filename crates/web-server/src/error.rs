use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use simulator::SimulationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),
    #[error("AI service not configured")]
    AiUnavailable,
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Simulation(sim_err) => {
                tracing::warn!(error = %sim_err, "Simulation rejected.");
                (StatusCode::UNPROCESSABLE_ENTITY, sim_err.to_string())
            }
            AppError::AiUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "AI service not configured".to_string(),
            ),
            AppError::Task(join_err) => {
                tracing::error!(error = ?join_err, "Simulation task failed.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred while simulating".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
