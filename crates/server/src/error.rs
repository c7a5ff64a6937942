//! Error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use model::ModelError;
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

/// Errors a request handler can surface to the client
#[derive(Debug)]
pub enum AppError {
    /// The loaded model could not score the submitted movie
    Model(ModelError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Model(err) => {
                tracing::error!("Model error while serving request: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Model evaluation failed")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        AppError::Model(err)
    }
}
