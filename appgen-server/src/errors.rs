use crate::host::HostError;
use axum::extract::rejection::JsonRejection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("{0}")]
    Host(#[from] HostError),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Deployment failed: {0}")]
    DeploymentFailed(String),
}

impl From<DeployError> for ApiError {
    fn from(value: DeployError) -> Self {
        match value {
            DeployError::MissingFields => {
                ApiError::BadRequest("Missing required fields".to_string())
            }
            DeployError::InvalidTemplate(_) => {
                ApiError::BadRequest("Invalid template".to_string())
            }
            DeployError::Host(e) => ApiError::DeploymentFailed(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!(
            "Invalid request body: {}",
            rejection.body_text()
        ))
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        use axum::{Json, http::StatusCode};
        use serde_json::json;

        let (status, body) = match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, json!({ "error": msg }))
            }
            ApiError::DeploymentFailed(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Deployment failed", "details": details }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
