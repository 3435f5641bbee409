use crate::{
    errors::ApiError,
    models::{DeployRequest, DeployResponse},
    server::AppState,
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::{error, info, warn};

pub async fn deploy(
    State(state): State<AppState>,
    payload: Result<Json<DeployRequest>, JsonRejection>,
) -> Result<Json<DeployResponse>, ApiError> {
    // a body not declared as JSON counts as empty
    let request = match payload {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => DeployRequest::default(),
        Err(rejection) => {
            warn!("Rejected deploy body: {}", rejection.body_text());
            return Err(ApiError::from(rejection));
        }
    };

    info!(
        "API: Deploy request for app {:?} with template {:?}",
        request.app_name, request.template
    );

    match state.deployment_service.deploy(request).await {
        Ok(outcome) => Ok(Json(DeployResponse::from(outcome))),
        Err(e) => {
            error!("Deployment error: {}", e);
            Err(ApiError::from(e))
        }
    }
}
