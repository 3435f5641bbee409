use crate::{server::AppState, templates::TemplateSummary};
use axum::{Json, extract::State};
use tracing::debug;

pub async fn list_templates(
    State(state): State<AppState>,
) -> Json<Vec<TemplateSummary>> {
    let templates = state.deployment_service.registry().list();
    debug!("API: Listing {} templates", templates.len());
    Json(templates)
}
