//! Model listing handler.

use axum::{extract::State, Json};
use opsanalyst::ModelId;
use serde::Serialize;

use crate::server::state::AppState;

/// Response for the model list endpoint.
#[derive(Serialize)]
pub struct ModelsResponse {
    /// Selectable models, in display order.
    pub models: Vec<String>,
    /// Model preselected in the UI.
    pub default: String,
    /// Provider that will serve requests (None = no credential configured).
    pub provider: Option<String>,
}

/// GET /api/models - List the selectable models.
pub async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: ModelId::all().iter().map(|m| m.to_string()).collect(),
        default: state.analyst.config().model.to_string(),
        provider: state.provider_name(),
    })
}
