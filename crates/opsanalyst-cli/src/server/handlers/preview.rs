//! Data preview handler.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use opsanalyst::report::html::inline_css;
use opsanalyst::report::render_preview_table;
use opsanalyst::DataPreview;
use serde::{Deserialize, Serialize};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Query parameters for the preview endpoint.
#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    /// Original file name, shown in the report header.
    #[serde(default)]
    pub name: Option<String>,
}

/// Response for the data preview endpoint.
#[derive(Serialize)]
pub struct PreviewResponse {
    #[serde(flatten)]
    pub preview: DataPreview,
    /// Preview rows rendered as an HTML table.
    pub table_html: String,
}

/// POST /api/preview - Parse the uploaded CSV and return its first rows.
pub async fn preview(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
    body: Bytes,
) -> Result<Json<PreviewResponse>, ApiError> {
    let name = query.name.unwrap_or_else(|| "upload.csv".to_string());
    let preview = state.analyst.preview(&name, &body)?;
    let table_html = render_preview_table(&preview.headers, &preview.rows);

    Ok(Json(PreviewResponse {
        preview,
        table_html,
    }))
}

/// GET /api/report.css - Stylesheet shared by the page and report fragments.
pub async fn report_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], inline_css())
}
