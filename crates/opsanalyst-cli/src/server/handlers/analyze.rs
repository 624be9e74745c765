//! Analysis and export handlers.
//!
//! The pipeline blocks on the model call, so it runs on the blocking pool.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use opsanalyst::report::{render_fragment, EXPORT_FILE_NAME, EXPORT_MIME};
use opsanalyst::{AnalysisReport, ModelId, PdfExporter};
use serde::{Deserialize, Serialize};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Request to analyze uploaded CSV text.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Raw CSV text.
    pub csv: String,
    /// Model to use (default: the configured model).
    #[serde(default)]
    pub model: Option<String>,
    /// Original file name.
    #[serde(default)]
    pub file_name: Option<String>,
}

/// Response with the finished report.
#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub report: AnalysisReport,
    /// Report body rendered for the page.
    pub html: String,
}

/// Request to export a PDF, either from a finished report or from raw CSV.
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub report: Option<AnalysisReport>,
    #[serde(default)]
    pub csv: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
}

/// Run the full pipeline off the async runtime.
async fn run_analysis(state: &AppState, request: AnalyzeRequest) -> Result<AnalysisReport, ApiError> {
    let model = match &request.model {
        Some(name) => ModelId::parse(name)?,
        None => state.analyst.config().model.clone(),
    };
    let name = request.file_name.unwrap_or_else(|| "upload.csv".to_string());
    let analyst = state.analyst.clone();

    let report = tokio::task::spawn_blocking(move || {
        analyst.analyze_with_model(&name, request.csv.as_bytes(), &model)
    })
    .await
    .map_err(|e| ApiError::internal(format!("Analysis task failed: {}", e)))??;

    Ok(report)
}

/// POST /api/analyze - Analyze CSV text and return the report.
pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let report = run_analysis(&state, request).await?;
    let html = render_fragment(&report);

    Ok(Json(AnalyzeResponse { report, html }))
}

/// POST /api/export - Render a report as a downloadable PDF.
pub async fn export_pdf(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<Response, ApiError> {
    let report = match (request.report, request.csv) {
        (Some(report), _) => report,
        (None, Some(csv)) => {
            let source = AnalyzeRequest {
                csv,
                model: request.model,
                file_name: request.file_name,
            };
            run_analysis(&state, source).await?
        }
        (None, None) => return Err(ApiError::bad_request("Provide a report or CSV data to export")),
    };

    let pdf = tokio::task::spawn_blocking(move || PdfExporter::new().render(&report))
        .await
        .map_err(|e| ApiError::internal(format!("Export task failed: {}", e)))??;

    Ok((
        [
            (header::CONTENT_TYPE, EXPORT_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        pdf,
    )
        .into_response())
}
