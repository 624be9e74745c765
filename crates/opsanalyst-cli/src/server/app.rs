//! Axum application setup.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::handlers;
use super::state::AppState;
use crate::web::static_handler;

/// Largest accepted upload.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration for local development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/models", get(handlers::list_models))
        .route("/report.css", get(handlers::report_css))
        .route("/preview", post(handlers::preview))
        .route("/analyze", post(handlers::analyze))
        .route("/export", post(handlers::export_pdf));

    Router::new()
        .nest("/api", api_routes)
        .fallback(static_handler)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state)
}

/// Start the web server.
pub async fn run_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));

    tracing::info!(%addr, "Server listening");
    println!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use opsanalyst::{Analyst, AnalystConfig, MockProvider};
    use tower::ServiceExt;

    use super::*;

    const CSV: &str = "Client,Revenue,Expenses\nAcme,100,40\nGlobex,50,60\n";

    fn mock_router() -> Router {
        let analyst = Analyst::with_provider(AnalystConfig::default(), MockProvider::new().offline());
        create_router(AppState::new(Arc::new(analyst)))
    }

    fn keyless_router() -> Router {
        let analyst = Analyst::from_config(AnalystConfig::default()).expect("analyst");
        create_router(AppState::new(Arc::new(analyst)))
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        serde_json::from_slice(&bytes).expect("json")
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn test_models_lists_default() {
        let response = mock_router()
            .oneshot(Request::get("/api/models").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["default"], "gemini-3-pro-preview");
        assert!(json["models"].as_array().expect("models").len() >= 1);
    }

    #[tokio::test]
    async fn test_preview_returns_rows() {
        let response = mock_router()
            .oneshot(
                Request::post("/api/preview?name=ops.csv")
                    .body(Body::from(CSV))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["total_rows"], 2);
        assert_eq!(json["headers"][0], "client");
        assert!(json["table_html"].as_str().expect("html").contains("<table"));
    }

    #[tokio::test]
    async fn test_preview_rejects_unreadable_upload() {
        let response = mock_router()
            .oneshot(
                Request::post("/api/preview")
                    .body(Body::from(vec![0xffu8, 0xfe, 0x00]))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["message"], "Failed to read CSV file.");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_analyze_returns_report_and_fragment() {
        let response = mock_router()
            .oneshot(post_json("/api/analyze", serde_json::json!({ "csv": CSV })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["report"]["executive_summary"].as_array().expect("bullets").len(), 5);
        assert!(json["html"].as_str().expect("html").contains("Executive Summary"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_analyze_without_credential_is_configuration_error() {
        let response = keyless_router()
            .oneshot(post_json("/api/analyze", serde_json::json!({ "csv": CSV })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"], "configuration");
    }

    #[tokio::test]
    async fn test_analyze_rejects_unknown_model() {
        let response = mock_router()
            .oneshot(post_json(
                "/api/analyze",
                serde_json::json!({ "csv": CSV, "model": "gpt-4o" }),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_export_downloads_pdf() {
        let response = mock_router()
            .oneshot(post_json("/api/export", serde_json::json!({ "csv": CSV })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"business_report.pdf\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_export_accepts_finished_report() {
        let analyzed = mock_router()
            .oneshot(post_json(
                "/api/analyze",
                serde_json::json!({ "csv": "Client,Revenue,Expenses\nAcme,100,40\n" }),
            ))
            .await
            .expect("response");
        let report = json_body(analyzed).await["report"].clone();

        let response = mock_router()
            .oneshot(post_json("/api/export", serde_json::json!({ "report": report })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_export_caps_oversized_precision() {
        let analyzed = mock_router()
            .oneshot(post_json("/api/analyze", serde_json::json!({ "csv": CSV })))
            .await
            .expect("response");
        let mut report = json_body(analyzed).await["report"].clone();
        report["precision"] = serde_json::json!(1_000_000_000u64);

        let response = mock_router()
            .oneshot(post_json("/api/export", serde_json::json!({ "report": report })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() < 1_000_000);
    }

    #[tokio::test]
    async fn test_export_without_input_is_bad_request() {
        let response = mock_router()
            .oneshot(post_json("/api/export", serde_json::json!({})))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_index_is_served() {
        let response = mock_router()
            .oneshot(Request::get("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        assert!(String::from_utf8_lossy(&bytes).contains("AI Operations Analyst"));
    }
}
