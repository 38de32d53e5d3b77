pub mod health;
pub mod index;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(index::index_handler))
        .route("/health", get(health::health_handler))
        .route(
            "/analyze",
            post(handlers::handle_analyze).layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::extractor::PdfTextExtractor;
    use crate::analysis::uploads::UploadDir;
    use crate::config::Config;
    use crate::llm_client::GeminiClient;

    async fn state(upload_dir: &std::path::Path) -> AppState {
        let config = Config {
            gemini_api_key: "unused".to_string(),
            gemini_model: "gemini-2.5-flash".to_string(),
            gemini_api_base: "http://127.0.0.1:9".to_string(),
            llm_timeout: Duration::from_secs(1),
            upload_dir: upload_dir.to_path_buf(),
            max_upload_bytes: 1024,
            port: 0,
            rust_log: "info".to_string(),
        };
        let llm = GeminiClient::new(
            config.gemini_api_key.clone(),
            config.gemini_api_base.clone(),
            config.llm_timeout,
        )
        .unwrap();
        AppState {
            llm: Arc::new(llm),
            extractor: Arc::new(PdfTextExtractor::new()),
            uploads: UploadDir::create(upload_dir).await.unwrap(),
            config,
        }
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let response = build_router(state(dir.path()).await)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "ats-api");
    }

    #[tokio::test]
    async fn test_index_serves_html() {
        let dir = tempfile::tempdir().unwrap();
        let response = build_router(state(dir.path()).await)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("/analyze"));
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected_with_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let boundary = "LIMIT";
        let payload = "x".repeat(4096);
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"cv.pdf\"\r\n\r\n{payload}\r\n--{boundary}--\r\n"
        );
        let request = Request::post("/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = build_router(state(dir.path()).await)
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].is_string());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
