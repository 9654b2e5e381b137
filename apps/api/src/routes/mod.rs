pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::interview::handlers as interview;
use crate::resume::handlers as resume;
use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD;

    Router::new()
        .route("/api/health", get(health::health_handler))
        // Interview API
        .route(
            "/api/interview/questions",
            post(interview::handle_generate_questions),
        )
        .route(
            "/api/interview/analyze",
            post(interview::handle_analyze_interview),
        )
        .route(
            "/api/interview/results",
            get(interview::handle_latest_results),
        )
        // Resume API
        .route(
            "/api/resume/analyze",
            post(resume::handle_analyze_resume).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use bytes::Bytes;
    use chrono::Utc;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::pipeline::testing::ScriptedModel;
    use crate::analysis::{InterviewAnalysis, Pipeline};
    use crate::config::Config;
    use crate::resume::{DocumentError, DocumentExtractor};
    use crate::results::{save_results, InMemoryResultsStore, SessionResults, RESULTS_KEY};

    const BOUNDARY: &str = "prepai-test-boundary";

    /// Returns canned text regardless of input, or refuses non-PDF bytes.
    struct StubExtractor {
        text: &'static str,
    }

    #[async_trait]
    impl DocumentExtractor for StubExtractor {
        async fn extract_text(&self, bytes: Bytes) -> Result<String, DocumentError> {
            if !bytes.starts_with(b"%PDF-") {
                return Err(DocumentError::NotPdf);
            }
            Ok(self.text.to_string())
        }
    }

    fn test_config() -> Config {
        Config {
            anthropic_api_key: "test-key".to_string(),
            redis_url: None,
            port: 0,
            rust_log: "debug".to_string(),
            max_upload_bytes: 1024,
            llm_timeout: Duration::from_secs(5),
        }
    }

    struct Harness {
        model: Arc<ScriptedModel>,
        store: InMemoryResultsStore,
        app: Router,
    }

    fn harness(model: ScriptedModel, extracted_text: &'static str) -> Harness {
        let model = Arc::new(model);
        let store = InMemoryResultsStore::default();
        let state = AppState {
            pipeline: Pipeline::new(model.clone()),
            documents: Arc::new(StubExtractor {
                text: extracted_text,
            }),
            results: Arc::new(store.clone()),
            config: test_config(),
        };
        Harness {
            model,
            store,
            app: build_router(state),
        }
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn upload_request(field: &str, content_type: &str, file: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"resume.pdf\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(file);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/resume/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness(ScriptedModel::default(), "");
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(h.app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "PrepAI API is running!");
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "prepai-api");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_generate_questions() {
        let h = harness(
            ScriptedModel::replying([r#"Sure! {"questions":["Tell me about yourself"]}"#]),
            "",
        );

        let (status, body) = send(
            h.app,
            json_request("/api/interview/questions", json!({ "role": "Product Manager" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "questions": ["Tell me about yourself"] }));
        assert!(h.model.prompts()[0].contains("Product Manager"));
    }

    #[tokio::test]
    async fn test_missing_role_is_rejected_before_model_call() {
        for payload in [json!({}), json!({ "role": "   " })] {
            let h = harness(ScriptedModel::default(), "");
            let (status, body) =
                send(h.app, json_request("/api/interview/questions", payload)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({ "error": "Role is required" }));
            assert!(h.model.prompts().is_empty());
        }
    }

    #[tokio::test]
    async fn test_malformed_json_uses_error_shape() {
        let h = harness(ScriptedModel::default(), "");
        let request = Request::builder()
            .method("POST")
            .uri("/api/interview/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"transcript\": "))
            .unwrap();

        let (status, body) = send(h.app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert!(h.model.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_analyze_interview_failure_is_server_error() {
        let h = harness(ScriptedModel::replying(["I cannot help with that."]), "");

        let (status, body) = send(
            h.app,
            json_request(
                "/api/interview/analyze",
                json!({ "transcript": "Q1: Hi\nA1: Hello" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["error"],
            "Failed to analyze interview: model response contained no structured payload"
        );
    }

    #[tokio::test]
    async fn test_blank_transcript_is_rejected() {
        let h = harness(ScriptedModel::default(), "");
        let (status, body) = send(
            h.app,
            json_request("/api/interview/analyze", json!({ "transcript": "" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Transcript is required" }));
    }

    #[tokio::test]
    async fn test_resume_upload_is_scored() {
        let h = harness(
            ScriptedModel::replying([r#"{"atsScore": 82, "suggestions": ["Quantify results"]}"#]),
            "Jane Doe\nStaff Engineer",
        );

        let (status, body) = send(
            h.app,
            upload_request("resume", "application/pdf", b"%PDF-1.7 fake"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["atsScore"], 82);
        assert!(h.model.prompts()[0].contains("Staff Engineer"));
    }

    #[tokio::test]
    async fn test_blank_resume_text_never_reaches_model() {
        let h = harness(ScriptedModel::default(), "  \n\t ");

        let (status, body) = send(
            h.app,
            upload_request("resume", "application/pdf", b"%PDF-1.4 scanned"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Could not extract text from PDF" }));
        assert!(h.model.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_upload_without_resume_field() {
        let h = harness(ScriptedModel::default(), "text");
        let (status, body) = send(
            h.app,
            upload_request("attachment", "application/pdf", b"%PDF-1.4"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "No PDF file uploaded" }));
    }

    #[tokio::test]
    async fn test_non_pdf_uploads_are_rejected() {
        let h = harness(ScriptedModel::default(), "text");
        let (status, _) = send(h.app, upload_request("resume", "image/png", b"\x89PNG")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // declared as PDF, but the bytes disagree
        let h = harness(ScriptedModel::default(), "text");
        let (status, body) = send(
            h.app,
            upload_request("resume", "application/pdf", b"plain text"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Failed to parse PDF: file is not a PDF document");
        assert!(h.model.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let h = harness(ScriptedModel::default(), "text");
        let mut file = b"%PDF-1.4".to_vec();
        file.resize(2048, b'x');

        let (status, body) = send(h.app, upload_request("resume", "application/pdf", &file)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "File is too large (max 1 KB)" }));
        assert!(h.model.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_latest_results() {
        let h = harness(ScriptedModel::default(), "");
        let request = || {
            Request::builder()
                .uri("/api/interview/results")
                .body(Body::empty())
                .unwrap()
        };

        let (status, body) = send(h.app.clone(), request()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "results": null }));

        let results = SessionResults {
            analysis: InterviewAnalysis {
                summary: "Good".to_string(),
                strengths: vec!["Calm".to_string()],
                weaknesses: vec![],
                improvements: vec![],
                resources: vec![],
            },
            candidate_name: None,
            role: "Chef".to_string(),
            completed_at: Utc::now(),
        };
        save_results(&h.store, &results).await.unwrap();

        let (status, body) = send(h.app, request()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"]["role"], "Chef");
        assert_eq!(body["results"]["summary"], "Good");
    }

    #[tokio::test]
    async fn test_corrupt_results_read_as_none() {
        use crate::results::ResultsStore;

        let h = harness(ScriptedModel::default(), "");
        h.store
            .put(RESULTS_KEY, "[]".to_string())
            .await
            .unwrap();

        let request = Request::builder()
            .uri("/api/interview/results")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(h.app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "results": null }));
    }
}
