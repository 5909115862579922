pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs
        .route("/api/v1/jobs", post(handlers::handle_create_job))
        .route("/api/v1/jobs/:id", get(handlers::handle_get_job))
        .route(
            "/api/v1/jobs/:id/resumes",
            post(handlers::handle_upload_resume),
        )
        .route("/api/v1/jobs/:id/ranking", get(handlers::handle_rank_job))
        // Resumes
        .route(
            "/api/v1/resumes/:id/score",
            post(handlers::handle_score_resume),
        )
        .route(
            "/api/v1/resumes/:id/file",
            get(handlers::handle_download_resume),
        )
        // Stateless analysis
        .route(
            "/api/v1/analysis/resume",
            post(handlers::handle_analyze_resume),
        )
        .route(
            "/api/v1/analysis/location",
            post(handlers::handle_analyze_location),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    async fn call(request: Request<Body>) -> (StatusCode, Value) {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(AppState::for_tests(dir.path()));
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_embedding_model() {
        let (status, body) =
            call(Request::builder().uri("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["embedding_model"], "hashing-bow");
    }

    #[tokio::test]
    async fn test_analyze_resume() {
        let text = "Jane Doe\njane@example.com\n\nExperience\nAcme, Jan 2018 - Jan 2021\n\
                    Built Rust services in Berlin, Germany\n\nSkills\nRust, PostgreSQL";
        let (status, body) =
            call(post_json("/api/v1/analysis/resume", serde_json::json!({ "text": text }))).await;
        assert_eq!(status, StatusCode::OK);
        let score = body["quality"]["score"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&score));
        assert_eq!(body["profile"]["years_experience"], 3.0);
        assert!(body["profile"]["skills"]
            .as_array()
            .unwrap()
            .iter()
            .any(|s| s == "Rust"));
    }

    #[tokio::test]
    async fn test_analyze_location() {
        let (status, body) = call(post_json(
            "/api/v1/analysis/location",
            serde_json::json!({ "candidate_location": "Munich", "job_location": "Berlin, Germany" }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tier"], "same_country");
        assert_eq!(body["score"], 70.0);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, _) =
            call(Request::builder().uri("/api/v1/nope").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
