//! Axum route handlers for the generate endpoint.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/generate` | Rewrite a static payload and render the QR image |
//! | `GET` | `/health` | Health check endpoint |
//!
//! Every `/generate` response, success or failure, carries the
//! [`GenerateResponse`] JSON shape; errors answer 400 for client mistakes
//! and 500 when the image encoder fails.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use qris_core::proto::{GenerateRequest, GenerateResponse};

use crate::service::QrisService;

/// Builds the service's router. The caller supplies the state.
pub fn routes() -> Router<Arc<QrisService>> {
    Router::new()
        .route("/generate", post(generate))
        .route("/health", get(health))
}

async fn generate(
    State(service): State<Arc<QrisService>>,
    Json(request): Json<GenerateRequest>,
) -> (StatusCode, Json<GenerateResponse>) {
    match service.generate(request).await {
        Ok(generated) => {
            tracing::info!(payload_len = generated.qris_string.len(), "generated dynamic payload");
            (
                StatusCode::OK,
                Json(GenerateResponse::Success {
                    qris_string: generated.qris_string,
                    qris_image: generated.qris_image,
                }),
            )
        }
        Err(error) => {
            let status = error.status_code();
            if status.is_server_error() {
                tracing::error!(%error, "generate failed");
            } else {
                tracing::warn!(%error, "generate rejected");
            }
            (status, Json(GenerateResponse::error(error.to_string())))
        }
    }
}

async fn health() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::service::tests::{MockEncoder, static_payload};

    fn app(fail_encoder: bool) -> Router {
        let service = QrisService::new(Arc::new(MockEncoder { fail: fail_encoder }));
        routes().with_state(Arc::new(service))
    }

    async fn post_generate(app: Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/generate")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_generate_success_contract() {
        let (status, body) = post_generate(
            app(false),
            serde_json::json!({ "staticPayload": static_payload(), "amount": "15000" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert!(body["qrisString"].as_str().unwrap().contains("540515000"));
        assert!(!body["qrisImage"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_missing_field_is_400_with_error_shape() {
        let (status, body) =
            post_generate(app(false), serde_json::json!({ "amount": "15000" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().contains("staticPayload"));
    }

    #[tokio::test]
    async fn test_generate_encoder_failure_is_500_with_error_shape() {
        let (status, body) = post_generate(
            app(true),
            serde_json::json!({ "staticPayload": static_payload(), "amount": "15000" }),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = app(false)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
