//! Request orchestration: resolve, rewrite, render.

use std::sync::Arc;

use axum::http::StatusCode;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use qris_core::proto::{GenerateRequest, RequestError};
use qris_core::rewrite::{RewriteError, rewrite};

use crate::encoder::{EncoderError, QrImageEncoder};

/// Failure anywhere in the generate flow.
///
/// The variant decides the HTTP status: request and rewrite problems are
/// the caller's fault (400), a failed image render is ours (500). Only the
/// message crosses the boundary; transport and stack detail stay inside.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The request body is missing required fields or half-specifies a fee.
    #[error("{0}")]
    Request(#[from] RequestError),
    /// The rewrite engine rejected the payload, amount, or fee.
    #[error("{0}")]
    Rewrite(#[from] RewriteError),
    /// The external QR image encoder failed.
    #[error("failed to render QR image: {0}")]
    Render(#[from] EncoderError),
}

impl ServiceError {
    /// The HTTP status this error maps to at the transport boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Request(_) | ServiceError::Rewrite(_) => StatusCode::BAD_REQUEST,
            ServiceError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A successful generate outcome.
#[derive(Debug, Clone)]
pub struct GeneratedQris {
    /// The dynamic payload text.
    pub qris_string: String,
    /// The rendered QR image, base64-encoded.
    pub qris_image: String,
}

/// The generate service: pure rewrite plus the image encoder collaborator.
#[derive(Clone)]
pub struct QrisService {
    encoder: Arc<dyn QrImageEncoder>,
}

impl QrisService {
    /// Creates a service around the given encoder.
    pub fn new(encoder: Arc<dyn QrImageEncoder>) -> Self {
        Self { encoder }
    }

    /// Resolves the wire request, rewrites the payload, and renders it.
    pub async fn generate(&self, request: GenerateRequest) -> Result<GeneratedQris, ServiceError> {
        let request = request.resolve()?;
        let dynamic = rewrite(
            &request.static_payload,
            &request.amount,
            request.service_fee.as_ref(),
        )?;
        let image = self.encoder.render(&dynamic).await?;
        Ok(GeneratedQris {
            qris_string: dynamic,
            qris_image: BASE64.encode(image),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::encoder::EncoderError;
    use qris_core::crc::checksum;

    /// Encoder stand-in: answers with fixed bytes or a fixed failure.
    pub(crate) struct MockEncoder {
        pub fail: bool,
    }

    #[async_trait::async_trait]
    impl QrImageEncoder for MockEncoder {
        async fn render(&self, _payload: &str) -> Result<Vec<u8>, EncoderError> {
            if self.fail {
                Err(EncoderError::Status {
                    status: axum::http::StatusCode::BAD_GATEWAY,
                    body: "render backend down".into(),
                })
            } else {
                Ok(b"png-bytes".to_vec())
            }
        }
    }

    pub(crate) fn static_payload() -> String {
        let body = "0002010102115802ID5910MERCHANT X6304";
        format!("{body}{}", checksum(body))
    }

    fn request(amount: &str) -> GenerateRequest {
        GenerateRequest {
            static_payload: Some(static_payload()),
            amount: Some(amount.into()),
            ..Default::default()
        }
    }

    fn service(fail: bool) -> QrisService {
        QrisService::new(Arc::new(MockEncoder { fail }))
    }

    #[tokio::test]
    async fn test_generate_returns_payload_and_base64_image() {
        let generated = service(false).generate(request("15000")).await.unwrap();
        assert!(generated.qris_string.contains("540515000"));
        assert_eq!(generated.qris_image, BASE64.encode(b"png-bytes"));
    }

    #[tokio::test]
    async fn test_missing_field_maps_to_bad_request() {
        let error = service(false)
            .generate(GenerateRequest::default())
            .await
            .unwrap_err();
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert!(error.to_string().contains("staticPayload"));
    }

    #[tokio::test]
    async fn test_rewrite_failure_maps_to_bad_request() {
        let error = service(false).generate(request("not-digits")).await.unwrap_err();
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert!(matches!(error, ServiceError::Rewrite(RewriteError::InvalidAmount(_))));
    }

    #[tokio::test]
    async fn test_encoder_failure_maps_to_internal_error() {
        let error = service(true).generate(request("15000")).await.unwrap_err();
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
