//! External QR image encoder collaborator.
//!
//! Rendering a payload string into a QR bitmap is not this service's job;
//! it is delegated to an external encoder over HTTP. The core hands that
//! collaborator a plain ASCII string and expects image bytes or an error
//! back, nothing more. [`QrImageEncoder`] is the seam, and
//! [`HttpQrImageEncoder`] is the production implementation.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use url::Url;

/// Failure rendering a payload into an image.
#[derive(Debug, thiserror::Error)]
pub enum EncoderError {
    /// The encoder endpoint answered with a non-success status.
    #[error("encoder returned status {status}: {body}")]
    Status {
        /// The HTTP status the encoder answered with.
        status: StatusCode,
        /// The response body, as far as it could be read.
        body: String,
    },
    /// The request did not complete: connection failure, timeout, or a
    /// body that could not be read.
    #[error("encoder request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Renders a payload string into QR image bytes.
///
/// Implementations own any network or rendering concerns; callers only see
/// bytes or an [`EncoderError`].
#[async_trait::async_trait]
pub trait QrImageEncoder: Send + Sync {
    /// Renders `payload` into image bytes (PNG for the HTTP encoder).
    async fn render(&self, payload: &str) -> Result<Vec<u8>, EncoderError>;
}

#[derive(Serialize)]
struct RenderRequest<'a> {
    data: &'a str,
    width: u32,
}

/// The production encoder: POSTs the payload to a remote rendering
/// endpoint and returns the response body verbatim.
#[derive(Debug, Clone)]
pub struct HttpQrImageEncoder {
    client: reqwest::Client,
    endpoint: Url,
    width: u32,
    timeout: Duration,
}

impl HttpQrImageEncoder {
    /// Default rendered image width in pixels.
    pub const DEFAULT_WIDTH: u32 = 300;

    /// Creates an encoder client for `endpoint`.
    pub fn new(endpoint: Url, width: u32, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            width,
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl QrImageEncoder for HttpQrImageEncoder {
    async fn render(&self, payload: &str) -> Result<Vec<u8>, EncoderError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&RenderRequest {
                data: payload,
                width: self.width,
            })
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EncoderError::Status { status, body });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
