//! JSON wire types for the generate endpoint.
//!
//! The HTTP layer accepts a POST body with the scanned static payload, the
//! transaction amount, and an optional fee pair, and answers with either the
//! rewritten payload plus its rendered QR image or an error message. The
//! shapes here are the whole wire contract; no internal error detail crosses
//! the boundary.

use serde::{Deserialize, Serialize};

use crate::rewrite::{FeeKind, ServiceFee};

/// Error resolving a [`GenerateRequest`] into a [`RewriteRequest`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// A required field is absent from the request body.
    #[error("missing required field {0:?}")]
    MissingField(&'static str),
    /// `feeType` and `feeValue` must be provided together or not at all.
    #[error("feeType and feeValue must be provided together")]
    IncompleteFee,
}

/// The POST body of the generate endpoint, fields as they appear on the
/// wire. Required-field checks happen in [`GenerateRequest::resolve`], not
/// in deserialization, so a missing field yields the documented error shape
/// instead of a framework rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// The decoded content of a scanned static QR image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_payload: Option<String>,
    /// Transaction amount, decimal digits only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    /// `"fixed"` or `"percentage"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_type: Option<FeeKind>,
    /// Fee value, paired with `feeType`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_value: Option<String>,
}

/// A fully resolved rewrite input: required fields present, fee pair
/// consistent. This is what the service hands to the rewrite engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRequest {
    /// The static payload to rewrite.
    pub static_payload: String,
    /// Transaction amount, decimal digits only.
    pub amount: String,
    /// Optional service fee.
    pub service_fee: Option<ServiceFee>,
}

impl GenerateRequest {
    /// Resolves the wire shape into a [`RewriteRequest`].
    ///
    /// # Errors
    ///
    /// - [`RequestError::MissingField`] when `staticPayload` or `amount` is
    ///   absent
    /// - [`RequestError::IncompleteFee`] when exactly one of `feeType` and
    ///   `feeValue` is present
    pub fn resolve(self) -> Result<RewriteRequest, RequestError> {
        let static_payload = self
            .static_payload
            .ok_or(RequestError::MissingField("staticPayload"))?;
        let amount = self.amount.ok_or(RequestError::MissingField("amount"))?;
        let service_fee = match (self.fee_type, self.fee_value) {
            (None, None) => None,
            (Some(kind), Some(value)) => Some(ServiceFee { kind, value }),
            _ => return Err(RequestError::IncompleteFee),
        };
        Ok(RewriteRequest {
            static_payload,
            amount,
            service_fee,
        })
    }
}

/// The JSON body of every generate response, discriminated by `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GenerateResponse {
    /// The rewrite and render both succeeded.
    #[serde(rename_all = "camelCase")]
    Success {
        /// The dynamic payload text.
        qris_string: String,
        /// The rendered QR image, base64-encoded.
        qris_image: String,
    },
    /// Anything else.
    Error {
        /// Human-readable failure description.
        message: String,
    },
}

impl GenerateResponse {
    /// Shorthand for the error shape.
    pub fn error<M: Into<String>>(message: M) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}
