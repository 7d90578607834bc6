#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! HTTP service layer for QRIS dynamic payload generation.
//!
//! This crate wraps the pure rewrite engine from [`qris_core`] with
//! everything a deployable service needs:
//!
//! - axum route handlers implementing the generate endpoint's JSON contract
//! - the external QR image encoder collaborator behind the
//!   [`QrImageEncoder`](encoder::QrImageEncoder) trait, with a
//!   `reqwest`-backed implementation
//! - signal-driven graceful shutdown for the server loop
//!
//! The rewrite itself stays synchronous and pure; the only asynchronous
//! boundary is the network round trip to the image encoder.

pub mod encoder;
pub mod handlers;
pub mod service;
pub mod util;

pub use encoder::{EncoderError, HttpQrImageEncoder, QrImageEncoder};
pub use handlers::routes;
pub use service::{QrisService, ServiceError};
