#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core QRIS payload primitives.
//!
//! QRIS is the Indonesian national profile of the EMV merchant-presented QR
//! standard: a payment payload encoded as a flat tag-length-value text stream
//! terminated by a CRC16 checksum field. This crate implements the pure,
//! transport-free core of a QRIS facilitator:
//!
//! - [`tlv`] — encode/decode of the EMV QR TLV micro-format
//! - [`crc`] — the CRC16/CCITT-FALSE checksum that terminates every payload
//! - [`rewrite`] — the static-to-dynamic payload rewrite engine
//! - [`proto`] — the JSON wire types served by the HTTP layer
//!
//! Everything here is synchronous, deterministic, and free of shared state;
//! the same input always produces the same output, and any number of callers
//! may invoke the engine concurrently.
//!
//! # Example
//!
//! ```
//! use qris_core::rewrite::rewrite;
//!
//! // A scanned static payload becomes a single-use dynamic payload carrying
//! // the transaction amount and a freshly computed checksum.
//! let payload = "0002010102115802ID6304AAAA";
//! let dynamic = rewrite(payload, "15000", None).unwrap();
//! assert!(dynamic.contains("540515000"));
//! assert!(dynamic.contains("010212"));
//! ```

pub mod crc;
pub mod proto;
pub mod rewrite;
pub mod tlv;
