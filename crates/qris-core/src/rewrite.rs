//! Static-to-dynamic QRIS payload rewriting.
//!
//! A static QRIS payload is reusable: it names the merchant but no amount,
//! and the customer types the amount into their banking app. The rewrite
//! engine turns such a payload into a single-transaction dynamic one by
//! flipping the point-of-initiation indicator, injecting a transaction
//! amount field (tag `54`) and an optional service fee block (tags `55` and
//! `56`/`57`), and recomputing the trailing CRC16 checksum.
//!
//! Byte-level fidelity is the whole game here. Terminals and banking apps
//! reject a payload whose TLV structure or checksum is off by a single
//! character, and a wrong insertion point produces a payload that scans
//! fine but fails at the moment of payment. The engine therefore locates
//! the insertion point structurally, from decoded field boundaries, rather
//! than by substring search: a merchant value that happens to contain the
//! text `5802ID` cannot mislead it.
//!
//! The engine is a pure function. No I/O, no shared state, same output for
//! the same input on every call.

use serde::{Deserialize, Serialize};

use crate::crc::checksum;
use crate::tlv::{self, Field, ParseError};

/// Point-of-initiation field encoded as "static" (value `11`).
const POI_STATIC: &str = "010211";
/// Point-of-initiation field encoded as "dynamic" (value `12`).
const POI_DYNAMIC: &str = "010212";
/// Country code field for Indonesia, the fixed marker that follows the
/// amount/fee block in the EMV QR layout.
const COUNTRY_FIELD: &str = "5802ID";

const TAG_AMOUNT: &str = "54";
const TAG_FEE_INDICATOR: &str = "55";
const TAG_FEE_FIXED_VALUE: &str = "56";
const TAG_FEE_PERCENTAGE_VALUE: &str = "57";
const TAG_COUNTRY: &str = "58";

/// How a service fee is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeKind {
    /// A fixed fee amount, carried in tag `56` behind indicator value `02`.
    Fixed,
    /// A percentage of the transaction amount, carried in tag `57` behind
    /// indicator value `03`.
    Percentage,
}

/// An optional service fee layered onto the base amount.
///
/// The value is carried verbatim into the payload; the engine performs no
/// percentage-to-amount arithmetic. A caller that wants a computed fee
/// amount computes it before building the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceFee {
    /// Fixed or percentage.
    pub kind: FeeKind,
    /// Decimal fee value as the payload will carry it.
    pub value: String,
}

impl ServiceFee {
    /// A fixed fee of `value` currency minor units.
    pub fn fixed<V: Into<String>>(value: V) -> Self {
        Self {
            kind: FeeKind::Fixed,
            value: value.into(),
        }
    }

    /// A percentage fee of `value` percent.
    pub fn percentage<V: Into<String>>(value: V) -> Self {
        Self {
            kind: FeeKind::Percentage,
            value: value.into(),
        }
    }
}

/// Failure modes of [`rewrite`].
///
/// All are value-level results; the engine never panics on malformed input.
/// Retrying is pointless by construction: the transformation is
/// deterministic, so the same input yields the same failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RewriteError {
    /// The input is shorter than the 4 trailing checksum characters.
    #[error("payload too short: a QRIS payload ends with a 4-character checksum")]
    PayloadTooShort,
    /// No country code field (tag `58`, value `ID`); the amount block has
    /// nowhere to go.
    #[error("payload has no country code field (5802ID); cannot locate the amount insertion point")]
    MissingCountryMarker,
    /// More than one country code field; the insertion point is ambiguous.
    #[error("payload has more than one country code field (5802ID)")]
    AmbiguousCountryMarker,
    /// The amount is empty or contains a non-digit character.
    #[error("invalid amount {0:?}: expected a non-empty string of decimal digits")]
    InvalidAmount(String),
    /// A fee was requested with an empty, non-numeric, or non-positive value.
    #[error("invalid service fee value {0:?}: expected a positive decimal number")]
    InvalidFee(String),
    /// The payload is not well-formed TLV.
    #[error("malformed payload: {0}")]
    Parse(#[from] ParseError),
}

/// Rewrites a static QRIS payload into a dynamic one.
///
/// Steps, in order:
///
/// 1. Trim surrounding whitespace and strip the 4 trailing checksum
///    characters. The `6304` checksum tag/length prefix stays in place at
///    the end of the payload; the final CRC is computed over everything up
///    to and including it, matching what scanning terminals verify.
/// 2. Validate the whole payload as TLV (checksum field included). A
///    payload this codec cannot parse would be rejected downstream anyway,
///    so it is rejected here with the parse offset intact.
/// 3. Flip the first `010211` (point-of-initiation: static) to `010212`
///    (dynamic). A payload without that exact field passes through
///    unchanged; the flip is idempotent.
/// 4. Split at the country code field (tag `58`, value `ID`), located from
///    decoded field boundaries. Exactly one such field must exist.
/// 5. Insert `54` (amount) and, when requested, `55` + `56`/`57` (fee)
///    immediately before the country code field.
/// 6. Recompute and append the CRC16/CCITT-FALSE checksum.
///
/// # Example
///
/// ```
/// use qris_core::rewrite::{rewrite, ServiceFee};
///
/// let stat = "0002010102115802ID6304AAAA";
/// let dynamic = rewrite(stat, "15000", Some(&ServiceFee::fixed("500"))).unwrap();
/// assert!(dynamic.contains("5405150005502025603500"));
/// ```
pub fn rewrite(
    static_payload: &str,
    amount: &str,
    fee: Option<&ServiceFee>,
) -> Result<String, RewriteError> {
    let payload: Vec<char> = static_payload.trim().chars().collect();
    if payload.len() < 4 {
        return Err(RewriteError::PayloadTooShort);
    }

    let source: String = payload.iter().collect();
    let fields = tlv::decode(&source)?;
    let split = locate_country_field(&fields)?;

    // Everything before the trailing checksum value, with the 6304 prefix
    // left in place so the new CRC covers it.
    let body: String = payload[..payload.len() - 4].iter().collect();
    let body = flip_point_of_initiation(&body);

    let amount_field = build_amount_field(amount)?;
    let fee_fields = fee.map(|f| build_fee_fields(f)).transpose()?;

    let head: String = body.chars().take(split).collect();
    let tail: String = body.chars().skip(split + COUNTRY_FIELD.len()).collect();

    let mut rebuilt = String::with_capacity(body.len() + amount_field.encoded_len() + 32);
    rebuilt.push_str(&head);
    rebuilt.push_str(&amount_field.to_string());
    if let Some((indicator, value)) = fee_fields {
        rebuilt.push_str(&indicator.to_string());
        rebuilt.push_str(&value.to_string());
    }
    rebuilt.push_str(COUNTRY_FIELD);
    rebuilt.push_str(&tail);

    let crc = checksum(&rebuilt);
    rebuilt.push_str(&crc);
    Ok(rebuilt)
}

/// Replaces the first static point-of-initiation field with the dynamic
/// one. Textual on purpose: the value changes meaning without changing
/// length, so no re-encoding is needed, and a payload already dynamic (or
/// carrying a non-standard indicator) passes through untouched.
fn flip_point_of_initiation(body: &str) -> String {
    body.replacen(POI_STATIC, POI_DYNAMIC, 1)
}

/// Finds the character offset of the single top-level country code field.
fn locate_country_field(fields: &[Field]) -> Result<usize, RewriteError> {
    let mut offset = 0;
    let mut found = None;
    for field in fields {
        if field.tag() == TAG_COUNTRY && field.value() == "ID" {
            if found.is_some() {
                return Err(RewriteError::AmbiguousCountryMarker);
            }
            found = Some(offset);
        }
        offset += field.encoded_len();
    }
    found.ok_or(RewriteError::MissingCountryMarker)
}

fn build_amount_field(amount: &str) -> Result<Field, RewriteError> {
    if amount.is_empty() || !amount.chars().all(|c| c.is_ascii_digit()) {
        return Err(RewriteError::InvalidAmount(amount.to_string()));
    }
    Field::new(TAG_AMOUNT, amount).map_err(|_| RewriteError::InvalidAmount(amount.to_string()))
}

/// Builds the fee indicator field (tag `55`) and the fee value field
/// (tag `56` for fixed, `57` for percentage).
fn build_fee_fields(fee: &ServiceFee) -> Result<(Field, Field), RewriteError> {
    let value = fee.value.as_str();
    let numeric = value.chars().all(|c| c.is_ascii_digit() || c == '.');
    let positive = value.parse::<f64>().map(|v| v > 0.0).unwrap_or(false);
    if value.is_empty() || !numeric || !positive {
        return Err(RewriteError::InvalidFee(value.to_string()));
    }

    let (indicator, value_tag) = match fee.kind {
        FeeKind::Fixed => ("02", TAG_FEE_FIXED_VALUE),
        FeeKind::Percentage => ("03", TAG_FEE_PERCENTAGE_VALUE),
    };
    let indicator = Field::new(TAG_FEE_INDICATOR, indicator)
        .map_err(|_| RewriteError::InvalidFee(value.to_string()))?;
    let fee_value =
        Field::new(value_tag, value).map_err(|_| RewriteError::InvalidFee(value.to_string()))?;
    Ok((indicator, fee_value))
}
