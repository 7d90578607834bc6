//! Codec for the EMV QR tag-length-value micro-format.
//!
//! A QRIS payload is a flat sequence of fields, each encoded as a 2-digit
//! tag, a 2-digit zero-padded length, and exactly that many characters of
//! value. Values may themselves contain a nested TLV sequence (merchant
//! account information is the usual case), but nesting is opaque at the top
//! level; callers descend into a specific field with
//! [`Field::decode_nested`] when they need to.
//!
//! # Example
//!
//! ```
//! use qris_core::tlv::{decode, encode, Field};
//!
//! let fields = decode("000201010211").unwrap();
//! assert_eq!(fields.len(), 2);
//! assert_eq!(fields[0].tag(), "00");
//! assert_eq!(fields[1].value(), "11");
//! assert_eq!(encode(&fields), "000201010211");
//! ```

use std::fmt;

/// Error constructing a [`Field`] from raw parts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The tag is not exactly two ASCII digits.
    #[error("invalid tag {0:?}: expected exactly two ASCII digits")]
    InvalidTag(String),
    /// The value is longer than 99 characters and its length cannot be
    /// expressed as a 2-digit prefix.
    #[error("value of {0} characters exceeds the 2-digit length limit of 99")]
    ValueTooLong(usize),
}

/// Error decoding a TLV stream.
///
/// Each variant carries the character offset at which the walk failed, which
/// is worth surfacing: a payload that fails mid-stream usually means a length
/// prefix upstream was wrong, and the offset points at the damage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Fewer than two characters remain where a tag was expected, or the
    /// characters are not digits.
    #[error("truncated or non-numeric tag at offset {0}")]
    TruncatedTag(usize),
    /// Fewer than two characters remain where a length was expected, or the
    /// characters are not digits.
    #[error("truncated or non-numeric length at offset {0}")]
    TruncatedLength(usize),
    /// The declared length runs past the end of the input.
    #[error("value truncated at offset {offset}: declared {declared} characters, {remaining} remain")]
    TruncatedValue {
        /// Offset of the value's first character.
        offset: usize,
        /// Length the field declared.
        declared: usize,
        /// Characters actually remaining.
        remaining: usize,
    },
}

/// A single TLV field.
///
/// The length prefix is not stored: it is derived from the value, so a
/// `Field` cannot exist with a length that disagrees with its value. That
/// invariant is what keeps downstream consumers (POS terminals, banking
/// apps) able to parse anything this codec emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    tag: String,
    value: String,
}

impl Field {
    /// Creates a field, validating the tag shape and the length limit.
    ///
    /// # Errors
    ///
    /// - [`FieldError::InvalidTag`] if `tag` is not exactly two ASCII digits
    /// - [`FieldError::ValueTooLong`] if `value` exceeds 99 characters
    ///
    /// # Example
    ///
    /// ```
    /// use qris_core::tlv::Field;
    ///
    /// let amount = Field::new("54", "15000").unwrap();
    /// assert_eq!(amount.length(), 5);
    /// assert!(Field::new("5", "x").is_err());
    /// ```
    pub fn new<T: Into<String>, V: Into<String>>(tag: T, value: V) -> Result<Self, FieldError> {
        let tag = tag.into();
        let value = value.into();
        if tag.len() != 2 || !tag.chars().all(|c| c.is_ascii_digit()) {
            return Err(FieldError::InvalidTag(tag));
        }
        if value.chars().count() > 99 {
            return Err(FieldError::ValueTooLong(value.chars().count()));
        }
        Ok(Self { tag, value })
    }

    /// Returns the 2-digit tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the value's character count, i.e. the length the encoded
    /// length prefix will carry.
    pub fn length(&self) -> usize {
        self.value.chars().count()
    }

    /// Returns the encoded character count of the whole field, header
    /// included.
    pub fn encoded_len(&self) -> usize {
        4 + self.length()
    }

    /// Decodes this field's value as a nested TLV sequence.
    ///
    /// The top-level codec treats values as opaque; this is the targeted
    /// descent for the few fields (merchant account information, additional
    /// data) that carry sub-fields.
    pub fn decode_nested(&self) -> Result<Vec<Field>, ParseError> {
        decode(&self.value)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}{}", self.tag, self.length(), self.value)
    }
}

/// Decodes a complete TLV stream into its top-level fields.
///
/// Walks the input left to right, reading a 2-digit tag, a 2-digit length,
/// and `length` characters of value, until the input is fully consumed.
/// Trailing garbage is indistinguishable from a truncated field and fails
/// the same way.
///
/// # Errors
///
/// See [`ParseError`]; the offset in each variant is where the walk stopped.
pub fn decode(payload: &str) -> Result<Vec<Field>, ParseError> {
    let chars: Vec<char> = payload.chars().collect();
    let mut fields = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let tag = read_pair(&chars, pos).ok_or(ParseError::TruncatedTag(pos))?;
        let length: usize =
            read_length(&chars, pos + 2).ok_or(ParseError::TruncatedLength(pos + 2))?;
        let value_start = pos + 4;
        let remaining = chars.len().saturating_sub(value_start);
        if remaining < length {
            return Err(ParseError::TruncatedValue {
                offset: value_start,
                declared: length,
                remaining,
            });
        }
        let value: String = chars[value_start..value_start + length].iter().collect();
        // Tag and length shape were just validated, so construction cannot fail.
        fields.push(Field { tag, value });
        pos = value_start + length;
    }

    Ok(fields)
}

/// Encodes fields back into a TLV stream.
///
/// The inverse of [`decode`]. No validation happens here; a [`Field`] is
/// valid by construction.
pub fn encode(fields: &[Field]) -> String {
    let mut out = String::with_capacity(fields.iter().map(Field::encoded_len).sum());
    for field in fields {
        out.push_str(&field.to_string());
    }
    out
}

fn read_pair(chars: &[char], pos: usize) -> Option<String> {
    let pair = chars.get(pos..pos + 2)?;
    if pair.iter().all(|c| c.is_ascii_digit()) {
        Some(pair.iter().collect())
    } else {
        None
    }
}

fn read_length(chars: &[char], pos: usize) -> Option<usize> {
    let pair = read_pair(chars, pos)?;
    pair.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_flat_sequence() {
        let fields = decode("00020101021126370014ID.CO.QRIS.WWW0215123456789012345").unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0], Field::new("00", "01").unwrap());
        assert_eq!(fields[1], Field::new("01", "11").unwrap());
        assert_eq!(fields[2].tag(), "26");
        assert_eq!(fields[2].length(), 37);
    }

    #[test]
    fn test_decode_empty_input_yields_no_fields() {
        assert_eq!(decode("").unwrap(), vec![]);
    }

    #[test]
    fn test_decode_zero_length_value() {
        let fields = decode("6200").unwrap();
        assert_eq!(fields[0].tag(), "62");
        assert_eq!(fields[0].value(), "");
    }

    #[test]
    fn test_decode_truncated_tag() {
        assert_eq!(decode("0002010").unwrap_err(), ParseError::TruncatedTag(6));
        assert_eq!(decode("XX0201").unwrap_err(), ParseError::TruncatedTag(0));
    }

    #[test]
    fn test_decode_truncated_length() {
        assert_eq!(decode("000201" /* ok */).unwrap().len(), 1);
        assert_eq!(decode("00020155").unwrap_err(), ParseError::TruncatedLength(8));
        assert_eq!(decode("00XX01").unwrap_err(), ParseError::TruncatedLength(2));
    }

    #[test]
    fn test_decode_truncated_value() {
        assert_eq!(
            decode("000501").unwrap_err(),
            ParseError::TruncatedValue {
                offset: 4,
                declared: 5,
                remaining: 2
            }
        );
    }

    #[test]
    fn test_length_prefix_consistency() {
        let payload = "0002010102115204541153033605802ID5910MERCHANT X";
        for field in decode(payload).unwrap() {
            assert_eq!(field.value().chars().count(), field.length());
        }
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let payload = "00020101021126370014ID.CO.QRIS.WWW02151234567890123455802ID";
        let fields = decode(payload).unwrap();
        assert_eq!(encode(&fields), payload);
    }

    #[test]
    fn test_nested_descent() {
        let fields = decode("26370014ID.CO.QRIS.WWW0215123456789012345").unwrap();
        let nested = fields[0].decode_nested().unwrap();
        assert_eq!(nested.len(), 2);
        assert_eq!(nested[0].value(), "ID.CO.QRIS.WWW");
        assert_eq!(nested[1].value(), "123456789012345");
    }

    #[test]
    fn test_field_constructor_rejects_bad_tag() {
        assert!(matches!(Field::new("5", "x"), Err(FieldError::InvalidTag(_))));
        assert!(matches!(Field::new("5a", "x"), Err(FieldError::InvalidTag(_))));
        assert!(matches!(Field::new("540", "x"), Err(FieldError::InvalidTag(_))));
    }

    #[test]
    fn test_field_constructor_rejects_oversized_value() {
        let long = "9".repeat(100);
        assert_eq!(Field::new("54", long).unwrap_err(), FieldError::ValueTooLong(100));
        assert!(Field::new("54", "9".repeat(99)).is_ok());
    }

    #[test]
    fn test_display_zero_pads_length() {
        let field = Field::new("54", "500").unwrap();
        assert_eq!(field.to_string(), "5403500");
    }
}
