//! CRC16/CCITT-FALSE checksum for QRIS payloads.
//!
//! Every complete QRIS payload ends with a CRC field (tag `63`, length `04`)
//! whose value is the CRC16/CCITT-FALSE of every character preceding it,
//! including the `"6304"` tag/length prefix itself. Terminals recompute this
//! on scan and reject the payload on any mismatch, so the exact variant
//! matters: polynomial `0x1021`, initial register `0xFFFF`, no reflection,
//! no final XOR.

const POLYNOMIAL: u16 = 0x1021;
const INITIAL: u16 = 0xFFFF;

/// Computes the CRC16/CCITT-FALSE of `input` as 4 uppercase hex digits.
///
/// Characters are processed by their character code. EMV QR payloads are
/// ASCII by construction, which is the only range this function is specified
/// for; callers must not feed it arbitrary Unicode.
///
/// This is a total function: any ASCII input, including the empty string,
/// produces a checksum.
///
/// # Example
///
/// ```
/// use qris_core::crc::checksum;
///
/// assert_eq!(checksum("123456789"), "29B1");
/// assert_eq!(checksum(""), "FFFF");
/// ```
pub fn checksum(input: &str) -> String {
    let mut crc = INITIAL;
    for ch in input.chars() {
        crc ^= (ch as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ POLYNOMIAL;
            } else {
                crc <<= 1;
            }
        }
    }
    format!("{crc:04X}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_initial_register() {
        assert_eq!(checksum(""), "FFFF");
    }

    #[test]
    fn test_standard_check_vector() {
        // The published CRC-16/CCITT-FALSE check value.
        assert_eq!(checksum("123456789"), "29B1");
    }

    #[test]
    fn test_deterministic() {
        let payload = "0002010102125802ID540515000";
        assert_eq!(checksum(payload), checksum(payload));
    }

    #[test]
    fn test_output_is_four_uppercase_hex_digits() {
        for input in ["", "a", "0002", "a longer ascii payload 123"] {
            let out = checksum(input);
            assert_eq!(out.len(), 4);
            assert!(out.chars().all(|c| c.is_ascii_hexdigit()));
            assert_eq!(out, out.to_uppercase());
        }
    }

    #[test]
    fn test_single_character_mutations_change_checksum() {
        let base = "00020101021226370014ID.CO.QRIS.WWW5802ID6304";
        let reference = checksum(base);
        for i in 0..base.len() {
            let mut mutated: Vec<u8> = base.as_bytes().to_vec();
            mutated[i] = if mutated[i] == b'Z' { b'Y' } else { b'Z' };
            let mutated = String::from_utf8(mutated).unwrap();
            assert_ne!(checksum(&mutated), reference, "mutation at {i} undetected");
        }
    }
}
