//! CRC-16/CCITT-FALSE (poly 0x1021, init 0xFFFF, no reflection, no final xor)

use crc::{CRC_16_IBM_3740, Crc};

// CRC_16_IBM_3740 is the catalogue name of CCITT-FALSE
const CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_3740);

/// Checksum a byte stream
pub fn crc16_ccitt(bytes: impl IntoIterator<Item = u8>) -> u16 {
    let bytes: Vec<u8> = bytes.into_iter().collect();
    CRC.checksum(&bytes)
}

/// Checksum a payload string as 4 uppercase hex digits.
///
/// Each character counts as one byte: the low 8 bits of its code point.
pub fn crc16(input: &str) -> String {
    let crc = crc16_ccitt(input.chars().map(|c| (c as u32 & 0xFF) as u8));
    format!("{crc:04X}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_value() {
        assert_eq!(crc16_ccitt(*b"123456789"), 0x29B1);
        assert_eq!(crc16("123456789"), "29B1");
    }

    #[test]
    fn test_matches_bitwise_reference() {
        // Shift register form of the same polynomial, one byte at a time
        fn bitwise(bytes: &[u8]) -> u16 {
            let mut crc: u16 = 0xFFFF;
            for &b in bytes {
                crc ^= (b as u16) << 8;
                for _ in 0..8 {
                    if crc & 0x8000 != 0 {
                        crc = (crc << 1) ^ 0x1021;
                    } else {
                        crc <<= 1;
                    }
                }
            }
            crc
        }

        for input in [&b""[..], b"A", b"6304", b"00020126480014BR.GOV.BCB.PIX"] {
            assert_eq!(crc16_ccitt(input.iter().copied()), bitwise(input));
        }
    }

    #[test]
    fn test_empty_input_is_init() {
        assert_eq!(crc16(""), "FFFF");
    }

    #[test]
    fn test_zero_padded_uppercase() {
        for input in ["", "a", "0002010", "6304", "PIX", "BR.GOV.BCB.PIX"] {
            let crc = crc16(input);
            assert_eq!(crc.len(), 4);
            assert!(crc.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
            assert!(crc.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn test_latin1_chars_use_code_point() {
        // 'Ã' is U+00C3, which must checksum like the single byte 0xC3
        assert_eq!(crc16("SÃO"), format!("{:04X}", crc16_ccitt([b'S', 0xC3, b'O'])));
    }
}
