//! Regression fixtures for complete payloads.

use pix_core::payload::{PixRequest, build_payload, crc16};

const VECTOR_BODY: &str = "00020126480014BR.GOV.BCB.PIX0116test@example.com0206ABC123\
520400005303986540510.005802BR5913FULANO DE TAL6009SAO PAULO62100506ABC1236304";

const MINIMAL_BODY: &str = "00020126380014BR.GOV.BCB.PIX0116test@example.com\
5204000053039865802BR5913FULANO DE TAL6009SAO PAULO6304";

fn sample() -> PixRequest {
    PixRequest::new("test@example.com", "Fulano De Tal", "Sao Paulo")
}

#[test]
fn test_full_vector() {
    let payload = build_payload(&sample().with_amount(10u32).with_txid("ABC123")).unwrap();

    assert_eq!(payload.body(), VECTOR_BODY);
    // Cross-checked against an independent CRC-16/CCITT-FALSE implementation
    assert_eq!(payload.crc(), "8612");
    assert_eq!(payload.as_str(), format!("{VECTOR_BODY}8612"));
}

#[test]
fn test_minimal_vector() {
    let payload = build_payload(&sample()).unwrap();

    assert_eq!(payload.body(), MINIMAL_BODY);
    assert_eq!(payload.crc(), "51F5");
}

#[test]
fn test_crc_recomputes_over_body() {
    assert_eq!(crc16(VECTOR_BODY), "8612");
    assert_eq!(crc16(MINIMAL_BODY), "51F5");
}

#[test]
fn test_string_amount_matches_numeric() {
    let from_number = build_payload(&sample().with_amount(10.0).with_txid("ABC123")).unwrap();
    let from_text = build_payload(&sample().with_amount("10,00").with_txid("ABC123")).unwrap();
    assert_eq!(from_number, from_text);
}

#[test]
fn test_deterministic() {
    let request = sample().with_amount("25,90").with_txid("XYZ");
    let first = build_payload(&request).unwrap();
    let second = build_payload(&request).unwrap();
    assert_eq!(first, second);
}
