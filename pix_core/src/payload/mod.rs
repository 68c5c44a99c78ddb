//! EMV merchant-presented / PIX "copy and paste" payload codec.

mod builder;
pub mod constants;
pub mod crc;
pub mod sanitize;
pub mod tlv;

pub use builder::{PixPayload, PixRequest, build_payload};
pub use self::crc::crc16;
pub use sanitize::{Amount, AmountInput, AmountOutcome, parse_amount};
pub use tlv::{Node, Tag, TlvField, encode_field};
