use super::tlv::Tag;

/// Payload format indicator, always "01"
pub const TAG_PAYLOAD_FORMAT: Tag = Tag::from_digits(*b"00");
/// Merchant account information (nested)
pub const TAG_MERCHANT_ACCOUNT: Tag = Tag::from_digits(*b"26");
pub const TAG_MERCHANT_CATEGORY: Tag = Tag::from_digits(*b"52");
pub const TAG_CURRENCY: Tag = Tag::from_digits(*b"53");
pub const TAG_AMOUNT: Tag = Tag::from_digits(*b"54");
pub const TAG_COUNTRY: Tag = Tag::from_digits(*b"58");
pub const TAG_MERCHANT_NAME: Tag = Tag::from_digits(*b"59");
pub const TAG_MERCHANT_CITY: Tag = Tag::from_digits(*b"60");
/// Additional data field template (nested)
pub const TAG_ADDITIONAL_DATA: Tag = Tag::from_digits(*b"62");
pub const TAG_CRC: Tag = Tag::from_digits(*b"63");

// Sub-tags of the merchant account information group
pub const MAI_GUI: Tag = Tag::from_digits(*b"00");
pub const MAI_KEY: Tag = Tag::from_digits(*b"01");
pub const MAI_TXID: Tag = Tag::from_digits(*b"02");

// Sub-tag of the additional data field template
pub const ADF_REFERENCE_LABEL: Tag = Tag::from_digits(*b"05");

pub const PAYLOAD_FORMAT_VERSION: &str = "01";
pub const PIX_GUI: &str = "BR.GOV.BCB.PIX";
pub const MERCHANT_CATEGORY_CODE: &str = "0000";
/// ISO 4217 numeric code for BRL
pub const CURRENCY_BRL: &str = "986";
pub const COUNTRY_CODE: &str = "BR";

pub const MAX_MERCHANT_NAME_LEN: usize = 25;
pub const MAX_MERCHANT_CITY_LEN: usize = 15;
pub const MAX_TXID_LEN: usize = 25;

/// Largest value length expressible in a two digit length prefix
pub const MAX_VALUE_LEN: usize = 99;

/// Tag and length header of the CRC field, checksummed before the CRC itself exists
pub const CRC_PLACEHOLDER: &str = "6304";
/// Hex digits in the trailing checksum
pub const CRC_LEN: usize = 4;
