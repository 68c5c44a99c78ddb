use super::constants::*;
use super::crc::crc16;
use super::sanitize::{
    AmountInput, parse_amount, sanitize_merchant_city, sanitize_merchant_name, sanitize_txid,
};
use super::tlv::{Node, Tag, TlvField, parse_fields, serialize_all};
use crate::error::{PixError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parameters of a PIX charge, as supplied by the caller (not yet sanitized)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixRequest {
    /// Email, phone, tax id or random key of the receiver
    pub pix_key: String,
    pub merchant_name: String,
    pub merchant_city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<AmountInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
}

impl PixRequest {
    pub fn new(
        pix_key: impl Into<String>,
        merchant_name: impl Into<String>,
        merchant_city: impl Into<String>,
    ) -> Self {
        Self {
            pix_key: pix_key.into(),
            merchant_name: merchant_name.into(),
            merchant_city: merchant_city.into(),
            amount: None,
            txid: None,
        }
    }

    pub fn with_amount(mut self, amount: impl Into<AmountInput>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn with_txid(mut self, txid: impl Into<String>) -> Self {
        self.txid = Some(txid.into());
        self
    }

    /// Arrange the request as the ordered field tree, CRC excluded
    pub fn to_nodes(&self) -> Vec<Node> {
        let txid = sanitize_txid(self.txid.as_deref());
        let amount = parse_amount(self.amount.as_ref()).into_amount();

        let mut account = vec![
            Node::leaf(MAI_GUI, PIX_GUI),
            Node::leaf(MAI_KEY, self.pix_key.as_str()),
        ];
        if let Some(txid) = &txid {
            account.push(Node::leaf(MAI_TXID, txid.as_str()));
        }

        let mut nodes = vec![
            Node::leaf(TAG_PAYLOAD_FORMAT, PAYLOAD_FORMAT_VERSION),
            Node::group(TAG_MERCHANT_ACCOUNT, account),
            Node::leaf(TAG_MERCHANT_CATEGORY, MERCHANT_CATEGORY_CODE),
            Node::leaf(TAG_CURRENCY, CURRENCY_BRL),
        ];
        if let Some(amount) = amount {
            nodes.push(Node::leaf(TAG_AMOUNT, amount.to_string()));
        }
        nodes.push(Node::leaf(TAG_COUNTRY, COUNTRY_CODE));
        nodes.push(Node::leaf(
            TAG_MERCHANT_NAME,
            sanitize_merchant_name(&self.merchant_name),
        ));
        nodes.push(Node::leaf(
            TAG_MERCHANT_CITY,
            sanitize_merchant_city(&self.merchant_city),
        ));
        if let Some(txid) = txid {
            nodes.push(Node::group(
                TAG_ADDITIONAL_DATA,
                vec![Node::leaf(ADF_REFERENCE_LABEL, txid)],
            ));
        }

        nodes
    }
}

/// Final "copy and paste" code, checksum included
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PixPayload(String);

impl PixPayload {
    /// Wrap a payload string, checking its structure and CRC
    pub fn parse(payload: impl Into<String>) -> Result<Self> {
        let payload = Self(payload.into());
        payload.verify()?;
        Ok(payload)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Everything the checksum covers, placeholder included
    pub fn body(&self) -> &str {
        let split = self.crc_offset();
        &self.0[..split]
    }

    /// Trailing 4 hex digits
    pub fn crc(&self) -> &str {
        let split = self.crc_offset();
        &self.0[split..]
    }

    fn crc_offset(&self) -> usize {
        // CRC digits are ASCII, so byte and char offsets agree here
        self.0.len().saturating_sub(CRC_LEN)
    }

    /// Top-level fields in order, including the CRC field
    pub fn fields(&self) -> Result<Vec<TlvField>> {
        parse_fields(&self.0)
    }

    pub fn field(&self, tag: Tag) -> Result<Option<TlvField>> {
        Ok(self.fields()?.into_iter().find(|f| f.tag == tag))
    }

    /// Reparse the payload and recompute the checksum over the body
    pub fn verify(&self) -> Result<()> {
        if !self.0.is_char_boundary(self.crc_offset()) || !self.body().ends_with(CRC_PLACEHOLDER)
        {
            return Err(PixError::Malformed(
                "missing CRC field at end of payload".to_string(),
            ));
        }

        let fields = self.fields()?;
        match fields.last() {
            Some(last) if last.tag == TAG_CRC => {}
            _ => {
                return Err(PixError::Malformed(
                    "CRC field is not the last field".to_string(),
                ));
            }
        }

        let expected = crc16(self.body());
        if expected != self.crc() {
            return Err(PixError::ChecksumMismatch {
                expected,
                found: self.crc().to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for PixPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PixPayload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Deserializing goes through `parse`, so a stored payload is checked on load
impl TryFrom<String> for PixPayload {
    type Error = PixError;

    fn try_from(payload: String) -> Result<Self> {
        Self::parse(payload)
    }
}

impl From<PixPayload> for String {
    fn from(payload: PixPayload) -> Self {
        payload.0
    }
}

/// Build the checksummed payload for a request
pub fn build_payload(request: &PixRequest) -> Result<PixPayload> {
    let mut body = serialize_all(&request.to_nodes())?;
    body.push_str(CRC_PLACEHOLDER);

    let crc = crc16(&body);
    body.push_str(&crc);

    tracing::debug!("Assembled PIX payload ({} chars, crc {})", body.chars().count(), crc);
    Ok(PixPayload(body))
}
