use thiserror::Error;

#[derive(Debug, Error)]
pub enum PixError {
    #[error("invalid tag {0:?}: expected exactly two ASCII digits")]
    InvalidTag(String),
    #[error("value for tag {tag} is {len} chars, max {max}", max = crate::payload::constants::MAX_VALUE_LEN)]
    FieldTooLong { tag: String, len: usize },
    #[error("malformed payload: {0}")]
    Malformed(String),
    #[error("checksum mismatch: payload carries {found}, computed {expected}")]
    ChecksumMismatch { expected: String, found: String },
    #[error(transparent)]
    QrEncode(#[from] qrcode::types::QrError),
    #[error(transparent)]
    ImageEncode(#[from] image::ImageError),
    #[error("QR rendering task failed: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, PixError>;
