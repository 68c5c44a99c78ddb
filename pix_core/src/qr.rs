use crate::error::{PixError, Result};
use base64::{Engine as _, engine::general_purpose};
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::render::unicode::Dense1x2;
use qrcode::{EcLevel, QrCode};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::str::FromStr;

/// QR error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCorrection {
    Low,
    #[default]
    Medium,
    Quartile,
    High,
}

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::Low => EcLevel::L,
            ErrorCorrection::Medium => EcLevel::M,
            ErrorCorrection::Quartile => EcLevel::Q,
            ErrorCorrection::High => EcLevel::H,
        }
    }
}

impl FromStr for ErrorCorrection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(ErrorCorrection::Low),
            "m" | "medium" => Ok(ErrorCorrection::Medium),
            "q" | "quartile" => Ok(ErrorCorrection::Quartile),
            "h" | "high" => Ok(ErrorCorrection::High),
            other => Err(format!("unknown error correction level: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrOptions {
    pub error_correction: ErrorCorrection,
    /// Minimum image side in pixels; `max_dimension` takes precedence
    pub min_dimension: u32,
    /// Maximum image side in pixels
    pub max_dimension: u32,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            error_correction: ErrorCorrection::Medium,
            min_dimension: 200,
            max_dimension: 400,
        }
    }
}

/// Rendered PNG image of a QR code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl QrImage {
    /// Embeddable `data:image/png;base64,...` URL
    pub fn data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            general_purpose::STANDARD.encode(&self.png)
        )
    }
}

fn encode(data: &str, level: ErrorCorrection) -> Result<QrCode> {
    Ok(QrCode::with_error_correction_level(
        data.as_bytes(),
        level.into(),
    )?)
}

/// Render `data` as a grayscale PNG QR code
pub fn render_png(data: &str, options: &QrOptions) -> Result<QrImage> {
    if options.min_dimension > options.max_dimension {
        return Err(PixError::Render(format!(
            "min dimension {} exceeds max dimension {}",
            options.min_dimension, options.max_dimension
        )));
    }

    let code = encode(data, options.error_correction)?;
    let buffer = code
        .render::<Luma<u8>>()
        .min_dimensions(options.min_dimension, options.min_dimension)
        .max_dimensions(options.max_dimension, options.max_dimension)
        .build();

    let (width, height) = buffer.dimensions();
    let mut png = Vec::new();
    DynamicImage::ImageLuma8(buffer).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

    Ok(QrImage { png, width, height })
}

/// Render `data` as half-block characters for a terminal (light modules on dark background)
pub fn render_terminal(data: &str, level: ErrorCorrection) -> Result<String> {
    let code = encode(data, level)?;
    Ok(code
        .render::<Dense1x2>()
        .dark_color(Dense1x2::Light)
        .light_color(Dense1x2::Dark)
        .build())
}
