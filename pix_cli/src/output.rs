use anyhow::{Context, Result};
use pix_core::{ErrorCorrection, PixQrResult, QrImage, qr};
use std::fs;
use std::path::Path;

/// Write the PNG bytes, creating parent directories as needed
pub fn write_png(path: &Path, image: &QrImage) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, &image.png).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(
        "Wrote {}x{} QR code to {}",
        image.width,
        image.height,
        path.display()
    );
    Ok(())
}

pub fn print_json(result: &PixQrResult) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&result.summary())?);
    Ok(())
}

pub fn print_text(result: &PixQrResult, with_qr: bool, level: ErrorCorrection) -> Result<()> {
    if with_qr {
        println!("{}", qr::render_terminal(result.payload.as_str(), level)?);
    }
    println!("PIX copia e cola:");
    println!("{}", result.payload);
    Ok(())
}
