use anyhow::Context;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

pub mod charge;
pub mod config;
pub mod error;
pub mod payload;
pub mod qr;

use charge::RentCharge;
use config::PixConfig;
pub use error::{PixError, Result};
pub use payload::{PixPayload, PixRequest, build_payload};
pub use qr::{ErrorCorrection, QrImage, QrOptions};

/// Payload plus its rendered QR code. Built fresh on every call.
#[derive(Debug, Clone)]
pub struct PixQrResult {
    pub payload: PixPayload,
    pub qr_image: QrImage,
}

/// Serializable form handed to front ends
#[derive(Debug, Clone, Serialize)]
pub struct PixQrSummary {
    pub payload: String,
    pub qr_data_url: String,
}

impl PixQrResult {
    pub fn summary(&self) -> PixQrSummary {
        PixQrSummary {
            payload: self.payload.to_string(),
            qr_data_url: self.qr_image.data_url(),
        }
    }
}

/// Build the payload, then render it as a PNG QR code on the blocking pool
pub async fn build_pix_qr(request: &PixRequest, options: &QrOptions) -> Result<PixQrResult> {
    let payload = build_payload(request)?;

    let data = payload.as_str().to_string();
    let options = options.clone();
    let qr_image = tokio::task::spawn_blocking(move || qr::render_png(&data, &options))
        .await
        .map_err(|e| PixError::Render(e.to_string()))??;

    tracing::info!(
        "Built PIX QR ({}x{} px, crc {})",
        qr_image.width,
        qr_image.height,
        payload.crc()
    );
    Ok(PixQrResult { payload, qr_image })
}

/// Same as [`build_pix_qr`] for callers without a runtime
pub fn build_pix_qr_blocking(request: &PixRequest, options: &QrOptions) -> Result<PixQrResult> {
    let payload = build_payload(request)?;
    let qr_image = qr::render_png(payload.as_str(), options)?;
    Ok(PixQrResult { payload, qr_image })
}

//Command from front end to backend
#[derive(Debug, Clone)]
pub enum PixCommand {
    /// Build a QR for explicit fields
    Build {
        request_id: String,
        request: PixRequest,
    },
    /// Build a QR for a contract's first rent, filling in defaults and a fresh txid
    BuildForCharge { request_id: String, charge: RentCharge },
}

impl PixCommand {
    /// Wrap a request under a new random id
    pub fn build(request: PixRequest) -> (String, Self) {
        let request_id = uuid::Uuid::new_v4().to_string();
        (
            request_id.clone(),
            PixCommand::Build {
                request_id,
                request,
            },
        )
    }

    pub fn request_id(&self) -> &str {
        match self {
            PixCommand::Build { request_id, .. } | PixCommand::BuildForCharge { request_id, .. } => {
                request_id
            }
        }
    }
}

//Report from backend to front end
#[derive(Debug, Clone)]
pub enum PixEvent {
    Built {
        request_id: String,
        result: PixQrResult,
    },
    Failed {
        request_id: String,
        error: String,
    },
}

async fn handle_command(command: PixCommand, config: &PixConfig) -> anyhow::Result<PixQrResult> {
    let request = match command {
        PixCommand::Build { request, .. } => request,
        PixCommand::BuildForCharge { charge, .. } => charge.to_request(&config.defaults),
    };

    build_pix_qr(&request, &config.qr)
        .await
        .with_context(|| format!("Failed to build PIX QR for key {:?}", request.pix_key))
}

/// Serve build commands until the command channel closes.
///
/// Requests run concurrently and independently; events arrive in completion
/// order. Returns once every accepted request has reported.
pub async fn run_backend(
    mut cmd_rx: mpsc::Receiver<PixCommand>,
    event_tx: mpsc::Sender<PixEvent>,
    config: PixConfig,
) {
    let config = Arc::new(config);
    let mut tasks = JoinSet::new();

    while let Some(command) = cmd_rx.recv().await {
        let config = config.clone();
        let event_tx = event_tx.clone();

        tasks.spawn(async move {
            let request_id = command.request_id().to_string();
            let event = match handle_command(command, &config).await {
                Ok(result) => PixEvent::Built { request_id, result },
                Err(e) => {
                    tracing::error!("{:#}", e);
                    PixEvent::Failed {
                        request_id,
                        error: format!("{:#}", e),
                    }
                }
            };

            if event_tx.send(event).await.is_err() {
                tracing::warn!("Event receiver dropped, discarding PIX result");
            }
        });

        // Drop finished tasks as we go
        while tasks.try_join_next().is_some() {}
    }

    while tasks.join_next().await.is_some() {}
    tracing::debug!("PIX backend stopped");
}
