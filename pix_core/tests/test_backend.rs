//! Tests for the command/event backend loop.

use pix_core::charge::RentCharge;
use pix_core::config::PixConfig;
use pix_core::payload::constants::{TAG_AMOUNT, TAG_MERCHANT_CITY, TAG_MERCHANT_NAME};
use pix_core::{PixCommand, PixEvent, PixRequest, run_backend};
use std::collections::HashMap;
use tokio::sync::mpsc;

fn spawn_backend() -> (mpsc::Sender<PixCommand>, mpsc::Receiver<PixEvent>) {
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (event_tx, event_rx) = mpsc::channel(16);
    tokio::spawn(run_backend(cmd_rx, event_tx, PixConfig::default()));
    (cmd_tx, event_rx)
}

#[tokio::test]
async fn test_build_command_reports_built() {
    let (cmd_tx, mut event_rx) = spawn_backend();

    let (request_id, command) = PixCommand::build(PixRequest::new("k@x.com", "Ana", "Natal"));
    cmd_tx.send(command).await.unwrap();

    match event_rx.recv().await.expect("Should receive event") {
        PixEvent::Built { request_id: id, result } => {
            assert_eq!(id, request_id);
            result.payload.verify().unwrap();
        }
        other => panic!("Expected Built, got {:?}", other),
    }
}

#[tokio::test]
async fn test_failure_reports_failed_with_id() {
    let (cmd_tx, mut event_rx) = spawn_backend();

    let (request_id, command) = PixCommand::build(PixRequest::new("k".repeat(150), "Ana", "Natal"));
    cmd_tx.send(command).await.unwrap();

    match event_rx.recv().await.expect("Should receive event") {
        PixEvent::Failed { request_id: id, error } => {
            assert_eq!(id, request_id);
            assert!(error.contains("Failed to build PIX QR"));
            assert!(error.contains("max 99"));
        }
        other => panic!("Expected Failed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_many_requests_all_answered() {
    let (cmd_tx, mut event_rx) = spawn_backend();

    let mut expected = HashMap::new();
    for i in 0..10 {
        let request = PixRequest::new("k@x.com", "Ana", "Natal").with_txid(format!("T{i}"));
        let (id, command) = PixCommand::build(request);
        expected.insert(id, format!("T{i}"));
        cmd_tx.send(command).await.unwrap();
    }
    drop(cmd_tx);

    let mut seen = 0;
    while let Some(event) = event_rx.recv().await {
        let PixEvent::Built { request_id, result } = event else {
            panic!("Unexpected failure");
        };
        let txid = expected.remove(&request_id).expect("Unknown request id");
        assert!(result.payload.as_str().contains(&format!("05{:02}{txid}", txid.len())));
        seen += 1;
    }

    assert_eq!(seen, 10);
    assert!(expected.is_empty());
}

#[tokio::test]
async fn test_charge_command_uses_defaults() {
    let (cmd_tx, mut event_rx) = spawn_backend();

    let charge = RentCharge {
        contract_id: 42,
        price: Some("1500.00".to_string()),
        ..Default::default()
    };
    cmd_tx
        .send(PixCommand::BuildForCharge {
            request_id: "charge-42".to_string(),
            charge,
        })
        .await
        .unwrap();

    match event_rx.recv().await.expect("Should receive event") {
        PixEvent::Built { request_id, result } => {
            assert_eq!(request_id, "charge-42");
            let payload = result.payload;
            assert_eq!(payload.field(TAG_MERCHANT_NAME).unwrap().unwrap().value, "QUARTINHO");
            assert_eq!(payload.field(TAG_MERCHANT_CITY).unwrap().unwrap().value, "CIDADE");
            assert_eq!(payload.field(TAG_AMOUNT).unwrap().unwrap().value, "1500.00");
            assert!(payload.as_str().contains("pix:42@quartinho-pix.simulado"));
        }
        other => panic!("Expected Built, got {:?}", other),
    }
}
