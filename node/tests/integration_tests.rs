//! Cross-crate tests: real LMDB stores, real HTTP between nodes.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use armor_node::{ArmorNode, NodeConfig};
use armor_nullables::sample_portrait;
use armor_registry::{CancelSignal, RegistryError, RetryPolicy};
use armor_store::ProofStore;
use armor_types::{
    Classification, ContentHash, FaceHash, ImageHashes, VerificationResult, WatermarkHash,
};
use armor_verification::VerifyError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::net::TcpListener;

fn config(dir: &Path) -> NodeConfig {
    NodeConfig {
        data_dir: dir.to_path_buf(),
        retry: RetryPolicy::immediate(1),
        ledger_timeout_ms: 1_000,
        ..NodeConfig::default()
    }
}

/// Start `node` on an ephemeral port and return its address.
async fn spawn(node: Arc<ArmorNode>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { node.serve(listener).await });
    addr
}

#[tokio::test]
async fn remote_ledger_round_trip() {
    let ledger_dir = tempfile::tempdir().unwrap();
    let ledger_node = Arc::new(ArmorNode::new(config(ledger_dir.path())).unwrap());
    let addr = spawn(ledger_node.clone()).await;

    let client_dir = tempfile::tempdir().unwrap();
    let client = ArmorNode::new(NodeConfig {
        ledger_url: Some(format!("http://{addr}")),
        ..config(client_dir.path())
    })
    .unwrap();

    let engine = &client.state().engine;
    let wallet = &client.state().wallet;
    let cancel = CancelSignal::never();
    let image = sample_portrait(1, false);

    let record = engine
        .register(&image, wallet, armor_types::Timestamp::new(1_700_000_000), &cancel)
        .await
        .unwrap();
    // Committed on the ledger node, not locally.
    assert_eq!(
        ledger_node.store.get_by_face_hash(record.face_hash()).unwrap(),
        Some(record.clone())
    );
    assert_eq!(client.store.proof_count().unwrap(), 0);

    let verified = engine.verify(&image, &cancel).await.unwrap();
    assert_eq!(verified.classification, Classification::Verified { proof: record.clone() });

    let reencoded = engine.verify(&sample_portrait(1, true), &cancel).await.unwrap();
    assert!(matches!(reencoded.classification, Classification::Mismatched { .. }));

    // A second registration of the same face keeps the first record.
    let err = engine
        .register(&sample_portrait(1, true), wallet, armor_types::Timestamp::new(1_700_000_500), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        VerifyError::Registry(RegistryError::AlreadyRegistered { tx_id }) if tx_id == record.tx_id
    ));

    ledger_node.stop();
}

#[tokio::test]
async fn unreachable_ledger_is_unavailable_not_absent() {
    let dir = tempfile::tempdir().unwrap();
    let node = ArmorNode::new(NodeConfig {
        ledger_url: Some("http://127.0.0.1:9".into()),
        ledger_timeout_ms: 500,
        ..config(dir.path())
    })
    .unwrap();
    let err = node
        .state()
        .engine
        .verify(&sample_portrait(2, false), &CancelSignal::never())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        VerifyError::Registry(RegistryError::Unavailable { attempts: 2, .. })
    ));
}

#[tokio::test]
async fn state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let (address, record) = {
        let node = ArmorNode::new(config(dir.path())).unwrap();
        let record = node
            .state()
            .engine
            .register(
                &sample_portrait(3, false),
                &node.state().wallet,
                armor_types::Timestamp::new(1_700_000_000),
                &CancelSignal::never(),
            )
            .await
            .unwrap();
        (node.wallet_address().clone(), record)
    };

    let node = ArmorNode::new(config(dir.path())).unwrap();
    assert_eq!(node.wallet_address(), &address);
    assert_eq!(node.store.get_by_tx(&record.tx_id).unwrap(), Some(record));
}

#[tokio::test]
async fn http_api_counts_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let node = Arc::new(
        ArmorNode::new(NodeConfig {
            enable_metrics: true,
            ..config(dir.path())
        })
        .unwrap(),
    );
    let addr = spawn(node.clone()).await;
    let http = reqwest::Client::new();
    let image = STANDARD.encode(sample_portrait(4, false).bytes());

    let resp = http
        .post(format!("http://{addr}/v1/proofs"))
        .json(&serde_json::json!({ "image": image }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

    let resp = http
        .post(format!("http://{addr}/v1/verify"))
        .json(&serde_json::json!({ "image": image }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    let health: serde_json::Value = http
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["proof_count"], 1);

    let metrics = http
        .get(format!("http://{addr}/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(metrics.contains("armor_registrations_total 1"));
    assert!(metrics.contains(r#"armor_verifications_total{classification="verified"} 1"#));

    node.stop();
}

#[tokio::test]
async fn stop_ends_serving() {
    let dir = tempfile::tempdir().unwrap();
    let node = Arc::new(ArmorNode::new(config(dir.path())).unwrap());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let serving = {
        let node = node.clone();
        tokio::spawn(async move { node.serve(listener).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    node.stop();
    let result = tokio::time::timeout(Duration::from_secs(5), serving)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
    assert!(node.state().cancel.is_cancelled());
}

#[test]
fn concurrent_scans_get_distinct_ids() {
    let dir = tempfile::tempdir().unwrap();
    let node = ArmorNode::new(config(dir.path())).unwrap();
    let result = VerificationResult {
        submitted: ImageHashes {
            face: FaceHash::new([1; 32]),
            content: ContentHash::new([2; 32]),
            watermark: WatermarkHash::ZERO,
        },
        classification: Classification::NotFound,
    };
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let defense = node.state().defense.clone();
            let result = result.clone();
            std::thread::spawn(move || {
                (0..200)
                    .map(|_| defense.record_scan(&result).unwrap().scan_id)
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    let ids: std::collections::BTreeSet<String> =
        handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
    assert_eq!(ids.len(), 1600);
    assert_eq!(node.state().defense.scans().metrics().unwrap().total_scans, 1600);
}
