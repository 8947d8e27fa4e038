//! End-to-end link runs: files on disk, a mock node, a recording announcer.

use async_trait::async_trait;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use node_link::blockchain::{
    AnnounceError, Announcer, HttpConnector, LinkAction, NetworkRepository, NodeTransactions, TransactionKind,
};
use node_link::config::{ClientConfig, FileConfigLoader, LinkParams, PresetData};
use node_link::{LinkError, LinkOrchestrator};

mod common;

const HASH: &str = "7FCCD304802016BEBBCD342A332F91FF1F3BB5E902988B352697BE245F48E836";

#[derive(Clone, Default)]
struct RecordingAnnouncer {
    calls: Arc<Mutex<Vec<Vec<NodeTransactions>>>>,
}

#[async_trait]
impl Announcer for RecordingAnnouncer {
    async fn announce(
        &self,
        repository: &dyn NetworkRepository,
        _preset: &PresetData,
        nodes: Vec<NodeTransactions>,
        generation_hash: &str,
    ) -> Result<(), AnnounceError> {
        assert_eq!(repository.get_generation_hash().await.unwrap(), generation_hash);
        self.calls.lock().unwrap().push(nodes);
        Ok(())
    }
}

fn key_pair_toml(table: &str, seed: u8) -> String {
    let private_key = node_link::blockchain::PrivateKey::from_bytes([seed; 32]);
    format!(
        "[{}]\nprivateKey = \"{}\"\npublicKey = \"{}\"\n",
        table,
        hex_of(seed),
        private_key.public_key()
    )
}

fn public_key_toml(table: &str, seed: u8) -> String {
    let private_key = node_link::blockchain::PrivateKey::from_bytes([seed; 32]);
    format!("[{}]\npublicKey = \"{}\"\n", table, private_key.public_key())
}

fn hex_of(seed: u8) -> String {
    format!("{:02X}", seed).repeat(32)
}

fn write_target(dir: &Path, generation_hash: &str) {
    fs::write(
        dir.join("preset.toml"),
        format!(
            "network_type = \"testnet\"\nnemesis_generation_hash_seed = \"{}\"\nvoting_key_link_v2 = false\n",
            generation_hash
        ),
    )
    .unwrap();

    let mut addresses = String::from("network_type = \"testnet\"\n\n");
    addresses.push_str("[[nodes]]\nname = \"peer-node\"\n");
    addresses.push_str(&key_pair_toml("nodes.main", 1));
    addresses.push_str(&key_pair_toml("nodes.remote", 2));
    addresses.push_str(&key_pair_toml("nodes.transport", 3));
    addresses.push_str(&public_key_toml("nodes.vrf", 4));
    addresses.push_str(&format!("[nodes.voting]\npublicKey = \"{}\"\n\n", hex_of(5)));
    addresses.push_str("[[nodes]]\nname = \"api-node\"\n");
    addresses.push_str(&key_pair_toml("nodes.main", 6));
    addresses.push_str(&key_pair_toml("nodes.transport", 7));
    fs::write(dir.join("addresses.toml"), addresses).unwrap();
}

async fn orchestrator_for(dir: &Path, unlink: bool) -> (LinkOrchestrator, RecordingAnnouncer) {
    let (addr, _) = common::start_mock_node(common::node_routes(HASH)).await;
    let params = LinkParams {
        target: dir.to_str().unwrap().to_string(),
        url: format!("http://{}/", addr),
        unlink,
        ..LinkParams::default()
    };
    let announcer = RecordingAnnouncer::default();
    let orchestrator = LinkOrchestrator::new(
        params,
        FileConfigLoader::new(),
        HttpConnector::new(ClientConfig::default()),
        announcer.clone(),
    );
    (orchestrator, announcer)
}

#[tokio::test]
async fn test_links_configured_nodes() {
    let dir = tempfile::tempdir().unwrap();
    write_target(dir.path(), HASH);
    let (orchestrator, announcer) = orchestrator_for(dir.path(), false).await;

    orchestrator.run(None, None).await.unwrap();

    let calls = announcer.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let nodes = &calls[0];
    assert_eq!(nodes.len(), 1, "api-node has nothing to link");
    assert_eq!(nodes[0].node.name, "peer-node");

    let kinds: Vec<_> = nodes[0].transactions.iter().map(|tx| tx.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            TransactionKind::AccountKeyLink,
            TransactionKind::NodeKeyLink,
            TransactionKind::VrfKeyLink,
            TransactionKind::VotingKeyLink,
        ]
    );
    assert!(nodes[0]
        .transactions
        .iter()
        .all(|tx| tx.header().action == LinkAction::Link && tx.header().max_fee == 100_000));
    let vrf_public = node_link::blockchain::PrivateKey::from_bytes([4; 32]).public_key();
    assert_eq!(nodes[0].transactions[2].linked_key_hex(), vrf_public.to_hex());
    assert_eq!(nodes[0].transactions[3].linked_key_hex(), format!("{}{}", hex_of(5), "00".repeat(16)));
}

#[tokio::test]
async fn test_unlinks_configured_nodes() {
    let dir = tempfile::tempdir().unwrap();
    write_target(dir.path(), HASH);
    let (orchestrator, announcer) = orchestrator_for(dir.path(), true).await;

    orchestrator.run(None, None).await.unwrap();

    let calls = announcer.calls.lock().unwrap();
    assert!(calls[0]
        .iter()
        .flat_map(|entry| entry.transactions.iter())
        .all(|tx| tx.header().action == LinkAction::Unlink));
}

#[tokio::test]
async fn test_wrong_network_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_target(dir.path(), "AAA");
    let (orchestrator, announcer) = orchestrator_for(dir.path(), false).await;

    let err = orchestrator.run(None, None).await.unwrap_err();

    assert!(matches!(err, LinkError::NetworkMismatch { .. }));
    assert!(err.to_string().contains(HASH));
    assert!(announcer.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_target_fails_before_network() {
    let dir = tempfile::tempdir().unwrap();
    let (orchestrator, announcer) = orchestrator_for(&dir.path().join("missing"), false).await;

    let err = orchestrator.run(None, None).await.unwrap_err();

    assert!(matches!(err, LinkError::Config(_)));
    assert!(announcer.calls.lock().unwrap().is_empty());
}
