//! Configuration schema definitions.
//!
//! Run parameters, the network preset, and the per-node key records.
//! Preset and address types derive Serde traits for deserialization from
//! the target's TOML files.

use serde::{Deserialize, Serialize};

use crate::blockchain::account::{KeyPair, KeyRecord, PublicKey};
use crate::blockchain::types::NetworkType;

/// Parameters for one link/unlink run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkParams {
    /// Root folder of the node configuration.
    pub target: String,

    /// Password for encrypted key material.
    pub password: Option<String>,

    /// REST endpoint of a network node.
    pub url: String,

    /// Fee ceiling per transaction, in currency base units.
    pub max_fee: u64,

    /// Revoke links instead of registering them.
    pub unlink: bool,
}

impl Default for LinkParams {
    fn default() -> Self {
        Self {
            target: "target".to_string(),
            password: None,
            url: "http://localhost:3000".to_string(),
            max_fee: 100_000,
            unlink: false,
        }
    }
}

/// Network-wide parameters of the preset the nodes were configured with.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct PresetData {
    /// Network the nodes belong to.
    pub network_type: NetworkType,

    /// Generation hash seed of the expected network.
    pub nemesis_generation_hash_seed: String,

    /// First finalization epoch a voting key is valid for.
    pub voting_key_start_epoch: u32,

    /// Last finalization epoch a voting key is valid for.
    pub voting_key_end_epoch: u32,

    /// Use 32-byte voting keys (link v2) instead of 48-byte v1 keys.
    pub voting_key_link_v2: bool,
}

impl Default for PresetData {
    fn default() -> Self {
        Self {
            network_type: NetworkType::TestNet,
            nemesis_generation_hash_seed: String::new(),
            voting_key_start_epoch: 1,
            voting_key_end_epoch: 360,
            voting_key_link_v2: true,
        }
    }
}

/// Voting key material of a node.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VotingKey {
    pub public_key: PublicKey,
}

/// Key records of one node.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct NodeAccount {
    /// Node identifier.
    pub name: String,

    /// Main (CA) account; signs every link transaction of the node.
    #[serde(default)]
    pub main: Option<KeyPair>,

    /// Remote harvesting account.
    #[serde(default)]
    pub remote: Option<KeyRecord>,

    /// VRF key.
    #[serde(default)]
    pub vrf: Option<KeyRecord>,

    /// Node transport key; required when `remote` is set.
    #[serde(default)]
    pub transport: Option<KeyRecord>,

    /// Finalization voting key.
    #[serde(default)]
    pub voting: Option<VotingKey>,
}

impl NodeAccount {
    /// A node with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            main: None,
            remote: None,
            vrf: None,
            transport: None,
            voting: None,
        }
    }

    /// Whether the node has any key that can be linked to its main account.
    pub fn has_linkable_keys(&self) -> bool {
        self.remote.is_some() || self.voting.is_some() || self.vrf.is_some()
    }

    /// Whether a run links this node: it needs a main account and something to link.
    pub fn is_linkable(&self) -> bool {
        self.main.is_some() && self.has_linkable_keys()
    }
}

/// Stored addresses and keys of all nodes in a target.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Addresses {
    pub network_type: NetworkType,

    #[serde(default)]
    pub nodes: Vec<NodeAccount>,
}

/// Network client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}
