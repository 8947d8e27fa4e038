//! Key-link transaction model.
//!
//! # Responsibilities
//! - Describe the four key-link transaction kinds as one tagged type
//! - Compute deadlines relative to the network epoch
//! - Build voting key links from preset voting parameters
//!
//! Transactions are plain values. Signing and serialization belong to the
//! announce collaborator.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::blockchain::account::{PublicKey, KEY_SIZE};
use crate::blockchain::types::NetworkType;
use crate::config::schema::PresetData;

/// Default time a transaction stays valid after creation.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(2 * 60 * 60);

/// Size of a version 1 voting public key.
pub const VOTING_KEY_V1_SIZE: usize = 48;

/// Whether a transaction registers or revokes a key delegation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkAction {
    Unlink,
    Link,
}

impl LinkAction {
    /// Action for an unlink flag.
    pub fn from_unlink(unlink: bool) -> Self {
        if unlink {
            LinkAction::Unlink
        } else {
            LinkAction::Link
        }
    }
}

impl fmt::Display for LinkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkAction::Unlink => write!(f, "Unlink"),
            LinkAction::Link => write!(f, "Link"),
        }
    }
}

/// Transaction deadline in milliseconds since the network epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Deadline(u64);

impl Deadline {
    /// Deadline two hours from now.
    ///
    /// # Arguments
    /// * `epoch_adjustment` - Network epoch start, in seconds since the Unix epoch
    pub fn create(epoch_adjustment: u64) -> Self {
        Self::create_at(SystemTime::now(), epoch_adjustment, DEFAULT_DEADLINE)
    }

    /// Deadline `duration` after `now`.
    pub fn create_at(now: SystemTime, epoch_adjustment: u64, duration: Duration) -> Self {
        let now_ms = now
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let network_ms = now_ms.saturating_sub(epoch_adjustment.saturating_mul(1000));
        Self(network_ms.saturating_add(duration.as_millis() as u64))
    }

    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Milliseconds since the network epoch.
    pub fn as_millis(&self) -> u64 {
        self.0
    }
}

/// Fields shared by every key-link transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionHeader {
    pub network_type: NetworkType,
    pub deadline: Deadline,
    /// Fee ceiling in raw currency base units.
    pub max_fee: u64,
    pub action: LinkAction,
}

impl TransactionHeader {
    pub fn new(network_type: NetworkType, deadline: Deadline, max_fee: u64, action: LinkAction) -> Self {
        Self {
            network_type,
            deadline,
            max_fee,
            action,
        }
    }
}

/// Voting public key in the format the network expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VotingPublicKey {
    /// 48-byte key used before voting key link v2.
    V1([u8; VOTING_KEY_V1_SIZE]),
    /// 32-byte key.
    V2(PublicKey),
}

impl VotingPublicKey {
    /// Version 1 form: the public key right-padded with zero bytes.
    pub fn v1(public_key: &PublicKey) -> Self {
        let mut bytes = [0u8; VOTING_KEY_V1_SIZE];
        bytes[..KEY_SIZE].copy_from_slice(public_key.as_bytes());
        VotingPublicKey::V1(bytes)
    }

    pub fn version(&self) -> u8 {
        match self {
            VotingPublicKey::V1(_) => 1,
            VotingPublicKey::V2(_) => 2,
        }
    }

    pub fn to_hex(&self) -> String {
        match self {
            VotingPublicKey::V1(bytes) => hex::encode_upper(bytes),
            VotingPublicKey::V2(key) => key.to_hex(),
        }
    }
}

/// Kind tag of a key-link transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    AccountKeyLink,
    NodeKeyLink,
    VrfKeyLink,
    VotingKeyLink,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionKind::AccountKeyLink => "AccountKeyLinkTransaction",
            TransactionKind::NodeKeyLink => "NodeKeyLinkTransaction",
            TransactionKind::VrfKeyLink => "VrfKeyLinkTransaction",
            TransactionKind::VotingKeyLink => "VotingKeyLinkTransaction",
        };
        write!(f, "{}", name)
    }
}

/// A key-link transaction ready to be signed by the node's main account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    /// Delegates harvesting to a remote account.
    AccountKeyLink {
        header: TransactionHeader,
        linked_public_key: PublicKey,
    },
    /// Links the node transport key.
    NodeKeyLink {
        header: TransactionHeader,
        linked_public_key: PublicKey,
    },
    /// Links the VRF key used in block producer selection.
    VrfKeyLink {
        header: TransactionHeader,
        linked_public_key: PublicKey,
    },
    /// Links a finalization voting key for an epoch range.
    VotingKeyLink {
        header: TransactionHeader,
        linked_public_key: VotingPublicKey,
        start_epoch: u32,
        end_epoch: u32,
    },
}

impl Transaction {
    pub fn account_key_link(header: TransactionHeader, linked_public_key: PublicKey) -> Self {
        Transaction::AccountKeyLink {
            header,
            linked_public_key,
        }
    }

    pub fn node_key_link(header: TransactionHeader, linked_public_key: PublicKey) -> Self {
        Transaction::NodeKeyLink {
            header,
            linked_public_key,
        }
    }

    pub fn vrf_key_link(header: TransactionHeader, linked_public_key: PublicKey) -> Self {
        Transaction::VrfKeyLink {
            header,
            linked_public_key,
        }
    }

    pub fn voting_key_link(
        header: TransactionHeader,
        linked_public_key: VotingPublicKey,
        start_epoch: u32,
        end_epoch: u32,
    ) -> Self {
        Transaction::VotingKeyLink {
            header,
            linked_public_key,
            start_epoch,
            end_epoch,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        match self {
            Transaction::AccountKeyLink { .. } => TransactionKind::AccountKeyLink,
            Transaction::NodeKeyLink { .. } => TransactionKind::NodeKeyLink,
            Transaction::VrfKeyLink { .. } => TransactionKind::VrfKeyLink,
            Transaction::VotingKeyLink { .. } => TransactionKind::VotingKeyLink,
        }
    }

    pub fn header(&self) -> &TransactionHeader {
        match self {
            Transaction::AccountKeyLink { header, .. }
            | Transaction::NodeKeyLink { header, .. }
            | Transaction::VrfKeyLink { header, .. }
            | Transaction::VotingKeyLink { header, .. } => header,
        }
    }

    /// Hex form of the key being linked or unlinked.
    pub fn linked_key_hex(&self) -> String {
        match self {
            Transaction::AccountKeyLink {
                linked_public_key, ..
            }
            | Transaction::NodeKeyLink {
                linked_public_key, ..
            }
            | Transaction::VrfKeyLink {
                linked_public_key, ..
            } => linked_public_key.to_hex(),
            Transaction::VotingKeyLink {
                linked_public_key, ..
            } => linked_public_key.to_hex(),
        }
    }
}

/// Build a voting key link using the preset's epoch range and key format.
pub fn create_voting_key_transaction(
    voting_public_key: &PublicKey,
    action: LinkAction,
    preset: &PresetData,
    deadline: Deadline,
    max_fee: u64,
) -> Transaction {
    let linked_public_key = if preset.voting_key_link_v2 {
        VotingPublicKey::V2(*voting_public_key)
    } else {
        VotingPublicKey::v1(voting_public_key)
    };
    let header = TransactionHeader::new(preset.network_type, deadline, max_fee, action);
    Transaction::voting_key_link(
        header,
        linked_public_key,
        preset.voting_key_start_epoch,
        preset.voting_key_end_epoch,
    )
}
