//! Key material and account identity.
//!
//! # Security
//! - Private keys are never logged or displayed
//! - Accounts are derived on demand and dropped with the run

use ed25519_dalek::SigningKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::blockchain::types::{KeyError, NetworkType};

/// Size of public and private keys in bytes.
pub const KEY_SIZE: usize = 32;

fn decode_key(value: &str) -> Result<[u8; KEY_SIZE], KeyError> {
    let bytes = hex::decode(value.trim()).map_err(|e| KeyError::InvalidHex(e.to_string()))?;
    if bytes.len() != KEY_SIZE {
        return Err(KeyError::InvalidLength {
            expected: KEY_SIZE,
            actual: bytes.len(),
        });
    }
    let mut key = [0u8; KEY_SIZE];
    key.copy_from_slice(&bytes);
    Ok(key)
}

/// A 32-byte public key, displayed as upper-case hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; KEY_SIZE]);

impl PublicKey {
    /// Parse from a hex string (either case).
    pub fn from_hex(value: &str) -> Result<Self, KeyError> {
        decode_key(value).map(Self)
    }

    pub const fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A 32-byte ed25519 private key seed.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey([u8; KEY_SIZE]);

impl PrivateKey {
    /// Parse from a hex string (either case).
    pub fn from_hex(value: &str) -> Result<Self, KeyError> {
        decode_key(value).map(Self)
    }

    pub const fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Derive the matching public key.
    pub fn public_key(&self) -> PublicKey {
        let signing = SigningKey::from_bytes(&self.0);
        PublicKey(signing.verifying_key().to_bytes())
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey(<redacted>)")
    }
}

impl Serialize for PrivateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode_upper(self.0))
    }
}

impl<'de> Deserialize<'de> for PrivateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A private/public key pair stored for a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPair {
    pub private_key: PrivateKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Build a pair from a private key, deriving the public half.
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        let public_key = private_key.public_key();
        Self {
            private_key,
            public_key,
        }
    }
}

/// A stored key whose private half is optional.
///
/// Remote, VRF and transport keys only need their public key to be linked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyRecord {
    pub public_key: PublicKey,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<PrivateKey>,
}

impl KeyRecord {
    /// A record carrying only the public key.
    pub fn public(public_key: PublicKey) -> Self {
        Self {
            public_key,
            private_key: None,
        }
    }

    /// Whether the stored private key (if any) derives the stored public key.
    pub fn is_consistent(&self) -> bool {
        self.private_key
            .as_ref()
            .map_or(true, |private_key| private_key.public_key() == self.public_key)
    }
}

impl From<KeyPair> for KeyRecord {
    fn from(pair: KeyPair) -> Self {
        Self {
            public_key: pair.public_key,
            private_key: Some(pair.private_key),
        }
    }
}

/// An account identity derived from a private key.
#[derive(Debug, Clone)]
pub struct Account {
    public_key: PublicKey,
    network_type: NetworkType,
}

impl Account {
    /// Derive the account for a private key on the given network.
    pub fn from_private_key(private_key: &PrivateKey, network_type: NetworkType) -> Self {
        Self {
            public_key: private_key.public_key(),
            network_type,
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.public_key, self.network_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 8032 test vector 1
    const TEST_PRIVATE_KEY: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
    const TEST_PUBLIC_KEY: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";

    #[test]
    fn test_public_key_derivation() {
        let private_key = PrivateKey::from_hex(TEST_PRIVATE_KEY).unwrap();
        assert_eq!(private_key.public_key().to_hex(), TEST_PUBLIC_KEY.to_uppercase());
    }

    #[test]
    fn test_public_key_case_insensitive() {
        let lower = PublicKey::from_hex(TEST_PUBLIC_KEY).unwrap();
        let upper = PublicKey::from_hex(&TEST_PUBLIC_KEY.to_uppercase()).unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_invalid_keys() {
        assert!(matches!(
            PublicKey::from_hex("zz"),
            Err(KeyError::InvalidHex(_))
        ));
        assert_eq!(
            PrivateKey::from_hex("abcd"),
            Err(KeyError::InvalidLength {
                expected: 32,
                actual: 2
            })
        );
    }

    #[test]
    fn test_private_key_is_redacted() {
        let private_key = PrivateKey::from_hex(TEST_PRIVATE_KEY).unwrap();
        let debug = format!("{:?}", private_key);
        assert!(!debug.to_lowercase().contains("9d61b19d"));
    }

    #[test]
    fn test_account_derivation() {
        let private_key = PrivateKey::from_hex(TEST_PRIVATE_KEY).unwrap();
        let testnet = Account::from_private_key(&private_key, NetworkType::TestNet);
        let mainnet = Account::from_private_key(&private_key, NetworkType::MainNet);

        assert_eq!(testnet.public_key(), mainnet.public_key());
        assert_eq!(testnet.public_key().to_hex(), TEST_PUBLIC_KEY.to_uppercase());
        assert_eq!(testnet.to_string(), format!("{} (testnet)", TEST_PUBLIC_KEY.to_uppercase()));
        assert_eq!(mainnet.to_string(), format!("{} (mainnet)", TEST_PUBLIC_KEY.to_uppercase()));
    }

    #[test]
    fn test_public_only_key_record() {
        let record: KeyRecord = serde_json::from_str(&format!(r#"{{"publicKey":"{}"}}"#, TEST_PUBLIC_KEY)).unwrap();
        assert!(record.private_key.is_none());
        assert!(record.is_consistent());
        assert_eq!(record, KeyRecord::public(PublicKey::from_hex(TEST_PUBLIC_KEY).unwrap()));
    }

    #[test]
    fn test_key_record_consistency() {
        let pair = KeyPair::from_private_key(PrivateKey::from_hex(TEST_PRIVATE_KEY).unwrap());
        let record = KeyRecord::from(pair);
        assert!(record.is_consistent());

        let mismatched = KeyRecord {
            public_key: PublicKey::from_bytes([7; 32]),
            ..record
        };
        assert!(!mismatched.is_consistent());
    }

    #[test]
    fn test_key_pair_serde() {
        let pair = KeyPair::from_private_key(PrivateKey::from_hex(TEST_PRIVATE_KEY).unwrap());
        let json = serde_json::to_string(&pair).unwrap();
        assert!(json.contains("privateKey"));
        let back: KeyPair = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pair);
    }
}
