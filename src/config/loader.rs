//! Loading preset and address records from a target folder.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::{Addresses, PresetData};
use crate::config::validation::{validate_addresses, ValidationError};

/// Preset file name inside a target folder.
pub const PRESET_FILE: &str = "preset.toml";

/// Addresses file name inside a target folder.
pub const ADDRESSES_FILE: &str = "addresses.toml";

/// Prefix marking an encrypted stored value.
pub const ENCRYPTED_PREFIX: &str = "ENCRYPTED:";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("{path} contains encrypted values but no password was provided")]
    PasswordRequired { path: PathBuf },

    #[error("Could not decrypt {path}: {reason}")]
    Decryption { path: PathBuf, reason: String },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Source of the preset and addresses of a target.
pub trait ConfigLoader: Send + Sync {
    fn load_existing_preset_data(&self, target: &str, password: Option<&str>) -> Result<PresetData, ConfigError>;

    fn load_existing_addresses(&self, target: &str, password: Option<&str>) -> Result<Addresses, ConfigError>;
}

/// Decrypts values stored with the `ENCRYPTED:` prefix.
pub trait KeyDecryptor: Send + Sync {
    /// Decrypt the text following the prefix.
    fn decrypt(&self, ciphertext: &str, password: &str) -> Result<String, String>;
}

/// Reads `preset.toml` and `addresses.toml` from the target folder.
#[derive(Default)]
pub struct FileConfigLoader {
    decryptor: Option<Box<dyn KeyDecryptor>>,
}

impl FileConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `decryptor` for encrypted values.
    pub fn with_decryptor(mut self, decryptor: impl KeyDecryptor + 'static) -> Self {
        self.decryptor = Some(Box::new(decryptor));
        self
    }

    fn read(&self, path: &Path, password: Option<&str>) -> Result<toml::Value, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut value: toml::Value = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        self.decrypt_values(&mut value, path, password)?;
        Ok(value)
    }

    fn decrypt_values(&self, value: &mut toml::Value, path: &Path, password: Option<&str>) -> Result<(), ConfigError> {
        match value {
            toml::Value::String(text) => {
                if let Some(ciphertext) = text.strip_prefix(ENCRYPTED_PREFIX) {
                    let password = password.ok_or_else(|| ConfigError::PasswordRequired {
                        path: path.to_path_buf(),
                    })?;
                    let decryptor = self.decryptor.as_ref().ok_or_else(|| ConfigError::Decryption {
                        path: path.to_path_buf(),
                        reason: "no decryptor configured".to_string(),
                    })?;
                    *text = decryptor
                        .decrypt(ciphertext, password)
                        .map_err(|reason| ConfigError::Decryption {
                            path: path.to_path_buf(),
                            reason,
                        })?;
                }
            }
            toml::Value::Array(items) => {
                for item in items {
                    self.decrypt_values(item, path, password)?;
                }
            }
            toml::Value::Table(table) => {
                for (_, item) in table.iter_mut() {
                    self.decrypt_values(item, path, password)?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}

impl ConfigLoader for FileConfigLoader {
    fn load_existing_preset_data(&self, target: &str, password: Option<&str>) -> Result<PresetData, ConfigError> {
        let path = Path::new(target).join(PRESET_FILE);
        let value = self.read(&path, password)?;
        let preset: PresetData = value.try_into().map_err(|e: toml::de::Error| ConfigError::Parse {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), network = %preset.network_type, "Preset loaded");
        Ok(preset)
    }

    fn load_existing_addresses(&self, target: &str, password: Option<&str>) -> Result<Addresses, ConfigError> {
        let path = Path::new(target).join(ADDRESSES_FILE);
        let value = self.read(&path, password)?;
        let addresses: Addresses = value.try_into().map_err(|e: toml::de::Error| ConfigError::Parse {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        validate_addresses(&addresses).map_err(ConfigError::Validation)?;

        tracing::debug!(path = %path.display(), nodes = addresses.nodes.len(), "Addresses loaded");
        Ok(addresses)
    }
}
