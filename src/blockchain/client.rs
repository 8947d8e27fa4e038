//! Network node REST client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to a node's REST gateway
//! - Query network identity (generation hash), epoch adjustment and currency
//! - Handle timeouts and malformed responses without panicking

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{Currency, RepositoryError, RepositoryResult};
use crate::config::schema::ClientConfig;

/// Read access to the network data a link run needs.
#[async_trait]
pub trait NetworkRepository: Send + Sync {
    /// Network currency metadata.
    async fn get_currency(&self) -> RepositoryResult<Currency>;

    /// Generation hash seed identifying the network.
    async fn get_generation_hash(&self) -> RepositoryResult<String>;

    /// Network epoch start, in seconds since the Unix epoch.
    async fn get_epoch_adjustment(&self) -> RepositoryResult<u64>;
}

/// Opens a repository for a node URL.
pub trait RepositoryConnector: Send + Sync {
    fn connect(&self, url: &str) -> RepositoryResult<Arc<dyn NetworkRepository>>;
}

#[derive(Debug, Deserialize)]
struct NodeInfoDto {
    #[serde(rename = "networkGenerationHashSeed")]
    network_generation_hash_seed: String,
}

#[derive(Debug, Deserialize)]
struct NetworkPropertiesDto {
    network: NetworkSectionDto,
    chain: ChainSectionDto,
}

#[derive(Debug, Deserialize)]
struct NetworkSectionDto {
    #[serde(rename = "epochAdjustment")]
    epoch_adjustment: String,
}

#[derive(Debug, Deserialize)]
struct ChainSectionDto {
    #[serde(rename = "currencyMosaicId")]
    currency_mosaic_id: String,
}

#[derive(Debug, Deserialize)]
struct MosaicInfoDto {
    mosaic: MosaicDto,
}

#[derive(Debug, Deserialize)]
struct MosaicDto {
    divisibility: u32,
}

/// Parse an epoch adjustment such as `"1615853185s"`.
pub fn parse_epoch_adjustment(value: &str) -> Option<u64> {
    value.trim().trim_end_matches('s').parse().ok()
}

/// Normalize a mosaic id such as `"0x6BED'913F'A202'23F8"` to plain hex.
pub fn normalize_mosaic_id(value: &str) -> String {
    let trimmed = value.trim();
    let trimmed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    trimmed.replace('\'', "").to_uppercase()
}

/// REST repository for one node.
#[derive(Clone)]
pub struct HttpRepository {
    client: reqwest::Client,
    base_url: url::Url,
    timeout_duration: Duration,
}

impl HttpRepository {
    /// Create a repository for `url`.
    ///
    /// A single trailing slash on the URL is ignored.
    pub fn new(url: &str, config: &ClientConfig) -> RepositoryResult<Self> {
        let url = url.strip_suffix('/').unwrap_or(url);
        let base_url: url::Url = url.parse().map_err(|e: url::ParseError| RepositoryError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(RepositoryError::InvalidUrl {
                url: url.to_string(),
                reason: "not a base url".to_string(),
            });
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            timeout_duration: Duration::from_secs(config.timeout_secs),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> RepositoryResult<T> {
        let request_url = format!("{}{}", self.base_url(), path);
        let request = async {
            let response = self
                .client
                .get(&request_url)
                .send()
                .await
                .map_err(|e| RepositoryError::Request {
                    path: path.to_string(),
                    reason: e.to_string(),
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(RepositoryError::Status {
                    path: path.to_string(),
                    status: status.as_u16(),
                });
            }

            let body = response.text().await.map_err(|e| RepositoryError::Request {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
            serde_json::from_str::<T>(&body).map_err(|e| RepositoryError::Decode {
                path: path.to_string(),
                reason: e.to_string(),
            })
        };

        match timeout(self.timeout_duration, request).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(path = %path, "Request timed out");
                Err(RepositoryError::Timeout {
                    path: path.to_string(),
                    secs: self.timeout_duration.as_secs(),
                })
            }
        }
    }

    async fn get_network_properties(&self) -> RepositoryResult<NetworkPropertiesDto> {
        self.get_json("/network/properties").await
    }
}

#[async_trait]
impl NetworkRepository for HttpRepository {
    async fn get_currency(&self) -> RepositoryResult<Currency> {
        let properties = self.get_network_properties().await?;
        let mosaic_id = normalize_mosaic_id(&properties.chain.currency_mosaic_id);
        let path = format!("/mosaics/{}", mosaic_id);
        let info: MosaicInfoDto = self.get_json(&path).await?;
        Ok(Currency {
            mosaic_id,
            divisibility: info.mosaic.divisibility,
        })
    }

    async fn get_generation_hash(&self) -> RepositoryResult<String> {
        let info: NodeInfoDto = self.get_json("/node/info").await?;
        Ok(info.network_generation_hash_seed)
    }

    async fn get_epoch_adjustment(&self) -> RepositoryResult<u64> {
        let properties = self.get_network_properties().await?;
        parse_epoch_adjustment(&properties.network.epoch_adjustment).ok_or_else(|| RepositoryError::Decode {
            path: "/network/properties".to_string(),
            reason: format!("invalid epochAdjustment '{}'", properties.network.epoch_adjustment),
        })
    }
}

impl std::fmt::Debug for HttpRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRepository")
            .field("base_url", &self.base_url())
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}

/// Connector producing [`HttpRepository`] instances.
#[derive(Debug, Clone, Default)]
pub struct HttpConnector {
    config: ClientConfig,
}

impl HttpConnector {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }
}

impl RepositoryConnector for HttpConnector {
    fn connect(&self, url: &str) -> RepositoryResult<Arc<dyn NetworkRepository>> {
        let repository = HttpRepository::new(url, &self.config)?;
        tracing::debug!(url = %repository.base_url(), "Repository created");
        Ok(Arc::new(repository))
    }
}
