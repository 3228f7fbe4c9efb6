use std::path::Path;

use async_trait::async_trait;
use http::header::AUTHORIZATION;
use reqwest::{multipart, Client};
use serde::Deserialize;

use crate::{config::Config, errors::VoteError, Result};

pub const IPFS_SCHEME: &str = "ipfs://";

/// Stores files on a content-addressed network.
#[async_trait]
pub trait PinningService: Send + Sync {
    /// Pin `bytes` and return the content identifier.
    async fn pin_file(&self, file_name: &str, bytes: Vec<u8>) -> Result<String>;
}

#[derive(Deserialize, Debug)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

/// Client for Pinata's `pinFileToIPFS` endpoint
#[derive(Debug, Clone)]
pub struct PinataClient {
    client: Client,
    api_url: String,
    jwt: Option<String>,
}

impl PinataClient {
    pub fn new(api_url: &str, jwt: Option<String>) -> Self {
        PinataClient {
            client: Client::new(),
            api_url: api_url.to_string(),
            jwt,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.pinata_api_url, config.pinata_jwt.clone())
    }
}

#[async_trait]
impl PinningService for PinataClient {
    async fn pin_file(&self, file_name: &str, bytes: Vec<u8>) -> Result<String> {
        let jwt = self
            .jwt
            .as_deref()
            .ok_or_else(|| VoteError::Pinning("PINATA_JWT is not set".into()))?;
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);
        let response = self
            .client
            .post(&self.api_url)
            .header(AUTHORIZATION, format!("Bearer {}", jwt))
            .multipart(form)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VoteError::Pinning(format!("{}: {}", status, body)));
        }
        let pin: PinResponse = response
            .json()
            .await
            .map_err(|e| VoteError::Pinning(format!("unexpected response: {}", e)))?;
        if pin.ipfs_hash.is_empty() {
            return Err(VoteError::Pinning("empty content identifier".into()));
        }
        Ok(pin.ipfs_hash)
    }
}

/// Read a file from disk and pin it, returning its `ipfs://` URI.
pub async fn upload_file<P: PinningService + ?Sized>(pinning: &P, path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    log::info!("Pinning {} ({} bytes)", file_name, bytes.len());
    let cid = pinning.pin_file(&file_name, bytes).await?;
    Ok(format!("{}{}", IPFS_SCHEME, cid))
}

/// Map an `ipfs://` URI onto an HTTP gateway.
pub fn gateway_url(uri: &str, gateway: &str) -> String {
    match uri.strip_prefix(IPFS_SCHEME) {
        Some(cid) => format!("https://{}/ipfs/{}", gateway, cid),
        None => uri.to_string(),
    }
}
