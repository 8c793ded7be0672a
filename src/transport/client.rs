use async_trait::async_trait;

use crate::error::{CacheError, Result};
use crate::group::types::PeerGetter;

/// Fetches values from one remote peer over HTTP.
///
/// No timeout is applied by default; pass a configured client through
/// [`HttpGetter::with_client`] to get one.
#[derive(Debug, Clone)]
pub struct HttpGetter {
    /// Peer address plus base path, e.g. `http://10.0.0.2:8008/_geecache/`.
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpGetter {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http_client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            http_client,
        }
    }

    fn url_for(&self, group: &str, key: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            urlencoding::encode(group),
            urlencoding::encode(key)
        )
    }
}

#[async_trait]
impl PeerGetter for HttpGetter {
    async fn get(&self, group: &str, key: &str) -> Result<Vec<u8>> {
        let url = self.url_for(group, key);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| CacheError::Transport {
                peer: self.base_url.clone(),
                reason: e.to_string(),
            })?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(CacheError::PeerStatus {
                peer: self.base_url.clone(),
                status: response.status().to_string(),
            });
        }

        let body = response.bytes().await.map_err(|e| CacheError::Transport {
            peer: self.base_url.clone(),
            reason: format!("reading response body: {}", e),
        })?;

        tracing::debug!("GET {} -> {} bytes", url, body.len());
        Ok(body.to_vec())
    }
}
