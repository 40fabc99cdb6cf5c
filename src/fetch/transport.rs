//! Byte retrieval seam for the fetch controller.

use std::future::Future;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use reqwest::{Client, Url};
use tokio::time::timeout;

use crate::config::FetchConfig;
use crate::fetch::error::FetchError;

/// Anything that can turn a URL into a payload.
///
/// Implementations must fail with a [`FetchError`] rather than return an
/// empty buffer for a failed request.
pub trait Transport: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Bytes, FetchError>> + Send;
}

/// Timeouts and limits applied by [`HttpTransport`].
#[derive(Debug, Clone, Copy)]
pub struct TransportLimits {
    pub connect: Duration,
    pub request: Duration,
    pub max_bytes: u64,
}

impl From<&FetchConfig> for TransportLimits {
    fn from(config: &FetchConfig) -> Self {
        Self {
            connect: Duration::from_secs(config.connect_timeout_seconds as u64),
            request: Duration::from_secs(config.timeout_seconds as u64),
            max_bytes: config.max_bytes,
        }
    }
}

impl Default for TransportLimits {
    fn default() -> Self {
        Self::from(&FetchConfig::default())
    }
}

/// Plain HTTP GET over reqwest. No custom headers, no retries.
pub struct HttpTransport {
    client: Client,
    limits: TransportLimits,
}

impl HttpTransport {
    pub fn new(limits: TransportLimits) -> Result<Self, reqwest::Error> {
        let client = Client::builder().connect_timeout(limits.connect).build()?;
        Ok(Self { client, limits })
    }

    async fn do_fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let mut response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| FetchError::Connection {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let limit = self.limits.max_bytes;
        if let Some(declared) = response.content_length() {
            if declared > limit {
                return Err(FetchError::TooLarge {
                    size: declared,
                    limit,
                });
            }
        }

        let mut body = BytesMut::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?
        {
            let size = (body.len() + chunk.len()) as u64;
            if size > limit {
                return Err(FetchError::TooLarge { size, limit });
            }
            body.extend_from_slice(&chunk);
        }

        if body.is_empty() {
            return Err(FetchError::EmptyPayload {
                url: url.to_string(),
            });
        }

        tracing::debug!(url = %url, bytes = body.len(), "Fetched payload");
        Ok(body.freeze())
    }
}

impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        match timeout(self.limits.request, self.do_fetch(url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                duration: self.limits.request.as_secs(),
            }),
        }
    }
}
