use loki_api::{QUERY_RANGE_PATH, QueryRangeRequest};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::{ClientConfig, SdkError};

/// HTTP client for the Loki query API
///
/// Holds nothing but the base URL. Every call builds its own transport, so
/// a single `Client` can be shared freely between tasks.
#[derive(Clone, Debug)]
pub struct Client {
    base_url: String,
}

impl Client {
    /// Create a new client pointing at the given base URL.
    ///
    /// The URL is not validated here; a malformed one is reported as
    /// [`SdkError::InvalidUrl`] by the first request.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The query range endpoint, resolved against the base URL
    pub fn endpoint(&self) -> Result<Url, SdkError> {
        Ok(Url::parse(&self.base_url)?.join(QUERY_RANGE_PATH)?)
    }

    /// Run a range query and return the response body as received.
    ///
    /// The HTTP status is not inspected: an error payload from the server
    /// decodes into a value just like a successful one.
    pub async fn query_range(
        &self,
        request: &QueryRangeRequest,
    ) -> Result<serde_json::Value, SdkError> {
        self.query_range_as(request).await
    }

    /// Run a range query and deserialize the response body into `T`
    #[tracing::instrument(skip_all, fields(query = %request.query))]
    pub async fn query_range_as<T: DeserializeOwned>(
        &self,
        request: &QueryRangeRequest,
    ) -> Result<T, SdkError> {
        let url = self.endpoint()?;
        let params = request.query_pairs();

        // Lives for this call only and is released with the future
        let http = reqwest::Client::builder().build()?;

        debug!(%url, ?params, "Sending range query");
        let resp = http.get(url).query(&params).send().await?;
        debug!(status = resp.status().as_u16(), "Received range query response");

        // JSON bodies must be valid UTF-8
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
