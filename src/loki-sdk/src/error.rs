/// Errors from the Loki SDK
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// Rejected query parameter, raised before any request is sent
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] loki_api::ParseDirectionError),
    /// The base URL could not be parsed or joined with the endpoint path
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// HTTP transport error
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// Response body is not valid JSON, or not of the requested shape
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
