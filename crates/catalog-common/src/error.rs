/// Error types for retrieving the remote product catalog.
///
/// Consumers treat these as opaque: the filter engine never inspects them, and the
/// HTTP layer maps every variant to a server error.
use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid catalog JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("catalog source returned error: status={status} body={body}")]
    Upstream { status: StatusCode, body: String },
}
