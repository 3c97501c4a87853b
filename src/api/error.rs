use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use super::GatewayError;

/// Why an analytics fetch did not produce a payload.
///
/// Every variant ends the fetch the same way (failed, empty result); the
/// distinction only matters for logs and tests.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("analytics request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("analytics backend answered {0}")]
    Status(StatusCode),
    #[error("analytics payload could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("analytics request timed out after {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
