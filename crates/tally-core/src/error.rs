//! Error types for `tally-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown field tag: {0:?}")]
  UnknownFieldTag(String),

  #[error("unknown activity kind: {0:?}")]
  UnknownActivityKind(String),

  #[error("gateway config must be a JSON object")]
  InvalidGatewayConfig,

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
