//! Error type for `tally-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] tally_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("account not found: {0}")]
  AccountNotFound(uuid::Uuid),

  #[error("user not found: {0}")]
  UserNotFound(uuid::Uuid),

  #[error("client not found: {0}")]
  ClientNotFound(uuid::Uuid),

  #[error("gateway not found: {0}")]
  GatewayNotFound(u32),

  #[error("invoice not found: {0}")]
  InvoiceNotFound(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
