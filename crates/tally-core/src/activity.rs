//! Audit trail entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
  CreateClient,
}

impl ActivityKind {
  /// The discriminant stored in the `kind` column.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::CreateClient => "create_client",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "create_client" => Ok(Self::CreateClient),
      other => Err(Error::UnknownActivityKind(other.to_owned())),
    }
  }
}

/// An append-only record of something a user did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
  pub activity_id: Uuid,
  pub account_id:  Uuid,
  pub user_id:     Uuid,
  pub client_id:   Option<Uuid>,
  pub kind:        ActivityKind,
  pub message:     String,
  pub created_at:  DateTime<Utc>,
}

/// Message recorded when `actor` creates a client named `client_name`.
pub fn client_created_message(actor: &str, client_name: &str) -> String {
  if client_name.is_empty() {
    format!("{actor} created a client")
  } else {
    format!("{actor} created client {client_name}")
  }
}
