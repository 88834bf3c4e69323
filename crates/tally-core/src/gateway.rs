//! Payment gateways and an account's chosen gateway configuration.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Provider parameters that may be left blank when configuring a gateway.
pub const OPTIONAL_GATEWAY_FIELDS: &[&str] = &[
  "testMode",
  "developerMode",
  "headerImageUrl",
  "solutionType",
  "landingPage",
  "brandName",
];

/// A supported payment provider and the parameters it accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gateway {
  pub gateway_id: u32,
  pub name:       String,
  pub provider:   String,
  pub fields:     Vec<String>,
}

impl Gateway {
  /// Parameters that must be non-blank for the config to be accepted.
  pub fn required_fields(&self) -> impl Iterator<Item = &str> {
    self
      .fields
      .iter()
      .map(String::as_str)
      .filter(|f| !OPTIONAL_GATEWAY_FIELDS.contains(f))
  }
}

/// The gateway an account has configured. `config` is stored opaquely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountGateway {
  pub account_gateway_id: Uuid,
  pub account_id:         Uuid,
  pub gateway_id:         u32,
  pub config:             serde_json::Value,
}

/// Input to [`crate::store::AccountStore::replace_account_gateway`].
#[derive(Debug, Clone)]
pub struct NewAccountGateway {
  pub gateway_id: u32,
  pub config:     serde_json::Value,
}

impl NewAccountGateway {
  pub fn new(gateway_id: u32, config: serde_json::Value) -> Result<Self> {
    if !config.is_object() {
      return Err(Error::InvalidGatewayConfig);
    }
    Ok(Self { gateway_id, config })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn optional_fields_are_not_required() {
    let gateway = Gateway {
      gateway_id: 1,
      name:       "PayPal Express".into(),
      provider:   "PayPal_Express".into(),
      fields:     vec![
        "username".into(),
        "password".into(),
        "testMode".into(),
        "brandName".into(),
      ],
    };
    let required: Vec<_> = gateway.required_fields().collect();
    assert_eq!(required, ["username", "password"]);
  }

  #[test]
  fn config_must_be_an_object() {
    assert!(NewAccountGateway::new(1, serde_json::json!({"apiKey": "x"})).is_ok());
    assert!(matches!(
      NewAccountGateway::new(1, serde_json::json!("x")),
      Err(Error::InvalidGatewayConfig)
    ));
  }
}
