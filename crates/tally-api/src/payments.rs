//! Payment gateway configuration.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/company/payments` | Body: [`PaymentsForm`]; no gateway clears the config |

use std::collections::BTreeMap;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tally_core::{
  gateway::{AccountGateway, Gateway, NewAccountGateway},
  store::AccountStore,
};

use crate::{
  AppState,
  actor::Actor,
  error::{ApiError, FieldErrors},
  form::{opt_id, require},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentsForm {
  #[serde(deserialize_with = "opt_id")]
  pub gateway_id: Option<u32>,
  /// Gateway parameter name → submitted value.
  pub config:     BTreeMap<String, String>,
}

impl PaymentsForm {
  fn value(&self, field: &str) -> &str {
    self.config.get(field).map(String::as_str).unwrap_or_default()
  }
}

/// Every non-exempt parameter of `gateway` must be filled in.
pub fn validate_payments(form: &PaymentsForm, gateway: &Gateway) -> FieldErrors {
  let mut errors = FieldErrors::new();
  for field in gateway.required_fields() {
    require(&mut errors, field, form.value(field));
  }
  errors
}

/// The stored config: every parameter of `gateway`, trimmed, including the
/// exempt ones.
pub fn gateway_config(form: &PaymentsForm, gateway: &Gateway) -> Value {
  let config: Map<String, Value> = gateway
    .fields
    .iter()
    .map(|field| (field.clone(), Value::from(form.value(field).trim())))
    .collect();
  Value::Object(config)
}

/// `POST /company/payments`
pub async fn save<S>(
  State(state): State<AppState<S>>,
  actor: Actor,
  Json(form): Json<PaymentsForm>,
) -> Result<Json<Option<AccountGateway>>, ApiError>
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let replacement = match form.gateway_id {
    Some(gateway_id) => {
      let gateway = state
        .store
        .get_gateway(gateway_id)
        .await
        .map_err(ApiError::store)?
        .ok_or_else(|| ApiError::NotFound(format!("gateway {gateway_id} not found")))?;

      let errors = validate_payments(&form, &gateway);
      if !errors.is_empty() {
        return Err(ApiError::Validation {
          errors,
          input: serde_json::to_value(&form).unwrap_or_default(),
        });
      }

      let config = gateway_config(&form, &gateway);
      Some(NewAccountGateway::new(gateway_id, config).map_err(|e| {
        ApiError::BadRequest(e.to_string())
      })?)
    }
    None => None,
  };

  let account_id = actor.account_id();
  let stored = state
    .store
    .replace_account_gateway(account_id, replacement)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(
    %account_id,
    gateway_id = ?stored.as_ref().map(|g| g.gateway_id),
    "updated payment settings"
  );
  Ok(Json(stored))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn paypal() -> Gateway {
    Gateway {
      gateway_id: 2,
      name:       "PayPal Express".into(),
      provider:   "PayPal_Express".into(),
      fields:     ["username", "password", "signature", "testMode", "brandName"]
        .map(String::from)
        .to_vec(),
    }
  }

  fn form(pairs: &[(&str, &str)]) -> PaymentsForm {
    PaymentsForm {
      gateway_id: Some(2),
      config:     pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect(),
    }
  }

  #[test]
  fn exempt_fields_are_not_required() {
    let errors = validate_payments(
      &form(&[("username", "u"), ("password", "p"), ("signature", "s")]),
      &paypal(),
    );
    assert!(errors.is_empty());
  }

  #[test]
  fn blank_required_fields_are_reported() {
    let errors = validate_payments(&form(&[("username", "u"), ("password", "  ")]), &paypal());
    let fields: Vec<&str> = errors.keys().map(String::as_str).collect();
    assert_eq!(fields, ["password", "signature"]);
    assert_eq!(errors["signature"], ["The signature field is required."]);
  }

  #[test]
  fn config_holds_every_field_trimmed() {
    let config = gateway_config(
      &form(&[("username", " u "), ("password", "p"), ("signature", "s"), ("extra", "x")]),
      &paypal(),
    );
    assert_eq!(config["username"], "u");
    assert_eq!(config["testMode"], "");
    assert_eq!(config["brandName"], "");
    assert!(config.get("extra").is_none());
    assert_eq!(config.as_object().map(Map::len), Some(5));
  }
}
