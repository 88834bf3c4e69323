//! Helpers shared by the settings forms.

use serde::{Deserialize, Deserializer};

use crate::error::FieldErrors;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
  Number(u64),
  Text(String),
}

/// Deserialize a select-box id. `null`, `""`, `0` and anything that is not
/// a number are treated as "nothing selected".
pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = Option::<RawId>::deserialize(deserializer)?;
  let id = match raw {
    Some(RawId::Number(n)) => u32::try_from(n).ok(),
    Some(RawId::Text(s)) => s.trim().parse().ok(),
    None => None,
  };
  Ok(id.filter(|id| *id != 0))
}

/// Record "The {field} field is required." when `value` is blank.
pub fn require(errors: &mut FieldErrors, field: &str, value: &str) -> bool {
  if value.trim().is_empty() {
    add(errors, field, format!("The {field} field is required."));
    false
  } else {
    true
  }
}

pub fn add(errors: &mut FieldErrors, field: &str, message: String) {
  errors.entry(field.to_owned()).or_default().push(message);
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[derive(Debug, Deserialize)]
  struct Form {
    #[serde(default, deserialize_with = "opt_id")]
    id: Option<u32>,
  }

  fn id(value: serde_json::Value) -> Option<u32> {
    serde_json::from_value::<Form>(json!({ "id": value })).unwrap().id
  }

  #[test]
  fn blank_ids_are_absent() {
    assert_eq!(id(json!(null)), None);
    assert_eq!(id(json!("")), None);
    assert_eq!(id(json!(0)), None);
    assert_eq!(id(json!("0")), None);
    let missing: Form = serde_json::from_value(json!({})).unwrap();
    assert_eq!(missing.id, None);
  }

  #[test]
  fn numbers_and_numeric_strings_are_ids() {
    assert_eq!(id(json!(840)), Some(840));
    assert_eq!(id(json!(" 124 ")), Some(124));
  }

  #[test]
  fn require_flags_whitespace() {
    let mut errors = FieldErrors::new();
    assert!(!require(&mut errors, "name", "   "));
    assert!(require(&mut errors, "email", "a@x.com"));
    assert_eq!(errors["name"], vec!["The name field is required.".to_owned()]);
    assert!(!errors.contains_key("email"));
  }
}
