//! Accounts (the company using Tally) and their users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::country::CountryId;

/// Currency used when the profile form leaves it blank (US Dollar).
pub const DEFAULT_CURRENCY_ID: u32 = 1;
/// Language used when the profile form leaves it blank (English).
pub const DEFAULT_LANGUAGE_ID: u32 = 1;

// ─── Account ─────────────────────────────────────────────────────────────────

/// The company profile plus the per-account invoice and email settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
  pub account_id:         Uuid,
  /// Opaque public key; also names the account's logo file.
  pub account_key:        String,
  pub name:               String,
  pub work_email:         String,
  pub work_phone:         String,
  pub address1:           String,
  pub address2:           String,
  pub city:               String,
  pub state:              String,
  pub postal_code:        String,
  pub country_id:         Option<CountryId>,
  pub size_id:            Option<u32>,
  pub industry_id:        Option<u32>,
  pub timezone_id:        Option<u32>,
  pub date_format_id:     Option<u32>,
  pub datetime_format_id: Option<u32>,
  pub currency_id:        u32,
  pub language_id:        u32,
  pub invoice_terms:      String,
  pub email_footer:       String,
  pub created_at:         DateTime<Utc>,
}

impl Account {
  /// A blank profile with the default currency and language.
  pub fn new(account_id: Uuid, account_key: String, created_at: DateTime<Utc>) -> Self {
    Self {
      account_id,
      account_key,
      name: String::new(),
      work_email: String::new(),
      work_phone: String::new(),
      address1: String::new(),
      address2: String::new(),
      city: String::new(),
      state: String::new(),
      postal_code: String::new(),
      country_id: None,
      size_id: None,
      industry_id: None,
      timezone_id: None,
      date_format_id: None,
      datetime_format_id: None,
      currency_id: DEFAULT_CURRENCY_ID,
      language_id: DEFAULT_LANGUAGE_ID,
      invoice_terms: String::new(),
      email_footer: String::new(),
      created_at,
    }
  }
}

// ─── User ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id:       Uuid,
  pub account_id:    Uuid,
  pub first_name:    String,
  pub last_name:     String,
  pub username:      String,
  pub email:         String,
  pub phone:         String,
  pub notify_sent:   bool,
  pub notify_viewed: bool,
  pub notify_paid:   bool,
}

impl User {
  /// Display name used in activity messages; unnamed users are "Guest".
  pub fn display_name(&self) -> String {
    let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
    let full = full.trim();
    if full.is_empty() { "Guest".to_owned() } else { full.to_owned() }
  }
}

/// Input to [`crate::store::AccountStore::create_user`].
#[derive(Debug, Clone, Default)]
pub struct NewUser {
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn user(first: &str, last: &str) -> User {
    User {
      user_id:       Uuid::new_v4(),
      account_id:    Uuid::new_v4(),
      first_name:    first.into(),
      last_name:     last.into(),
      username:      String::new(),
      email:         String::new(),
      phone:         String::new(),
      notify_sent:   false,
      notify_viewed: false,
      notify_paid:   false,
    }
  }

  #[test]
  fn display_name_joins_parts() {
    assert_eq!(user("Ada", "Lovelace").display_name(), "Ada Lovelace");
    assert_eq!(user("Ada", "").display_name(), "Ada");
    assert_eq!(user(" ", "").display_name(), "Guest");
  }

  #[test]
  fn new_account_uses_default_currency_and_language() {
    let account = Account::new(Uuid::new_v4(), "key".into(), Utc::now());
    assert_eq!(account.currency_id, DEFAULT_CURRENCY_ID);
    assert_eq!(account.language_id, DEFAULT_LANGUAGE_ID);
    assert!(account.country_id.is_none());
  }
}
