//! Company details and the email availability check.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/company/details` | Body: [`DetailsForm`]; 422 with field errors |
//! | `GET`  | `/check_email` | `?email=`; plain-text `taken` or `available` |

use axum::{
  Json,
  extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tally_core::{
  account::{Account, DEFAULT_CURRENCY_ID, DEFAULT_LANGUAGE_ID, User},
  store::AccountStore,
};
use validator::ValidateEmail as _;

use crate::{
  AppState,
  actor::Actor,
  error::{ApiError, FieldErrors},
  form::{add, opt_id, require},
  sections::load_account,
};

// ─── Form ────────────────────────────────────────────────────────────────────

/// The company profile plus the acting user's own details.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailsForm {
  pub name:               String,
  pub work_email:         String,
  pub work_phone:         String,
  pub address1:           String,
  pub address2:           String,
  pub city:               String,
  pub state:              String,
  pub postal_code:        String,
  #[serde(deserialize_with = "opt_id")]
  pub country_id:         Option<u32>,
  #[serde(deserialize_with = "opt_id")]
  pub size_id:            Option<u32>,
  #[serde(deserialize_with = "opt_id")]
  pub industry_id:        Option<u32>,
  #[serde(deserialize_with = "opt_id")]
  pub timezone_id:        Option<u32>,
  #[serde(deserialize_with = "opt_id")]
  pub date_format_id:     Option<u32>,
  #[serde(deserialize_with = "opt_id")]
  pub datetime_format_id: Option<u32>,
  #[serde(deserialize_with = "opt_id")]
  pub currency_id:        Option<u32>,
  #[serde(deserialize_with = "opt_id")]
  pub language_id:        Option<u32>,
  pub first_name:         String,
  pub last_name:          String,
  pub email:              String,
  pub phone:              String,
}

impl DetailsForm {
  /// Copy the trimmed profile fields onto `account`.
  pub fn apply_to_account(&self, account: &mut Account) {
    account.name = self.name.trim().to_owned();
    account.work_email = self.work_email.trim().to_owned();
    account.work_phone = self.work_phone.trim().to_owned();
    account.address1 = self.address1.trim().to_owned();
    account.address2 = self.address2.trim().to_owned();
    account.city = self.city.trim().to_owned();
    account.state = self.state.trim().to_owned();
    account.postal_code = self.postal_code.trim().to_owned();
    account.country_id = self.country_id;
    account.size_id = self.size_id;
    account.industry_id = self.industry_id;
    account.timezone_id = self.timezone_id;
    account.date_format_id = self.date_format_id;
    account.datetime_format_id = self.datetime_format_id;
    account.currency_id = self.currency_id.unwrap_or(DEFAULT_CURRENCY_ID);
    account.language_id = self.language_id.unwrap_or(DEFAULT_LANGUAGE_ID);
  }

  /// Copy the user's own fields; the username keeps the email's case.
  pub fn apply_to_user(&self, user: &mut User) {
    user.first_name = self.first_name.trim().to_owned();
    user.last_name = self.last_name.trim().to_owned();
    user.username = self.email.trim().to_owned();
    user.email = self.email.trim().to_lowercase();
    user.phone = self.phone.trim().to_owned();
  }
}

/// Check the form. `email_taken` is whether another user already has the
/// submitted email.
pub fn validate_details(form: &DetailsForm, email_taken: bool) -> FieldErrors {
  let mut errors = FieldErrors::new();
  require(&mut errors, "name", &form.name);

  let email = form.email.trim();
  if require(&mut errors, "email", email) {
    if !email.validate_email() {
      add(&mut errors, "email", "The email must be a valid email address.".into());
    } else if email_taken {
      add(&mut errors, "email", "The email has already been taken.".into());
    }
  }
  errors
}

/// Whether a user other than `actor` has `email`.
async fn email_taken_by_other<S>(
  store: &S,
  actor: &Actor,
  email: &str,
) -> Result<bool, ApiError>
where
  S: AccountStore,
{
  let owner = store
    .find_user_by_email(email.trim().to_owned())
    .await
    .map_err(ApiError::store)?;
  Ok(owner.is_some_and(|u| u.user_id != actor.user_id()))
}

// ─── Save ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SavedDetails {
  pub account: Account,
  pub user:    User,
}

/// `POST /company/details`
pub async fn save<S>(
  State(state): State<AppState<S>>,
  actor: Actor,
  Json(form): Json<DetailsForm>,
) -> Result<Json<SavedDetails>, ApiError>
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let taken = email_taken_by_other(state.store.as_ref(), &actor, &form.email).await?;
  let errors = validate_details(&form, taken);
  if !errors.is_empty() {
    return Err(ApiError::Validation {
      errors,
      input: serde_json::to_value(&form).unwrap_or_default(),
    });
  }

  let account_id = actor.account_id();
  let mut account = load_account(state.store.as_ref(), &actor).await?;
  form.apply_to_account(&mut account);
  state
    .store
    .update_account(account.clone())
    .await
    .map_err(ApiError::store)?;

  let mut user = actor.user;
  form.apply_to_user(&mut user);
  state
    .store
    .update_user(user.clone())
    .await
    .map_err(ApiError::store)?;

  tracing::info!(%account_id, user_id = %user.user_id, "updated company details");
  Ok(Json(SavedDetails { account, user }))
}

// ─── Check email ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CheckEmailParams {
  #[serde(default)]
  pub email: String,
}

/// `GET /check_email?email=<address>`
pub async fn check_email<S>(
  State(state): State<AppState<S>>,
  actor: Actor,
  Query(params): Query<CheckEmailParams>,
) -> Result<&'static str, ApiError>
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if params.email.trim().is_empty() {
    return Ok("available");
  }
  let taken = email_taken_by_other(state.store.as_ref(), &actor, &params.email).await?;
  Ok(if taken { "taken" } else { "available" })
}
