//! Invoice and email defaults, plus the acting user's notification flags.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tally_core::{
  account::{Account, User},
  store::AccountStore,
};

use crate::{AppState, actor::Actor, error::ApiError, sections::load_account};

/// Body of `POST /company/notifications`. Unchecked boxes are simply absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NotificationsForm {
  pub invoice_terms: String,
  pub email_footer:  String,
  pub notify_sent:   bool,
  pub notify_viewed: bool,
  pub notify_paid:   bool,
}

#[derive(Debug, Serialize)]
pub struct SavedNotifications {
  pub account: Account,
  pub user:    User,
}

/// `POST /company/notifications`
pub async fn save<S>(
  State(state): State<AppState<S>>,
  actor: Actor,
  Json(form): Json<NotificationsForm>,
) -> Result<Json<SavedNotifications>, ApiError>
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let account_id = actor.account_id();
  let mut account = load_account(state.store.as_ref(), &actor).await?;
  account.invoice_terms = form.invoice_terms;
  account.email_footer = form.email_footer;
  state
    .store
    .update_account(account.clone())
    .await
    .map_err(ApiError::store)?;

  let mut user = actor.user;
  user.notify_sent = form.notify_sent;
  user.notify_viewed = form.notify_viewed;
  user.notify_paid = form.notify_paid;
  state
    .store
    .update_user(user.clone())
    .await
    .map_err(ApiError::store)?;

  tracing::info!(%account_id, user_id = %user.user_id, "updated notification settings");
  Ok(Json(SavedNotifications { account, user }))
}
