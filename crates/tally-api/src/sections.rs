//! Read-only views of each settings section.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/company/details` | Account, its users, countries by name |
//! | `GET`  | `/company/payments` | Account, current gateway config, all gateways |
//! | `GET`  | `/company/notifications` | Account and its users |
//! | `GET`  | `/company/import_export` | Selectable field tags and the client limit |

use axum::{Json, extract::State};
use serde::Serialize;
use tally_core::{
  account::{Account, User},
  country::Country,
  field::FieldTag,
  gateway::{AccountGateway, Gateway},
  store::AccountStore,
};

use crate::{AppState, actor::Actor, error::ApiError};

/// The acting user's account; a dangling account reference is not found.
pub(crate) async fn load_account<S>(store: &S, actor: &Actor) -> Result<Account, ApiError>
where
  S: AccountStore,
{
  let account_id = actor.account_id();
  store
    .get_account(account_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("account {account_id} not found")))
}

// ─── Details ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DetailsView {
  pub account:   Account,
  pub users:     Vec<User>,
  pub countries: Vec<Country>,
}

/// `GET /company/details`
pub async fn details<S>(
  State(state): State<AppState<S>>,
  actor: Actor,
) -> Result<Json<DetailsView>, ApiError>
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let account = load_account(state.store.as_ref(), &actor).await?;
  let users = state
    .store
    .list_users(account.account_id)
    .await
    .map_err(ApiError::store)?;
  let countries = state.store.list_countries().await.map_err(ApiError::store)?;
  Ok(Json(DetailsView { account, users, countries }))
}

// ─── Payments ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PaymentsView {
  pub account:         Account,
  pub account_gateway: Option<AccountGateway>,
  pub gateways:        Vec<Gateway>,
}

/// `GET /company/payments`
pub async fn payments<S>(
  State(state): State<AppState<S>>,
  actor: Actor,
) -> Result<Json<PaymentsView>, ApiError>
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let account = load_account(state.store.as_ref(), &actor).await?;
  let account_gateway = state
    .store
    .get_account_gateway(account.account_id)
    .await
    .map_err(ApiError::store)?;
  let gateways = state.store.list_gateways().await.map_err(ApiError::store)?;
  Ok(Json(PaymentsView { account, account_gateway, gateways }))
}

// ─── Notifications ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct NotificationsView {
  pub account: Account,
  pub users:   Vec<User>,
}

/// `GET /company/notifications`
pub async fn notifications<S>(
  State(state): State<AppState<S>>,
  actor: Actor,
) -> Result<Json<NotificationsView>, ApiError>
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let account = load_account(state.store.as_ref(), &actor).await?;
  let users = state
    .store
    .list_users(account.account_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(NotificationsView { account, users }))
}

// ─── Import / export ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct FieldOption {
  pub tag:   FieldTag,
  pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ImportExportView {
  pub fields:      Vec<FieldOption>,
  pub max_clients: usize,
}

/// `GET /company/import_export`
pub async fn import_export<S>(
  State(state): State<AppState<S>>,
  _actor: Actor,
) -> Json<ImportExportView>
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let fields = FieldTag::all()
    .into_iter()
    .map(|tag| FieldOption { tag, label: tag.label() })
    .collect();
  Json(ImportExportView { fields, max_clients: state.max_clients })
}
