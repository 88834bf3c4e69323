//! `GET /company/export`: every record of the acting account as one CSV file.

use axum::{
  extract::State,
  http::header,
  response::{IntoResponse, Response},
};
use tally_core::store::AccountStore;
use tally_csv::{ExportSet, write_export};
use uuid::Uuid;

use crate::{AppState, actor::Actor, error::ApiError};

async fn gather<S>(store: &S, account_id: Uuid) -> Result<ExportSet, ApiError>
where
  S: AccountStore,
{
  Ok(ExportSet {
    clients:       store.list_clients(account_id).await.map_err(ApiError::store)?,
    contacts:      store.list_contacts(account_id).await.map_err(ApiError::store)?,
    invoices:      store.list_invoices(account_id).await.map_err(ApiError::store)?,
    invoice_items: store
      .list_invoice_items(account_id)
      .await
      .map_err(ApiError::store)?,
    payments:      store.list_payments(account_id).await.map_err(ApiError::store)?,
    credits:       store.list_credits(account_id).await.map_err(ApiError::store)?,
  })
}

/// `GET /company/export`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  actor: Actor,
) -> Result<Response, ApiError>
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let account_id = actor.account_id();
  let set = gather(state.store.as_ref(), account_id).await?;

  let mut out = Vec::new();
  write_export(&mut out, &set)?;

  tracing::info!(
    %account_id,
    clients = set.clients.len(),
    invoices = set.invoices.len(),
    bytes = out.len(),
    "exported account data"
  );

  Ok(
    (
      [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
        (header::CONTENT_DISPOSITION, "attachment; filename=export.csv"),
      ],
      out,
    )
      .into_response(),
  )
}
