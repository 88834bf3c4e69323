//! The two-step client import.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/company/import` | Body: raw CSV bytes; returns a token and a [`MappingProposal`] |
//! | `POST` | `/company/map` | Body: [`MapBody`]; creates one client per data row |
//!
//! The upload is parsed, checked against the client limit and staged, one
//! upload per user. The confirmation consumes the staged rows, so a token
//! imports at most once, and checks the limit again against the account's
//! current client count before creating anything.

use axum::{Json, extract::State};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tally_core::{country::CountryIndex, field::ColumnMapping, store::AccountStore};
use tally_csv::{MappingProposal, check_limit, map_rows, propose, read_rows};
use uuid::Uuid;

use crate::{AppState, actor::Actor, error::ApiError};

// ─── Upload ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UploadResponse {
  pub token:    Uuid,
  pub proposal: MappingProposal,
}

/// `POST /company/import`
pub async fn upload<S>(
  State(state): State<AppState<S>>,
  actor: Actor,
  body: Bytes,
) -> Result<Json<UploadResponse>, ApiError>
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if body.is_empty() {
    return Err(ApiError::BadRequest("Please select a file".into()));
  }

  let rows = read_rows(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?;
  let existing = state
    .store
    .count_clients(actor.account_id())
    .await
    .map_err(ApiError::store)?;
  let proposal = propose(rows, existing, state.max_clients)?;

  tracing::debug!(
    rows = proposal.rows.len(),
    has_headers = proposal.has_headers,
    mapping = ?proposal.mapped,
    "proposed column mapping"
  );

  let token = state.staging.stage(actor.user_id(), proposal.rows.clone());
  Ok(Json(UploadResponse { token, proposal }))
}

// ─── Confirm ─────────────────────────────────────────────────────────────────

/// Body of `POST /company/map`.
#[derive(Debug, Deserialize)]
pub struct MapBody {
  pub token:           Uuid,
  pub map:             ColumnMapping,
  #[serde(default)]
  pub header_checkbox: bool,
}

/// A data row that could not be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
  /// 1-based line in the uploaded file.
  pub line:  usize,
  pub error: String,
}

/// Outcome of a confirmed import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
  pub imported: usize,
  pub failures: Vec<RowFailure>,
  pub message:  String,
}

impl ImportSummary {
  pub fn new(imported: usize, failures: Vec<RowFailure>) -> Self {
    Self { message: success_message(imported), imported, failures }
  }
}

/// "Successfully created 1 client" / "Successfully created N clients".
pub fn success_message(imported: usize) -> String {
  if imported == 1 {
    "Successfully created 1 client".to_owned()
  } else {
    format!("Successfully created {imported} clients")
  }
}

/// `POST /company/map`
pub async fn confirm<S>(
  State(state): State<AppState<S>>,
  actor: Actor,
  Json(body): Json<MapBody>,
) -> Result<Json<ImportSummary>, ApiError>
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let rows = state
    .staging
    .take(body.token, actor.user_id())
    .ok_or_else(|| ApiError::NotFound(format!("import {} not found", body.token)))?;

  let account_id = actor.account_id();
  let existing = state
    .store
    .count_clients(account_id)
    .await
    .map_err(ApiError::store)?;
  check_limit(rows.len(), existing, state.max_clients)?;

  let countries: CountryIndex = state
    .store
    .list_countries()
    .await
    .map_err(ApiError::store)?
    .iter()
    .collect();

  let mut imported = 0;
  let mut failures = Vec::new();

  for row in map_rows(&rows, &body.map, body.header_checkbox, &countries) {
    match state
      .store
      .create_client(account_id, actor.user_id(), row.client, row.contact)
      .await
    {
      Ok(_) => imported += 1,
      Err(e) => {
        tracing::warn!(%account_id, line = row.line, error = %e, "failed to import row");
        failures.push(RowFailure { line: row.line, error: e.to_string() });
      }
    }
  }

  let summary = ImportSummary::new(imported, failures);
  tracing::info!(
    %account_id,
    imported = summary.imported,
    failed = summary.failures.len(),
    "client import finished"
  );
  Ok(Json(summary))
}
