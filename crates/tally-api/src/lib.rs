//! JSON API for the Tally account settings pages.
//!
//! Exposes an axum [`Router`] backed by any [`tally_core::store::AccountStore`].
//! Authentication is the caller's responsibility: a fronting layer must set
//! the [`actor::USER_HEADER`] header to the acting user's id.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let state = tally_api::AppState::new(store, 500);
//! let app = tally_api::router(state).layer(TraceLayer::new_for_http());
//! ```

pub mod actor;
pub mod details;
pub mod error;
pub mod export;
pub mod form;
pub mod import;
pub mod notifications;
pub mod payments;
pub mod sections;
pub mod staging;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use tally_core::store::AccountStore;

pub use error::ApiError;
use staging::ImportStaging;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: AccountStore> {
  pub store:       Arc<S>,
  pub staging:     Arc<ImportStaging>,
  /// Most clients an account may hold after an import.
  pub max_clients: usize,
}

impl<S: AccountStore> AppState<S> {
  pub fn new(store: S, max_clients: usize) -> Self {
    Self {
      store: Arc::new(store),
      staging: Arc::new(ImportStaging::new()),
      max_clients,
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the settings router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Settings sections
    .route(
      "/company/details",
      get(sections::details::<S>).post(details::save::<S>),
    )
    .route(
      "/company/payments",
      get(sections::payments::<S>).post(payments::save::<S>),
    )
    .route(
      "/company/notifications",
      get(sections::notifications::<S>).post(notifications::save::<S>),
    )
    .route("/company/import_export", get(sections::import_export::<S>))
    // Import / export
    .route("/company/import", post(import::upload::<S>))
    .route("/company/map", post(import::confirm::<S>))
    .route("/company/export", get(export::handler::<S>))
    // Helpers
    .route("/check_email", get(details::check_email::<S>))
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────
