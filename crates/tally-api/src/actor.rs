//! The acting user, identified by the fronting auth layer.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};
use tally_core::{account::User, store::AccountStore};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Header carrying the acting user's id.
pub const USER_HEADER: &str = "x-tally-user";

/// The user on whose behalf a request runs.
#[derive(Debug, Clone)]
pub struct Actor {
  pub user: User,
}

impl Actor {
  pub fn user_id(&self) -> Uuid { self.user.user_id }

  pub fn account_id(&self) -> Uuid { self.user.account_id }
}

/// Read the user id from `headers`; absent or malformed is unauthorized.
pub fn user_id_from_headers(headers: &HeaderMap) -> Result<Uuid, ApiError> {
  headers
    .get(USER_HEADER)
    .and_then(|v| v.to_str().ok())
    .and_then(|s| Uuid::parse_str(s.trim()).ok())
    .ok_or(ApiError::Unauthorized)
}

impl<S> FromRequestParts<AppState<S>> for Actor
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let user_id = user_id_from_headers(&parts.headers)?;
    let user = state
      .store
      .get_user(user_id)
      .await
      .map_err(ApiError::store)?
      .ok_or(ApiError::Unauthorized)?;
    Ok(Actor { user })
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{body::Body, http::Request};
  use tally_core::account::NewUser;
  use tally_store_sqlite::SqliteStore;

  use super::*;
  use crate::staging::ImportStaging;

  async fn make_state() -> AppState<SqliteStore> {
    AppState {
      store:       Arc::new(SqliteStore::open_in_memory().await.unwrap()),
      staging:     Arc::new(ImportStaging::new()),
      max_clients: 500,
    }
  }

  async fn extract(
    req: Request<Body>,
    state: &AppState<SqliteStore>,
  ) -> Result<Actor, ApiError> {
    let (mut parts, _) = req.into_parts();
    Actor::from_request_parts(&mut parts, state).await
  }

  #[tokio::test]
  async fn known_user() {
    let state = make_state().await;
    let account = state.store.create_account("Acme".into()).await.unwrap();
    let user = state
      .store
      .create_user(account.account_id, NewUser::default())
      .await
      .unwrap();

    let req = Request::builder()
      .header(USER_HEADER, user.user_id.to_string())
      .body(Body::empty())
      .unwrap();
    let actor = extract(req, &state).await.unwrap();
    assert_eq!(actor.user_id(), user.user_id);
    assert_eq!(actor.account_id(), account.account_id);
  }

  #[tokio::test]
  async fn unknown_user() {
    let state = make_state().await;
    let req = Request::builder()
      .header(USER_HEADER, Uuid::new_v4().to_string())
      .body(Body::empty())
      .unwrap();
    assert!(matches!(extract(req, &state).await, Err(ApiError::Unauthorized)));
  }

  #[tokio::test]
  async fn missing_header() {
    let state = make_state().await;
    let req = Request::builder().body(Body::empty()).unwrap();
    assert!(matches!(extract(req, &state).await, Err(ApiError::Unauthorized)));
  }

  #[tokio::test]
  async fn malformed_header() {
    let state = make_state().await;
    let req = Request::builder()
      .header(USER_HEADER, "not-a-uuid")
      .body(Body::empty())
      .unwrap();
    assert!(matches!(extract(req, &state).await, Err(ApiError::Unauthorized)));
  }
}
