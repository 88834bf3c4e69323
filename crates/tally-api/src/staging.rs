//! Uploaded rows waiting for the user to confirm a column mapping.

use std::{
  collections::HashMap,
  sync::{Mutex, PoisonError},
};

use uuid::Uuid;

struct StagedImport {
  token: Uuid,
  rows:  Vec<Vec<String>>,
}

/// At most one parsed upload per user, retrieved with the token handed out
/// when it was staged.
///
/// A new upload replaces the user's previous one, and [`ImportStaging::take`]
/// consumes it, so each upload can be imported at most once.
#[derive(Default)]
pub struct ImportStaging {
  uploads: Mutex<HashMap<Uuid, StagedImport>>,
}

impl ImportStaging {
  pub fn new() -> Self { Self::default() }

  /// Hold `rows` for `user_id`, discarding anything they staged before, and
  /// return the token that retrieves them.
  pub fn stage(&self, user_id: Uuid, rows: Vec<Vec<String>>) -> Uuid {
    let token = Uuid::new_v4();
    self
      .uploads
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .insert(user_id, StagedImport { token, rows });
    token
  }

  /// Remove and return the rows `user_id` staged under `token`. A stale
  /// token leaves the current upload in place.
  pub fn take(&self, token: Uuid, user_id: Uuid) -> Option<Vec<Vec<String>>> {
    let mut uploads = self.uploads.lock().unwrap_or_else(PoisonError::into_inner);
    if uploads.get(&user_id)?.token != token {
      return None;
    }
    uploads.remove(&user_id).map(|staged| staged.rows)
  }

  pub fn len(&self) -> usize {
    self.uploads.lock().unwrap_or_else(PoisonError::into_inner).len()
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}
