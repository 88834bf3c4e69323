//! Client and contact records.
//!
//! `New*` types are what a caller hands to the store; the persisted types
//! carry the identity and timestamps the store assigns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{activity::Activity, country::CountryId};

// ─── Client ──────────────────────────────────────────────────────────────────

/// Company data for a client that has not been persisted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
  pub name:          String,
  pub work_phone:    String,
  pub address1:      String,
  pub address2:      String,
  pub city:          String,
  pub state:         String,
  pub postal_code:   String,
  pub country_id:    Option<CountryId>,
  pub private_notes: String,
}

/// A persisted client. Field order is the column order of the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
  pub client_id:     Uuid,
  pub account_id:    Uuid,
  pub name:          String,
  pub work_phone:    String,
  pub address1:      String,
  pub address2:      String,
  pub city:          String,
  pub state:         String,
  pub postal_code:   String,
  pub country_id:    Option<CountryId>,
  pub private_notes: String,
  pub created_at:    DateTime<Utc>,
}

impl Client {
  pub fn from_new(
    client_id: Uuid,
    account_id: Uuid,
    input: NewClient,
    created_at: DateTime<Utc>,
  ) -> Self {
    Self {
      client_id,
      account_id,
      name: input.name,
      work_phone: input.work_phone,
      address1: input.address1,
      address2: input.address2,
      city: input.city,
      state: input.state,
      postal_code: input.postal_code,
      country_id: input.country_id,
      private_notes: input.private_notes,
      created_at,
    }
  }
}

// ─── Contact ─────────────────────────────────────────────────────────────────

/// A person at a client who has not been persisted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
  pub first_name: String,
  pub last_name:  String,
  pub phone:      String,
  /// Stored lower-cased.
  pub email:      String,
  pub is_primary: bool,
}

impl NewContact {
  /// An empty contact marked as its client's primary contact.
  pub fn primary() -> Self { Self { is_primary: true, ..Self::default() } }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
  pub contact_id: Uuid,
  pub client_id:  Uuid,
  pub account_id: Uuid,
  pub first_name: String,
  pub last_name:  String,
  pub phone:      String,
  pub email:      String,
  pub is_primary: bool,
  pub created_at: DateTime<Utc>,
}

impl Contact {
  pub fn from_new(
    contact_id: Uuid,
    client: &Client,
    input: NewContact,
    created_at: DateTime<Utc>,
  ) -> Self {
    Self {
      contact_id,
      client_id: client.client_id,
      account_id: client.account_id,
      first_name: input.first_name,
      last_name: input.last_name,
      phone: input.phone,
      email: input.email,
      is_primary: input.is_primary,
      created_at,
    }
  }
}

// ─── Creation result ─────────────────────────────────────────────────────────

/// Everything written by [`crate::store::AccountStore::create_client`] in a
/// single unit of work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedClient {
  pub client:   Client,
  pub contact:  Contact,
  pub activity: Activity,
}
