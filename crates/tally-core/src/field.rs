//! Importable field tags and the column mapping built from them.
//!
//! A [`ColumnMapping`] is index-aligned to the columns of an uploaded CSV
//! file: entry `i` says which record field column `i` feeds, or nothing.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
use strum::{EnumCount, EnumIter, IntoEnumIterator};

use crate::Error;

// ─── FieldTag ────────────────────────────────────────────────────────────────

/// A target field on either the client or its primary contact.
///
/// The declaration order is the order the fields are offered to the user
/// when confirming a mapping.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  EnumIter,
  EnumCount,
)]
#[serde(rename_all = "snake_case")]
pub enum FieldTag {
  ClientName,
  ClientPhone,
  ClientAddress1,
  ClientAddress2,
  ClientCity,
  ClientState,
  ClientPostalCode,
  ClientCountry,
  ClientNotes,
  ContactFirstName,
  ContactLastName,
  ContactPhone,
  ContactEmail,
}

impl FieldTag {
  /// Every selectable tag, in offer order.
  pub fn all() -> Vec<FieldTag> { Self::iter().collect() }

  /// Wire name used in form data and JSON. Must match the serde tags above.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::ClientName => "client_name",
      Self::ClientPhone => "client_phone",
      Self::ClientAddress1 => "client_address1",
      Self::ClientAddress2 => "client_address2",
      Self::ClientCity => "client_city",
      Self::ClientState => "client_state",
      Self::ClientPostalCode => "client_postal_code",
      Self::ClientCountry => "client_country",
      Self::ClientNotes => "client_notes",
      Self::ContactFirstName => "contact_first_name",
      Self::ContactLastName => "contact_last_name",
      Self::ContactPhone => "contact_phone",
      Self::ContactEmail => "contact_email",
    }
  }

  /// Human-readable label for the mapping screen.
  pub fn label(&self) -> &'static str {
    match self {
      Self::ClientName => "Organization",
      Self::ClientPhone => "Phone",
      Self::ClientAddress1 => "Street",
      Self::ClientAddress2 => "Apt/Floor",
      Self::ClientCity => "City",
      Self::ClientState => "State/Province",
      Self::ClientPostalCode => "Postal Code",
      Self::ClientCountry => "Country",
      Self::ClientNotes => "Notes",
      Self::ContactFirstName => "First Name",
      Self::ContactLastName => "Last Name",
      Self::ContactPhone => "Mobile Phone",
      Self::ContactEmail => "Email",
    }
  }
}

impl FromStr for FieldTag {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::iter()
      .find(|tag| tag.as_str() == s)
      .ok_or_else(|| Error::UnknownFieldTag(s.to_owned()))
  }
}

// ─── ColumnMapping ───────────────────────────────────────────────────────────

/// Index-aligned assignment of CSV columns to target fields.
///
/// Serialised as a list of wire names with `""` for an unmapped column, which
/// is the shape the confirmation form submits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping(Vec<Option<FieldTag>>);

impl ColumnMapping {
  pub fn new(columns: Vec<Option<FieldTag>>) -> Self { Self(columns) }

  /// A mapping of `len` columns, all unmapped.
  pub fn unmapped(len: usize) -> Self { Self(vec![None; len]) }

  /// The tag for column `index`; columns past the end are unmapped.
  pub fn get(&self, index: usize) -> Option<FieldTag> {
    self.0.get(index).copied().flatten()
  }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn columns(&self) -> &[Option<FieldTag>] { &self.0 }
}

impl From<Vec<Option<FieldTag>>> for ColumnMapping {
  fn from(columns: Vec<Option<FieldTag>>) -> Self { Self(columns) }
}

impl Serialize for ColumnMapping {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(
      self.0.iter().map(|tag| tag.map(|t| t.as_str()).unwrap_or("")),
    )
  }
}

impl<'de> Deserialize<'de> for ColumnMapping {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = Vec::<Option<String>>::deserialize(deserializer)?;
    raw
      .into_iter()
      .map(|entry| match entry.as_deref() {
        None | Some("") => Ok(None),
        Some(name) => FieldTag::from_str(name).map(Some).map_err(D::Error::custom),
      })
      .collect::<Result<Vec<_>, _>>()
      .map(Self)
  }
}
