//! Header detection and column-mapping inference.

use serde::Serialize;
use tally_core::field::{ColumnMapping, FieldTag};

use crate::{Error, Result};

/// Keyword sets tested against a lower-cased column title, in order. The
/// first set with a substring hit assigns the column's tag, so e.g. a
/// "Phone/Mobile" column is a contact phone because `mobile` comes first.
const KEYWORDS: &[(&[&str], FieldTag)] = &[
  (&["first"], FieldTag::ContactFirstName),
  (&["last"], FieldTag::ContactLastName),
  (&["email"], FieldTag::ContactEmail),
  (&["mobile"], FieldTag::ContactPhone),
  (&["phone"], FieldTag::ClientPhone),
  (&["name", "organization"], FieldTag::ClientName),
  (&["street", "address", "address1"], FieldTag::ClientAddress1),
  (&["street2", "address2"], FieldTag::ClientAddress2),
  (&["city"], FieldTag::ClientCity),
  (&["state", "province"], FieldTag::ClientState),
  (&["zip", "postal", "code"], FieldTag::ClientPostalCode),
  (&["country"], FieldTag::ClientCountry),
  (&["note"], FieldTag::ClientNotes),
];

/// Titles with this prefix ("secondary phone", ...) are never mapped.
const SKIPPED_PREFIX: &str = "sec";

/// The first row is a header if any title contains "name", ignoring case.
pub fn has_header_row(first_row: &[String]) -> bool {
  first_row
    .iter()
    .any(|title| title.to_lowercase().contains("name"))
}

/// The tag a header title suggests, if any.
pub fn infer_tag(title: &str) -> Option<FieldTag> {
  let title = title.to_lowercase();
  if title.starts_with(SKIPPED_PREFIX) {
    return None;
  }
  KEYWORDS
    .iter()
    .find(|(keywords, _)| keywords.iter().any(|k| title.contains(k)))
    .map(|(_, tag)| *tag)
}

/// One entry per column of `first_row`; all unmapped unless `has_headers`.
pub fn infer_mapping(first_row: &[String], has_headers: bool) -> ColumnMapping {
  if !has_headers {
    return ColumnMapping::unmapped(first_row.len());
  }
  first_row.iter().map(|title| infer_tag(title)).collect::<Vec<_>>().into()
}

/// Everything the confirmation step needs to show the proposed mapping.
#[derive(Debug, Clone, Serialize)]
pub struct MappingProposal {
  /// Every parsed row, header included.
  pub rows:        Vec<Vec<String>>,
  /// The first row, whether or not it was judged to be a header.
  pub headers:     Option<Vec<String>>,
  pub has_headers: bool,
  /// The selectable tags, in offer order; "unmapped" is implied.
  pub columns:     Vec<FieldTag>,
  pub mapped:      ColumnMapping,
}

/// Fails with [`Error::ClientLimit`] when `row_count + existing_clients`
/// exceeds `max_clients`. Every parsed row counts, header included.
pub fn check_limit(row_count: usize, existing_clients: usize, max_clients: usize) -> Result<()> {
  if row_count.saturating_add(existing_clients) > max_clients {
    return Err(Error::ClientLimit { max: max_clients });
  }
  Ok(())
}

/// Check the client limit, then infer the header flag and mapping.
pub fn propose(
  rows: Vec<Vec<String>>,
  existing_clients: usize,
  max_clients: usize,
) -> Result<MappingProposal> {
  check_limit(rows.len(), existing_clients, max_clients)?;

  let (headers, has_headers, mapped) = match rows.first() {
    Some(first) => {
      let has_headers = has_header_row(first);
      (Some(first.clone()), has_headers, infer_mapping(first, has_headers))
    }
    None => (None, false, ColumnMapping::default()),
  };

  Ok(MappingProposal {
    rows,
    headers,
    has_headers,
    columns: FieldTag::all(),
    mapped,
  })
}
