//! Mapping confirmed CSV rows onto new client and contact records.

use tally_core::{
  country::{CountryId, CountryIndex},
  field::{ColumnMapping, FieldTag},
  record::{NewClient, NewContact},
};

// ─── Field slots ─────────────────────────────────────────────────────────────

/// A mutable view of the record field a tag writes to.
enum Slot<'a> {
  Text(&'a mut String),
  /// Stored lower-cased.
  Email(&'a mut String),
  /// Resolved through the country index.
  Country(&'a mut Option<CountryId>),
}

impl<'a> Slot<'a> {
  fn for_tag(
    tag: FieldTag,
    client: &'a mut NewClient,
    contact: &'a mut NewContact,
  ) -> Self {
    match tag {
      FieldTag::ClientName => Slot::Text(&mut client.name),
      FieldTag::ClientPhone => Slot::Text(&mut client.work_phone),
      FieldTag::ClientAddress1 => Slot::Text(&mut client.address1),
      FieldTag::ClientAddress2 => Slot::Text(&mut client.address2),
      FieldTag::ClientCity => Slot::Text(&mut client.city),
      FieldTag::ClientState => Slot::Text(&mut client.state),
      FieldTag::ClientPostalCode => Slot::Text(&mut client.postal_code),
      FieldTag::ClientCountry => Slot::Country(&mut client.country_id),
      FieldTag::ClientNotes => Slot::Text(&mut client.private_notes),
      FieldTag::ContactFirstName => Slot::Text(&mut contact.first_name),
      FieldTag::ContactLastName => Slot::Text(&mut contact.last_name),
      FieldTag::ContactPhone => Slot::Text(&mut contact.phone),
      FieldTag::ContactEmail => Slot::Email(&mut contact.email),
    }
  }

  fn is_filled(&self) -> bool {
    match self {
      Slot::Text(field) | Slot::Email(field) => !field.is_empty(),
      Slot::Country(field) => field.is_some(),
    }
  }

  fn fill(self, value: &str, countries: &CountryIndex) {
    match self {
      Slot::Text(field) => *field = value.to_owned(),
      Slot::Email(field) => *field = value.to_lowercase(),
      Slot::Country(field) => *field = countries.resolve(value),
    }
  }
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// A data row mapped onto records, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedRow {
  /// 1-based position of the row in the uploaded file.
  pub line:    usize,
  pub client:  NewClient,
  pub contact: NewContact,
}

/// Map one row. Cells are trimmed; a field already set by an earlier column
/// is left alone. An unknown country leaves the reference absent.
pub fn map_row(
  row: &[String],
  mapping: &ColumnMapping,
  countries: &CountryIndex,
) -> (NewClient, NewContact) {
  let mut client = NewClient::default();
  let mut contact = NewContact::primary();

  for (index, cell) in row.iter().enumerate() {
    let Some(tag) = mapping.get(index) else { continue };
    let slot = Slot::for_tag(tag, &mut client, &mut contact);
    if !slot.is_filled() {
      slot.fill(cell.trim(), countries);
    }
  }

  (client, contact)
}

/// Map every data row, skipping exactly one leading row when `has_headers`.
pub fn map_rows<'a>(
  rows: &'a [Vec<String>],
  mapping: &'a ColumnMapping,
  has_headers: bool,
  countries: &'a CountryIndex,
) -> impl Iterator<Item = MappedRow> + 'a {
  let skip = usize::from(has_headers);
  rows.iter().enumerate().skip(skip).map(move |(index, row)| {
    let (client, contact) = map_row(row, mapping, countries);
    MappedRow { line: index + 1, client, contact }
  })
}

#[cfg(test)]
mod tests {
  use tally_core::country::Country;

  use super::*;

  fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
  }

  fn countries() -> CountryIndex {
    CountryIndex::new(&[
      Country { country_id: 124, name: "Canada".into(), iso_3166_2: "CA".into() },
      Country { country_id: 840, name: "United States".into(), iso_3166_2: "US".into() },
    ])
  }

  fn mapping(tags: &[Option<FieldTag>]) -> ColumnMapping {
    ColumnMapping::new(tags.to_vec())
  }

  #[test]
  fn maps_every_field() {
    use FieldTag::*;
    let tags = [
      ClientName, ClientPhone, ClientAddress1, ClientAddress2, ClientCity,
      ClientState, ClientPostalCode, ClientCountry, ClientNotes,
      ContactFirstName, ContactLastName, ContactPhone, ContactEmail,
    ];
    let m = mapping(&tags.map(Some));
    let cells = row(&[
      " Acme ", "555-0100", "1 Main St", "Floor 2", "Toronto", "ON", "M5V",
      "canada", "VIP", "Ada", "Lovelace", "555-0199", " Ada@Acme.COM ",
    ]);

    let (client, contact) = map_row(&cells, &m, &countries());
    assert_eq!(client.name, "Acme");
    assert_eq!(client.work_phone, "555-0100");
    assert_eq!(client.address1, "1 Main St");
    assert_eq!(client.address2, "Floor 2");
    assert_eq!(client.city, "Toronto");
    assert_eq!(client.state, "ON");
    assert_eq!(client.postal_code, "M5V");
    assert_eq!(client.country_id, Some(124));
    assert_eq!(client.private_notes, "VIP");
    assert_eq!(contact.first_name, "Ada");
    assert_eq!(contact.last_name, "Lovelace");
    assert_eq!(contact.phone, "555-0199");
    assert_eq!(contact.email, "ada@acme.com");
    assert!(contact.is_primary);
  }

  #[test]
  fn first_match_wins() {
    let m = mapping(&[Some(FieldTag::ClientPhone), Some(FieldTag::ClientPhone)]);
    let (client, _) = map_row(&row(&["111", "222"]), &m, &countries());
    assert_eq!(client.work_phone, "111");
  }

  #[test]
  fn empty_cell_does_not_claim_the_field() {
    let m = mapping(&[Some(FieldTag::ClientPhone), Some(FieldTag::ClientPhone)]);
    let (client, _) = map_row(&row(&["  ", "222"]), &m, &countries());
    assert_eq!(client.work_phone, "222");
  }

  #[test]
  fn country_lookup_ignores_case() {
    let m = mapping(&[Some(FieldTag::ClientCountry)]);
    let (upper, _) = map_row(&row(&["CANADA"]), &m, &countries());
    let (lower, _) = map_row(&row(&["canada"]), &m, &countries());
    assert_eq!(upper.country_id, Some(124));
    assert_eq!(upper.country_id, lower.country_id);
  }

  #[test]
  fn unknown_country_is_absent_and_later_column_may_fill() {
    let m = mapping(&[Some(FieldTag::ClientCountry)]);
    let (client, _) = map_row(&row(&["Atlantis"]), &m, &countries());
    assert_eq!(client.country_id, None);

    let m = mapping(&[Some(FieldTag::ClientCountry), Some(FieldTag::ClientCountry)]);
    let (client, _) = map_row(&row(&["Atlantis", "United States"]), &m, &countries());
    assert_eq!(client.country_id, Some(840));
  }

  #[test]
  fn unmapped_and_out_of_range_columns_are_ignored() {
    let m = mapping(&[None, Some(FieldTag::ClientName)]);
    let (client, contact) =
      map_row(&row(&["ignored", "Acme", "extra column"]), &m, &countries());
    assert_eq!(client, NewClient { name: "Acme".into(), ..NewClient::default() });
    assert_eq!(contact, NewContact::primary());
  }

  #[test]
  fn header_row_is_skipped_once() {
    let rows = vec![row(&["Name", "Email"]), row(&["Acme", "a@x.com"])];
    let m = mapping(&[Some(FieldTag::ClientName), Some(FieldTag::ContactEmail)]);
    let index = countries();

    let mapped: Vec<_> = map_rows(&rows, &m, true, &index).collect();
    assert_eq!(mapped.len(), 1);
    assert_eq!(mapped[0].line, 2);
    assert_eq!(mapped[0].client.name, "Acme");
    assert_eq!(mapped[0].contact.email, "a@x.com");
    assert!(mapped[0].contact.is_primary);

    let all: Vec<_> = map_rows(&rows, &m, false, &index).collect();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].client.name, "Name");
  }
}
