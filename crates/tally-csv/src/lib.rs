//! CSV codec for Tally.
//!
//! Converts between uploaded CSV files and [`tally_core`] record types. Pure
//! synchronous; no HTTP or database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use tally_core::country::CountryIndex;
//! use tally_csv::{map_rows, propose, read_rows};
//!
//! let rows = read_rows(b"Name,Email\nAcme,a@x.com\n").unwrap();
//! let proposal = propose(rows, 0, 500).unwrap();
//! let countries = CountryIndex::default();
//! for row in map_rows(&proposal.rows, &proposal.mapped, proposal.has_headers, &countries) {
//!   println!("line {}: {}", row.line, row.client.name);
//! }
//! ```

mod apply;
pub mod error;
mod export;
mod infer;
mod read;

pub use apply::{MappedRow, map_row, map_rows};
pub use error::{Error, Result};
pub use export::{ExportSet, write_block, write_export};
pub use infer::{
  MappingProposal, check_limit, has_header_row, infer_mapping, infer_tag, propose,
};
pub use read::{detect_delimiter, read_rows};

// ─── End-to-end ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod pipeline_tests {
  use tally_core::{
    country::{Country, CountryIndex},
    field::{ColumnMapping, FieldTag},
  };

  use super::*;

  #[test]
  fn upload_to_records() {
    let csv = b"Company Name;First Name;Last Name;Email;Country;Secondary Phone\n\
                Acme;Ada;Lovelace;ADA@ACME.COM;canada;555\n\
                Globex;Hank;Scorpio;hank@globex.com;Atlantis;\n";
    let rows = read_rows(csv).unwrap();
    let proposal = propose(rows, 10, 500).unwrap();
    assert!(proposal.has_headers);
    assert_eq!(
      proposal.mapped,
      ColumnMapping::new(vec![
        Some(FieldTag::ClientName),
        Some(FieldTag::ContactFirstName),
        Some(FieldTag::ContactLastName),
        Some(FieldTag::ContactEmail),
        Some(FieldTag::ClientCountry),
        None,
      ])
    );

    let countries = CountryIndex::new(&[Country {
      country_id: 124,
      name:       "Canada".into(),
      iso_3166_2: "CA".into(),
    }]);
    let mapped: Vec<_> =
      map_rows(&proposal.rows, &proposal.mapped, proposal.has_headers, &countries)
        .collect();

    assert_eq!(mapped.len(), 2);
    assert_eq!(mapped[0].client.name, "Acme");
    assert_eq!(mapped[0].client.country_id, Some(124));
    assert_eq!(mapped[0].contact.email, "ada@acme.com");
    assert_eq!(mapped[1].client.name, "Globex");
    assert_eq!(mapped[1].client.country_id, None);
    assert_eq!(mapped[1].contact.first_name, "Hank");
  }
}
