//! Countries and the per-run lookup index built from them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// ISO 3166-1 numeric code.
pub type CountryId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
  pub country_id: CountryId,
  pub name:       String,
  /// ISO 3166-1 alpha-2 code, e.g. `"CA"`.
  pub iso_3166_2: String,
}

/// Read-only map from lower-cased country name to country id.
///
/// Built from the store's country table at the start of every import run and
/// dropped when the run ends; it is never shared between runs.
#[derive(Debug, Clone, Default)]
pub struct CountryIndex {
  by_name: HashMap<String, CountryId>,
}

impl CountryIndex {
  pub fn new(countries: &[Country]) -> Self {
    countries.iter().collect()
  }

  /// Case-insensitive lookup. Unknown names resolve to `None`.
  pub fn resolve(&self, name: &str) -> Option<CountryId> {
    self.by_name.get(&name.to_lowercase()).copied()
  }

  pub fn len(&self) -> usize { self.by_name.len() }

  pub fn is_empty(&self) -> bool { self.by_name.is_empty() }
}

impl<'a> FromIterator<&'a Country> for CountryIndex {
  fn from_iter<I: IntoIterator<Item = &'a Country>>(iter: I) -> Self {
    let by_name = iter
      .into_iter()
      .map(|c| (c.name.to_lowercase(), c.country_id))
      .collect();
    Self { by_name }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn countries() -> Vec<Country> {
    vec![
      Country { country_id: 124, name: "Canada".into(), iso_3166_2: "CA".into() },
      Country { country_id: 250, name: "France".into(), iso_3166_2: "FR".into() },
    ]
  }

  #[test]
  fn resolve_ignores_case() {
    let index = CountryIndex::new(&countries());
    assert_eq!(index.resolve("CANADA"), Some(124));
    assert_eq!(index.resolve("canada"), Some(124));
    assert_eq!(index.resolve("France"), Some(250));
  }

  #[test]
  fn unknown_country_is_absent() {
    let index = CountryIndex::new(&countries());
    assert_eq!(index.resolve("Atlantis"), None);
    assert_eq!(index.resolve(""), None);
    assert_eq!(index.len(), 2);
  }
}
