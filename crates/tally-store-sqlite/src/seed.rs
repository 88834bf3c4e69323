//! Reference rows inserted at startup: countries and payment gateways.
//!
//! Seeding uses `INSERT OR IGNORE`, so re-opening a store is a no-op.

/// `(ISO numeric, name, ISO alpha-2)`.
pub const COUNTRIES: &[(u32, &str, &str)] = &[
  (36, "Australia", "AU"),
  (40, "Austria", "AT"),
  (56, "Belgium", "BE"),
  (76, "Brazil", "BR"),
  (124, "Canada", "CA"),
  (156, "China", "CN"),
  (208, "Denmark", "DK"),
  (246, "Finland", "FI"),
  (250, "France", "FR"),
  (276, "Germany", "DE"),
  (356, "India", "IN"),
  (372, "Ireland", "IE"),
  (376, "Israel", "IL"),
  (380, "Italy", "IT"),
  (392, "Japan", "JP"),
  (484, "Mexico", "MX"),
  (528, "Netherlands", "NL"),
  (554, "New Zealand", "NZ"),
  (578, "Norway", "NO"),
  (616, "Poland", "PL"),
  (620, "Portugal", "PT"),
  (710, "South Africa", "ZA"),
  (724, "Spain", "ES"),
  (752, "Sweden", "SE"),
  (756, "Switzerland", "CH"),
  (826, "United Kingdom", "GB"),
  (840, "United States", "US"),
];

/// `(id, name, provider, parameter names)`.
pub const GATEWAYS: &[(u32, &str, &str, &[&str])] = &[
  (1, "Authorize.Net AIM", "AuthorizeNet_AIM", &[
    "apiLoginId",
    "transactionKey",
    "testMode",
    "developerMode",
  ]),
  (2, "PayPal Express", "PayPal_Express", &[
    "username",
    "password",
    "signature",
    "testMode",
    "solutionType",
    "landingPage",
    "brandName",
    "headerImageUrl",
  ]),
  (3, "Stripe", "Stripe", &["apiKey"]),
];

pub fn seed(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
  let mut country = conn.prepare(
    "INSERT OR IGNORE INTO countries (country_id, name, iso_3166_2) VALUES (?1, ?2, ?3)",
  )?;
  for (id, name, iso) in COUNTRIES {
    country.execute(rusqlite::params![id, name, iso])?;
  }

  let mut gateway = conn.prepare(
    "INSERT OR IGNORE INTO gateways (gateway_id, name, provider, fields_json)
     VALUES (?1, ?2, ?3, ?4)",
  )?;
  for (id, name, provider, fields) in GATEWAYS {
    let fields_json = serde_json::Value::from(fields.to_vec()).to_string();
    gateway.execute(rusqlite::params![id, name, provider, fields_json])?;
  }
  Ok(())
}
