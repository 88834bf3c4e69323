//! Invoices, payments and credits.
//!
//! Only the fields the account export needs are modelled. Amounts are in
//! minor currency units.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Invoices ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
  pub invoice_id:     Uuid,
  pub account_id:     Uuid,
  pub client_id:      Uuid,
  pub invoice_number: String,
  pub invoice_date:   NaiveDate,
  pub due_date:       Option<NaiveDate>,
  pub amount:         i64,
  pub balance:        i64,
  pub created_at:     DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
  pub invoice_item_id: Uuid,
  pub invoice_id:      Uuid,
  pub account_id:      Uuid,
  pub product_key:     String,
  pub notes:           String,
  pub cost:            i64,
  pub qty:             u32,
}

#[derive(Debug, Clone)]
pub struct NewInvoiceItem {
  pub product_key: String,
  pub notes:       String,
  pub cost:        i64,
  pub qty:         u32,
}

/// Input to [`crate::store::AccountStore::create_invoice`]. The amount and
/// opening balance are the sum of `cost * qty` over the items.
#[derive(Debug, Clone)]
pub struct NewInvoice {
  pub client_id:      Uuid,
  pub invoice_number: String,
  pub invoice_date:   NaiveDate,
  pub due_date:       Option<NaiveDate>,
  pub items:          Vec<NewInvoiceItem>,
}

impl NewInvoice {
  pub fn total(&self) -> i64 {
    self.items.iter().map(|i| i.cost * i64::from(i.qty)).sum()
  }
}

// ─── Payments and credits ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
  pub payment_id:            Uuid,
  pub account_id:            Uuid,
  pub client_id:             Uuid,
  pub invoice_id:            Option<Uuid>,
  pub amount:                i64,
  pub payment_date:          NaiveDate,
  pub transaction_reference: String,
  pub created_at:            DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
  pub client_id:             Uuid,
  pub invoice_id:            Option<Uuid>,
  pub amount:                i64,
  pub payment_date:          NaiveDate,
  pub transaction_reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credit {
  pub credit_id:     Uuid,
  pub account_id:    Uuid,
  pub client_id:     Uuid,
  pub amount:        i64,
  pub balance:       i64,
  pub credit_date:   NaiveDate,
  pub credit_number: String,
  pub private_notes: String,
  pub created_at:    DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCredit {
  pub client_id:     Uuid,
  pub amount:        i64,
  pub credit_date:   NaiveDate,
  pub credit_number: String,
  pub private_notes: String,
}
