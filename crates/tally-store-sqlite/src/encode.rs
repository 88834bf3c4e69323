//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and calendar dates as
//! `YYYY-MM-DD`. UUIDs are stored as hyphenated lowercase strings. Each
//! `Raw*` struct holds one row exactly as read; `into_*` does the decoding
//! outside the database thread.

use chrono::{DateTime, NaiveDate, Utc};
use tally_core::{
  account::{Account, User},
  activity::{Activity, ActivityKind},
  country::Country,
  gateway::{AccountGateway, Gateway},
  ledger::{Credit, Invoice, InvoiceItem, Payment},
  record::{Client, Contact},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn decode_opt_uuid(s: Option<String>) -> Result<Option<Uuid>> {
  s.as_deref().map(decode_uuid).transpose()
}

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Accounts and users ──────────────────────────────────────────────────────

pub const ACCOUNT_COLUMNS: &str = "account_id, account_key, name, work_email, work_phone,
  address1, address2, city, state, postal_code, country_id, size_id, industry_id,
  timezone_id, date_format_id, datetime_format_id, currency_id, language_id,
  invoice_terms, email_footer, created_at";

pub struct RawAccount {
  pub account_id:         String,
  pub account_key:        String,
  pub name:               String,
  pub work_email:         String,
  pub work_phone:         String,
  pub address1:           String,
  pub address2:           String,
  pub city:               String,
  pub state:              String,
  pub postal_code:        String,
  pub country_id:         Option<u32>,
  pub size_id:            Option<u32>,
  pub industry_id:        Option<u32>,
  pub timezone_id:        Option<u32>,
  pub date_format_id:     Option<u32>,
  pub datetime_format_id: Option<u32>,
  pub currency_id:        u32,
  pub language_id:        u32,
  pub invoice_terms:      String,
  pub email_footer:       String,
  pub created_at:         String,
}

impl RawAccount {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      account_id:         row.get(0)?,
      account_key:        row.get(1)?,
      name:               row.get(2)?,
      work_email:         row.get(3)?,
      work_phone:         row.get(4)?,
      address1:           row.get(5)?,
      address2:           row.get(6)?,
      city:               row.get(7)?,
      state:              row.get(8)?,
      postal_code:        row.get(9)?,
      country_id:         row.get(10)?,
      size_id:            row.get(11)?,
      industry_id:        row.get(12)?,
      timezone_id:        row.get(13)?,
      date_format_id:     row.get(14)?,
      datetime_format_id: row.get(15)?,
      currency_id:        row.get(16)?,
      language_id:        row.get(17)?,
      invoice_terms:      row.get(18)?,
      email_footer:       row.get(19)?,
      created_at:         row.get(20)?,
    })
  }

  pub fn into_account(self) -> Result<Account> {
    Ok(Account {
      account_id:         decode_uuid(&self.account_id)?,
      account_key:        self.account_key,
      name:               self.name,
      work_email:         self.work_email,
      work_phone:         self.work_phone,
      address1:           self.address1,
      address2:           self.address2,
      city:               self.city,
      state:              self.state,
      postal_code:        self.postal_code,
      country_id:         self.country_id,
      size_id:            self.size_id,
      industry_id:        self.industry_id,
      timezone_id:        self.timezone_id,
      date_format_id:     self.date_format_id,
      datetime_format_id: self.datetime_format_id,
      currency_id:        self.currency_id,
      language_id:        self.language_id,
      invoice_terms:      self.invoice_terms,
      email_footer:       self.email_footer,
      created_at:         decode_dt(&self.created_at)?,
    })
  }
}

pub const USER_COLUMNS: &str = "user_id, account_id, first_name, last_name, username,
  email, phone, notify_sent, notify_viewed, notify_paid";

pub struct RawUser {
  pub user_id:       String,
  pub account_id:    String,
  pub first_name:    String,
  pub last_name:     String,
  pub username:      String,
  pub email:         String,
  pub phone:         String,
  pub notify_sent:   bool,
  pub notify_viewed: bool,
  pub notify_paid:   bool,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      account_id:    row.get(1)?,
      first_name:    row.get(2)?,
      last_name:     row.get(3)?,
      username:      row.get(4)?,
      email:         row.get(5)?,
      phone:         row.get(6)?,
      notify_sent:   row.get(7)?,
      notify_viewed: row.get(8)?,
      notify_paid:   row.get(9)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       decode_uuid(&self.user_id)?,
      account_id:    decode_uuid(&self.account_id)?,
      first_name:    self.first_name,
      last_name:     self.last_name,
      username:      self.username,
      email:         self.email,
      phone:         self.phone,
      notify_sent:   self.notify_sent,
      notify_viewed: self.notify_viewed,
      notify_paid:   self.notify_paid,
    })
  }
}

// ─── Reference data ──────────────────────────────────────────────────────────

pub fn country_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Country> {
  Ok(Country {
    country_id: row.get(0)?,
    name:       row.get(1)?,
    iso_3166_2: row.get(2)?,
  })
}

pub struct RawGateway {
  pub gateway_id:  u32,
  pub name:        String,
  pub provider:    String,
  pub fields_json: String,
}

impl RawGateway {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      gateway_id:  row.get(0)?,
      name:        row.get(1)?,
      provider:    row.get(2)?,
      fields_json: row.get(3)?,
    })
  }

  pub fn into_gateway(self) -> Result<Gateway> {
    Ok(Gateway {
      gateway_id: self.gateway_id,
      name:       self.name,
      provider:   self.provider,
      fields:     serde_json::from_str(&self.fields_json)?,
    })
  }
}

pub struct RawAccountGateway {
  pub account_gateway_id: String,
  pub account_id:         String,
  pub gateway_id:         u32,
  pub config_json:        String,
}

impl RawAccountGateway {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      account_gateway_id: row.get(0)?,
      account_id:         row.get(1)?,
      gateway_id:         row.get(2)?,
      config_json:        row.get(3)?,
    })
  }

  pub fn into_account_gateway(self) -> Result<AccountGateway> {
    Ok(AccountGateway {
      account_gateway_id: decode_uuid(&self.account_gateway_id)?,
      account_id:         decode_uuid(&self.account_id)?,
      gateway_id:         self.gateway_id,
      config:             serde_json::from_str(&self.config_json)?,
    })
  }
}

// ─── Clients, contacts, activities ───────────────────────────────────────────

pub const CLIENT_COLUMNS: &str = "client_id, account_id, name, work_phone, address1,
  address2, city, state, postal_code, country_id, private_notes, created_at";

pub struct RawClient {
  pub client_id:     String,
  pub account_id:    String,
  pub name:          String,
  pub work_phone:    String,
  pub address1:      String,
  pub address2:      String,
  pub city:          String,
  pub state:         String,
  pub postal_code:   String,
  pub country_id:    Option<u32>,
  pub private_notes: String,
  pub created_at:    String,
}

impl RawClient {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      client_id:     row.get(0)?,
      account_id:    row.get(1)?,
      name:          row.get(2)?,
      work_phone:    row.get(3)?,
      address1:      row.get(4)?,
      address2:      row.get(5)?,
      city:          row.get(6)?,
      state:         row.get(7)?,
      postal_code:   row.get(8)?,
      country_id:    row.get(9)?,
      private_notes: row.get(10)?,
      created_at:    row.get(11)?,
    })
  }

  pub fn into_client(self) -> Result<Client> {
    Ok(Client {
      client_id:     decode_uuid(&self.client_id)?,
      account_id:    decode_uuid(&self.account_id)?,
      name:          self.name,
      work_phone:    self.work_phone,
      address1:      self.address1,
      address2:      self.address2,
      city:          self.city,
      state:         self.state,
      postal_code:   self.postal_code,
      country_id:    self.country_id,
      private_notes: self.private_notes,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

pub const CONTACT_COLUMNS: &str = "contact_id, client_id, account_id, first_name,
  last_name, phone, email, is_primary, created_at";

pub struct RawContact {
  pub contact_id: String,
  pub client_id:  String,
  pub account_id: String,
  pub first_name: String,
  pub last_name:  String,
  pub phone:      String,
  pub email:      String,
  pub is_primary: bool,
  pub created_at: String,
}

impl RawContact {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      contact_id: row.get(0)?,
      client_id:  row.get(1)?,
      account_id: row.get(2)?,
      first_name: row.get(3)?,
      last_name:  row.get(4)?,
      phone:      row.get(5)?,
      email:      row.get(6)?,
      is_primary: row.get(7)?,
      created_at: row.get(8)?,
    })
  }

  pub fn into_contact(self) -> Result<Contact> {
    Ok(Contact {
      contact_id: decode_uuid(&self.contact_id)?,
      client_id:  decode_uuid(&self.client_id)?,
      account_id: decode_uuid(&self.account_id)?,
      first_name: self.first_name,
      last_name:  self.last_name,
      phone:      self.phone,
      email:      self.email,
      is_primary: self.is_primary,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub const ACTIVITY_COLUMNS: &str =
  "activity_id, account_id, user_id, client_id, kind, message, created_at";

pub struct RawActivity {
  pub activity_id: String,
  pub account_id:  String,
  pub user_id:     String,
  pub client_id:   Option<String>,
  pub kind:        String,
  pub message:     String,
  pub created_at:  String,
}

impl RawActivity {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      activity_id: row.get(0)?,
      account_id:  row.get(1)?,
      user_id:     row.get(2)?,
      client_id:   row.get(3)?,
      kind:        row.get(4)?,
      message:     row.get(5)?,
      created_at:  row.get(6)?,
    })
  }

  pub fn into_activity(self) -> Result<Activity> {
    Ok(Activity {
      activity_id: decode_uuid(&self.activity_id)?,
      account_id:  decode_uuid(&self.account_id)?,
      user_id:     decode_uuid(&self.user_id)?,
      client_id:   decode_opt_uuid(self.client_id)?,
      kind:        ActivityKind::parse(&self.kind)?,
      message:     self.message,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

// ─── Ledger ──────────────────────────────────────────────────────────────────

pub const INVOICE_COLUMNS: &str = "invoice_id, account_id, client_id, invoice_number,
  invoice_date, due_date, amount, balance, created_at";

pub struct RawInvoice {
  pub invoice_id:     String,
  pub account_id:     String,
  pub client_id:      String,
  pub invoice_number: String,
  pub invoice_date:   String,
  pub due_date:       Option<String>,
  pub amount:         i64,
  pub balance:        i64,
  pub created_at:     String,
}

impl RawInvoice {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      invoice_id:     row.get(0)?,
      account_id:     row.get(1)?,
      client_id:      row.get(2)?,
      invoice_number: row.get(3)?,
      invoice_date:   row.get(4)?,
      due_date:       row.get(5)?,
      amount:         row.get(6)?,
      balance:        row.get(7)?,
      created_at:     row.get(8)?,
    })
  }

  pub fn into_invoice(self) -> Result<Invoice> {
    Ok(Invoice {
      invoice_id:     decode_uuid(&self.invoice_id)?,
      account_id:     decode_uuid(&self.account_id)?,
      client_id:      decode_uuid(&self.client_id)?,
      invoice_number: self.invoice_number,
      invoice_date:   decode_date(&self.invoice_date)?,
      due_date:       self.due_date.as_deref().map(decode_date).transpose()?,
      amount:         self.amount,
      balance:        self.balance,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

pub const INVOICE_ITEM_COLUMNS: &str =
  "invoice_item_id, invoice_id, account_id, product_key, notes, cost, qty";

pub struct RawInvoiceItem {
  pub invoice_item_id: String,
  pub invoice_id:      String,
  pub account_id:      String,
  pub product_key:     String,
  pub notes:           String,
  pub cost:            i64,
  pub qty:             u32,
}

impl RawInvoiceItem {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      invoice_item_id: row.get(0)?,
      invoice_id:      row.get(1)?,
      account_id:      row.get(2)?,
      product_key:     row.get(3)?,
      notes:           row.get(4)?,
      cost:            row.get(5)?,
      qty:             row.get(6)?,
    })
  }

  pub fn into_invoice_item(self) -> Result<InvoiceItem> {
    Ok(InvoiceItem {
      invoice_item_id: decode_uuid(&self.invoice_item_id)?,
      invoice_id:      decode_uuid(&self.invoice_id)?,
      account_id:      decode_uuid(&self.account_id)?,
      product_key:     self.product_key,
      notes:           self.notes,
      cost:            self.cost,
      qty:             self.qty,
    })
  }
}

pub const PAYMENT_COLUMNS: &str = "payment_id, account_id, client_id, invoice_id, amount,
  payment_date, transaction_reference, created_at";

pub struct RawPayment {
  pub payment_id:            String,
  pub account_id:            String,
  pub client_id:             String,
  pub invoice_id:            Option<String>,
  pub amount:                i64,
  pub payment_date:          String,
  pub transaction_reference: String,
  pub created_at:            String,
}

impl RawPayment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      payment_id:            row.get(0)?,
      account_id:            row.get(1)?,
      client_id:             row.get(2)?,
      invoice_id:            row.get(3)?,
      amount:                row.get(4)?,
      payment_date:          row.get(5)?,
      transaction_reference: row.get(6)?,
      created_at:            row.get(7)?,
    })
  }

  pub fn into_payment(self) -> Result<Payment> {
    Ok(Payment {
      payment_id:            decode_uuid(&self.payment_id)?,
      account_id:            decode_uuid(&self.account_id)?,
      client_id:             decode_uuid(&self.client_id)?,
      invoice_id:            decode_opt_uuid(self.invoice_id)?,
      amount:                self.amount,
      payment_date:          decode_date(&self.payment_date)?,
      transaction_reference: self.transaction_reference,
      created_at:            decode_dt(&self.created_at)?,
    })
  }
}

pub const CREDIT_COLUMNS: &str = "credit_id, account_id, client_id, amount, balance,
  credit_date, credit_number, private_notes, created_at";

pub struct RawCredit {
  pub credit_id:     String,
  pub account_id:    String,
  pub client_id:     String,
  pub amount:        i64,
  pub balance:       i64,
  pub credit_date:   String,
  pub credit_number: String,
  pub private_notes: String,
  pub created_at:    String,
}

impl RawCredit {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      credit_id:     row.get(0)?,
      account_id:    row.get(1)?,
      client_id:     row.get(2)?,
      amount:        row.get(3)?,
      balance:       row.get(4)?,
      credit_date:   row.get(5)?,
      credit_number: row.get(6)?,
      private_notes: row.get(7)?,
      created_at:    row.get(8)?,
    })
  }

  pub fn into_credit(self) -> Result<Credit> {
    Ok(Credit {
      credit_id:     decode_uuid(&self.credit_id)?,
      account_id:    decode_uuid(&self.account_id)?,
      client_id:     decode_uuid(&self.client_id)?,
      amount:        self.amount,
      balance:       self.balance,
      credit_date:   decode_date(&self.credit_date)?,
      credit_number: self.credit_number,
      private_notes: self.private_notes,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}
