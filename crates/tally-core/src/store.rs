//! The `AccountStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `tally-store-sqlite`).
//! Higher layers (`tally-api`, `tally-server`) depend on this abstraction, not
//! on any concrete backend. Every read and write of account-owned data is
//! scoped by an explicit `account_id`.

use std::future::Future;

use uuid::Uuid;

use crate::{
  account::{Account, NewUser, User},
  activity::Activity,
  country::Country,
  gateway::{AccountGateway, Gateway, NewAccountGateway},
  ledger::{Credit, Invoice, InvoiceItem, NewCredit, NewInvoice, NewPayment, Payment},
  record::{Client, Contact, CreatedClient, NewClient, NewContact},
};

/// Abstraction over a Tally store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait AccountStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Accounts and users ────────────────────────────────────────────────

  /// Create an account with a blank profile and a fresh account key.
  fn create_account(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Account, Self::Error>> + Send + '_;

  fn get_account(
    &self,
    account_id: Uuid,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + '_;

  /// Overwrite the stored profile of `account.account_id`.
  fn update_account(
    &self,
    account: Account,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Create a user on `account_id`; the username starts out as the email.
  fn create_user(
    &self,
    account_id: Uuid,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn list_users(
    &self,
    account_id: Uuid,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Overwrite the stored user `user.user_id`.
  fn update_user(
    &self,
    user: User,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Find any user (on any account) with this email, compared
  /// case-insensitively.
  fn find_user_by_email(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Reference data ────────────────────────────────────────────────────

  /// All countries, ordered by name.
  fn list_countries(
    &self,
  ) -> impl Future<Output = Result<Vec<Country>, Self::Error>> + Send + '_;

  fn list_gateways(
    &self,
  ) -> impl Future<Output = Result<Vec<Gateway>, Self::Error>> + Send + '_;

  fn get_gateway(
    &self,
    gateway_id: u32,
  ) -> impl Future<Output = Result<Option<Gateway>, Self::Error>> + Send + '_;

  // ── Gateway configuration ─────────────────────────────────────────────

  fn get_account_gateway(
    &self,
    account_id: Uuid,
  ) -> impl Future<Output = Result<Option<AccountGateway>, Self::Error>> + Send + '_;

  /// Delete the account's gateway configuration and, if `replacement` is
  /// given, store it in its place. Both steps happen in one transaction.
  fn replace_account_gateway(
    &self,
    account_id: Uuid,
    replacement: Option<NewAccountGateway>,
  ) -> impl Future<Output = Result<Option<AccountGateway>, Self::Error>> + Send + '_;

  // ── Clients ───────────────────────────────────────────────────────────

  fn count_clients(
    &self,
    account_id: Uuid,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Persist a client, its contact, and a `create_client` activity
  /// attributed to `user_id`, as a single unit of work.
  fn create_client(
    &self,
    account_id: Uuid,
    user_id: Uuid,
    client: NewClient,
    contact: NewContact,
  ) -> impl Future<Output = Result<CreatedClient, Self::Error>> + Send + '_;

  fn list_clients(
    &self,
    account_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Client>, Self::Error>> + Send + '_;

  fn list_contacts(
    &self,
    account_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  fn list_activities(
    &self,
    account_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Activity>, Self::Error>> + Send + '_;

  // ── Ledger ────────────────────────────────────────────────────────────

  /// Persist an invoice and its line items.
  fn create_invoice(
    &self,
    account_id: Uuid,
    input: NewInvoice,
  ) -> impl Future<Output = Result<Invoice, Self::Error>> + Send + '_;

  fn record_payment(
    &self,
    account_id: Uuid,
    input: NewPayment,
  ) -> impl Future<Output = Result<Payment, Self::Error>> + Send + '_;

  fn record_credit(
    &self,
    account_id: Uuid,
    input: NewCredit,
  ) -> impl Future<Output = Result<Credit, Self::Error>> + Send + '_;

  fn list_invoices(
    &self,
    account_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Invoice>, Self::Error>> + Send + '_;

  fn list_invoice_items(
    &self,
    account_id: Uuid,
  ) -> impl Future<Output = Result<Vec<InvoiceItem>, Self::Error>> + Send + '_;

  fn list_payments(
    &self,
    account_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Payment>, Self::Error>> + Send + '_;

  fn list_credits(
    &self,
    account_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Credit>, Self::Error>> + Send + '_;
}
