//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use serde_json::json;
use tally_core::{
  account::{Account, NewUser, User},
  activity::ActivityKind,
  gateway::NewAccountGateway,
  ledger::{NewCredit, NewInvoice, NewInvoiceItem, NewPayment},
  record::{NewClient, NewContact},
  store::AccountStore,
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn account_with_user(s: &SqliteStore) -> (Account, User) {
  let account = s.create_account("Acme Books".into()).await.unwrap();
  let user = s
    .create_user(account.account_id, NewUser {
      first_name: "Ada".into(),
      last_name:  "Lovelace".into(),
      email:      "ada@acme.com".into(),
    })
    .await
    .unwrap();
  (account, user)
}

fn client(name: &str) -> NewClient {
  NewClient { name: name.into(), ..NewClient::default() }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

// ─── Accounts and users ──────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_account() {
  let s = store().await;
  let account = s.create_account("Acme Books".into()).await.unwrap();
  assert_eq!(account.currency_id, 1);
  assert_eq!(account.language_id, 1);
  assert_eq!(account.account_key.len(), 32);

  let fetched = s.get_account(account.account_id).await.unwrap().unwrap();
  assert_eq!(fetched.account_id, account.account_id);
  assert_eq!(fetched.name, "Acme Books");
  assert_eq!(fetched.account_key, account.account_key);
}

#[tokio::test]
async fn get_account_missing_returns_none() {
  let s = store().await;
  assert!(s.get_account(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn update_account_persists_profile() {
  let s = store().await;
  let mut account = s.create_account(String::new()).await.unwrap();
  account.name = "Globex".into();
  account.work_email = "billing@globex.com".into();
  account.country_id = Some(840);
  account.timezone_id = Some(12);
  account.currency_id = 3;
  s.update_account(account.clone()).await.unwrap();

  let fetched = s.get_account(account.account_id).await.unwrap().unwrap();
  assert_eq!(fetched.name, "Globex");
  assert_eq!(fetched.work_email, "billing@globex.com");
  assert_eq!(fetched.country_id, Some(840));
  assert_eq!(fetched.timezone_id, Some(12));
  assert_eq!(fetched.size_id, None);
  assert_eq!(fetched.currency_id, 3);
}

#[tokio::test]
async fn update_missing_account_errors() {
  let s = store().await;
  let ghost = Account::new(Uuid::new_v4(), "k".into(), chrono::Utc::now());
  let err = s.update_account(ghost).await.unwrap_err();
  assert!(matches!(err, Error::AccountNotFound(_)));
}

#[tokio::test]
async fn create_user_uses_email_as_username_and_default_notifications() {
  let s = store().await;
  let (account, user) = account_with_user(&s).await;
  assert_eq!(user.account_id, account.account_id);
  assert_eq!(user.username, "ada@acme.com");
  assert!(user.notify_sent);
  assert!(!user.notify_viewed);
  assert!(user.notify_paid);

  let fetched = s.get_user(user.user_id).await.unwrap().unwrap();
  assert_eq!(fetched, user);
  assert_eq!(s.list_users(account.account_id).await.unwrap(), vec![user]);
}

#[tokio::test]
async fn create_user_on_missing_account_errors() {
  let s = store().await;
  let err = s.create_user(Uuid::new_v4(), NewUser::default()).await.unwrap_err();
  assert!(matches!(err, Error::AccountNotFound(_)));
}

#[tokio::test]
async fn update_user_persists_changes() {
  let s = store().await;
  let (_, mut user) = account_with_user(&s).await;
  user.email = "countess@acme.com".into();
  user.username = "countess@acme.com".into();
  user.notify_viewed = true;
  user.notify_paid = false;
  s.update_user(user.clone()).await.unwrap();

  assert_eq!(s.get_user(user.user_id).await.unwrap().unwrap(), user);
}

#[tokio::test]
async fn find_user_by_email_ignores_case() {
  let s = store().await;
  let (_, user) = account_with_user(&s).await;

  let found = s.find_user_by_email("ADA@Acme.com".into()).await.unwrap();
  assert_eq!(found.map(|u| u.user_id), Some(user.user_id));
  assert!(s.find_user_by_email("nobody@acme.com".into()).await.unwrap().is_none());
}

// ─── Reference data ──────────────────────────────────────────────────────────

#[tokio::test]
async fn countries_are_seeded_in_name_order() {
  let s = store().await;
  let countries = s.list_countries().await.unwrap();
  assert!(!countries.is_empty());
  assert!(countries.windows(2).all(|w| w[0].name <= w[1].name));

  let canada = countries.iter().find(|c| c.iso_3166_2 == "CA").unwrap();
  assert_eq!(canada.name, "Canada");
  assert_eq!(canada.country_id, 124);
}

#[tokio::test]
async fn reopening_does_not_duplicate_seed_rows() {
  let s = store().await;
  let before = s.list_countries().await.unwrap().len();
  s.init_schema().await.unwrap();
  assert_eq!(s.list_countries().await.unwrap().len(), before);
}

#[tokio::test]
async fn gateways_carry_their_field_lists() {
  let s = store().await;
  let gateways = s.list_gateways().await.unwrap();
  assert_eq!(gateways.len(), 3);

  let paypal = s.get_gateway(2).await.unwrap().unwrap();
  assert_eq!(paypal.provider, "PayPal_Express");
  assert!(paypal.fields.iter().any(|f| f == "signature"));
  assert!(s.get_gateway(99).await.unwrap().is_none());
}

// ─── Gateway configuration ───────────────────────────────────────────────────

#[tokio::test]
async fn replace_account_gateway_swaps_and_clears() {
  let s = store().await;
  let (account, _) = account_with_user(&s).await;
  assert!(s.get_account_gateway(account.account_id).await.unwrap().is_none());

  let first = NewAccountGateway::new(3, json!({ "apiKey": "sk_test_1" })).unwrap();
  s.replace_account_gateway(account.account_id, Some(first)).await.unwrap();

  let second = NewAccountGateway::new(1, json!({ "apiLoginId": "login" })).unwrap();
  let stored = s
    .replace_account_gateway(account.account_id, Some(second))
    .await
    .unwrap()
    .unwrap();

  let current = s.get_account_gateway(account.account_id).await.unwrap().unwrap();
  assert_eq!(current, stored);
  assert_eq!(current.gateway_id, 1);
  assert_eq!(current.config["apiLoginId"], "login");

  let cleared = s.replace_account_gateway(account.account_id, None).await.unwrap();
  assert!(cleared.is_none());
  assert!(s.get_account_gateway(account.account_id).await.unwrap().is_none());
}

#[tokio::test]
async fn replace_with_unknown_gateway_keeps_existing() {
  let s = store().await;
  let (account, _) = account_with_user(&s).await;
  let stripe = NewAccountGateway::new(3, json!({ "apiKey": "sk" })).unwrap();
  s.replace_account_gateway(account.account_id, Some(stripe)).await.unwrap();

  let bogus = NewAccountGateway::new(42, json!({})).unwrap();
  let err = s
    .replace_account_gateway(account.account_id, Some(bogus))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::GatewayNotFound(42)));

  let current = s.get_account_gateway(account.account_id).await.unwrap().unwrap();
  assert_eq!(current.gateway_id, 3);
}

// ─── Clients ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_client_writes_client_contact_and_activity() {
  let s = store().await;
  let (account, user) = account_with_user(&s).await;

  let contact = NewContact {
    first_name: "Hank".into(),
    email: "hank@globex.com".into(),
    ..NewContact::primary()
  };
  let created = s
    .create_client(
      account.account_id,
      user.user_id,
      NewClient { country_id: Some(124), ..client("Globex") },
      contact,
    )
    .await
    .unwrap();

  assert_eq!(created.contact.client_id, created.client.client_id);
  assert_eq!(created.activity.kind, ActivityKind::CreateClient);
  assert_eq!(created.activity.client_id, Some(created.client.client_id));
  assert_eq!(created.activity.message, "Ada Lovelace created client Globex");

  let clients = s.list_clients(account.account_id).await.unwrap();
  assert_eq!(clients, vec![created.client.clone()]);
  assert_eq!(clients[0].country_id, Some(124));

  let contacts = s.list_contacts(account.account_id).await.unwrap();
  assert_eq!(contacts, vec![created.contact.clone()]);
  assert!(contacts[0].is_primary);

  let activities = s.list_activities(account.account_id).await.unwrap();
  assert_eq!(activities, vec![created.activity]);
}

#[tokio::test]
async fn create_client_for_foreign_user_writes_nothing() {
  let s = store().await;
  let (account, _) = account_with_user(&s).await;
  let (_, stranger) = account_with_user(&s).await;

  let err = s
    .create_client(
      account.account_id,
      stranger.user_id,
      client("Initech"),
      NewContact::primary(),
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::UserNotFound(_)));
  assert_eq!(s.count_clients(account.account_id).await.unwrap(), 0);
}

#[tokio::test]
async fn count_clients_is_scoped_to_account() {
  let s = store().await;
  let (a, ua) = account_with_user(&s).await;
  let (b, ub) = account_with_user(&s).await;

  for name in ["One", "Two", "Three"] {
    s.create_client(a.account_id, ua.user_id, client(name), NewContact::primary())
      .await
      .unwrap();
  }
  s.create_client(b.account_id, ub.user_id, client("Other"), NewContact::primary())
    .await
    .unwrap();

  assert_eq!(s.count_clients(a.account_id).await.unwrap(), 3);
  assert_eq!(s.count_clients(b.account_id).await.unwrap(), 1);

  let names: Vec<String> = s
    .list_clients(a.account_id)
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.name)
    .collect();
  assert_eq!(names, ["One", "Two", "Three"]);
}

// ─── Ledger ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn invoice_payment_and_credit_round_trip() {
  let s = store().await;
  let (account, user) = account_with_user(&s).await;
  let created = s
    .create_client(account.account_id, user.user_id, client("Acme"), NewContact::primary())
    .await
    .unwrap();
  let client_id = created.client.client_id;

  let invoice = s
    .create_invoice(account.account_id, NewInvoice {
      client_id,
      invoice_number: "0001".into(),
      invoice_date:   date(2024, 3, 1),
      due_date:       Some(date(2024, 3, 31)),
      items:          vec![
        NewInvoiceItem {
          product_key: "consulting".into(),
          notes:       "March".into(),
          cost:        15_000,
          qty:         2,
        },
        NewInvoiceItem {
          product_key: "hosting".into(),
          notes:       String::new(),
          cost:        2_500,
          qty:         1,
        },
      ],
    })
    .await
    .unwrap();
  assert_eq!(invoice.amount, 32_500);
  assert_eq!(invoice.balance, 32_500);

  let payment = s
    .record_payment(account.account_id, NewPayment {
      client_id,
      invoice_id:            Some(invoice.invoice_id),
      amount:                10_000,
      payment_date:          date(2024, 3, 15),
      transaction_reference: "ch_123".into(),
    })
    .await
    .unwrap();

  s.record_credit(account.account_id, NewCredit {
    client_id,
    amount:        500,
    credit_date:   date(2024, 3, 20),
    credit_number: "C-1".into(),
    private_notes: "goodwill".into(),
  })
  .await
  .unwrap();

  let invoices = s.list_invoices(account.account_id).await.unwrap();
  assert_eq!(invoices.len(), 1);
  // Payments do not touch the recorded invoice balance.
  assert_eq!(invoices[0].balance, 32_500);
  assert_eq!(invoices[0].due_date, Some(date(2024, 3, 31)));

  let items = s.list_invoice_items(account.account_id).await.unwrap();
  assert_eq!(items.len(), 2);
  assert!(items.iter().all(|i| i.invoice_id == invoice.invoice_id));

  assert_eq!(s.list_payments(account.account_id).await.unwrap(), vec![payment]);

  let credits = s.list_credits(account.account_id).await.unwrap();
  assert_eq!(credits.len(), 1);
  assert_eq!(credits[0].balance, 500);
}

#[tokio::test]
async fn ledger_writes_reject_foreign_clients() {
  let s = store().await;
  let (a, ua) = account_with_user(&s).await;
  let (b, _) = account_with_user(&s).await;
  let created = s
    .create_client(a.account_id, ua.user_id, client("Acme"), NewContact::primary())
    .await
    .unwrap();

  let err = s
    .record_credit(b.account_id, NewCredit {
      client_id:     created.client.client_id,
      amount:        100,
      credit_date:   date(2024, 1, 1),
      credit_number: String::new(),
      private_notes: String::new(),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::ClientNotFound(_)));

  let err = s
    .record_payment(a.account_id, NewPayment {
      client_id:             created.client.client_id,
      invoice_id:            Some(Uuid::new_v4()),
      amount:                100,
      payment_date:          date(2024, 1, 1),
      transaction_reference: String::new(),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvoiceNotFound(_)));
  assert!(s.list_payments(a.account_id).await.unwrap().is_empty());
}
