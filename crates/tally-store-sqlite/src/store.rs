//! [`SqliteStore`], the SQLite implementation of [`AccountStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use tally_core::{
  account::{Account, NewUser, User},
  activity::{Activity, ActivityKind, client_created_message},
  country::Country,
  gateway::{AccountGateway, Gateway, NewAccountGateway},
  ledger::{
    Credit, Invoice, InvoiceItem, NewCredit, NewInvoice, NewPayment, Payment,
  },
  record::{Client, Contact, CreatedClient, NewClient, NewContact},
  store::AccountStore,
};

use crate::{
  Error, Result,
  encode::{
    ACCOUNT_COLUMNS, ACTIVITY_COLUMNS, CLIENT_COLUMNS, CONTACT_COLUMNS,
    CREDIT_COLUMNS, INVOICE_COLUMNS, INVOICE_ITEM_COLUMNS, PAYMENT_COLUMNS,
    RawAccount, RawAccountGateway, RawActivity, RawClient, RawContact, RawCredit,
    RawGateway, RawInvoice, RawInvoiceItem, RawPayment, RawUser, USER_COLUMNS,
    country_from_row, encode_date, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
  seed,
};

/// Which referenced row a ledger write could not find.
enum Missing {
  Client,
  Invoice(Uuid),
}

const CLIENT_IN_ACCOUNT: &str =
  "SELECT 1 FROM clients WHERE client_id = ?1 AND account_id = ?2";

fn client_in_account(
  conn: &rusqlite::Connection,
  client_id: &str,
  account_id: &str,
) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(CLIENT_IN_ACCOUNT, rusqlite::params![client_id, account_id], |_| {
        Ok(())
      })
      .optional()?
      .is_some(),
  )
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Tally account store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path`, run schema initialisation and seed
  /// the reference tables.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  pub(crate) async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        seed::seed(conn)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `SELECT {columns} FROM {table} WHERE account_id = ?1` in insertion
  /// order.
  async fn select_by_account<R>(
    &self,
    columns: &'static str,
    table: &'static str,
    account_id: Uuid,
    from_row: fn(&rusqlite::Row<'_>) -> rusqlite::Result<R>,
  ) -> Result<Vec<R>>
  where
    R: Send + 'static,
  {
    let account_id_str = encode_uuid(account_id);

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {columns} FROM {table} WHERE account_id = ?1 ORDER BY rowid"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![account_id_str], from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }
}

// ─── AccountStore impl ───────────────────────────────────────────────────────

impl AccountStore for SqliteStore {
  type Error = Error;

  // ── Accounts and users ────────────────────────────────────────────────────

  async fn create_account(&self, name: String) -> Result<Account> {
    let account_id = Uuid::new_v4();
    let account_key = Uuid::new_v4().simple().to_string();
    let mut account = Account::new(account_id, account_key, Utc::now());
    account.name = name;

    let id_str  = encode_uuid(account.account_id);
    let key     = account.account_key.clone();
    let name    = account.name.clone();
    let at_str  = encode_dt(account.created_at);
    let (currency_id, language_id) = (account.currency_id, account.language_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO accounts (
             account_id, account_key, name, currency_id, language_id, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, key, name, currency_id, language_id, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(account)
  }

  async fn get_account(&self, account_id: Uuid) -> Result<Option<Account>> {
    let id_str = encode_uuid(account_id);

    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_id = ?1"),
              rusqlite::params![id_str],
              RawAccount::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAccount::into_account).transpose()
  }

  async fn update_account(&self, account: Account) -> Result<()> {
    let account_id = account.account_id;
    let id_str = encode_uuid(account_id);

    let updated = self
      .conn
      .call(move |conn| {
        let a = account;
        Ok(conn.execute(
          "UPDATE accounts SET
             name = ?2, work_email = ?3, work_phone = ?4, address1 = ?5,
             address2 = ?6, city = ?7, state = ?8, postal_code = ?9,
             country_id = ?10, size_id = ?11, industry_id = ?12, timezone_id = ?13,
             date_format_id = ?14, datetime_format_id = ?15, currency_id = ?16,
             language_id = ?17, invoice_terms = ?18, email_footer = ?19
           WHERE account_id = ?1",
          rusqlite::params![
            id_str,
            a.name,
            a.work_email,
            a.work_phone,
            a.address1,
            a.address2,
            a.city,
            a.state,
            a.postal_code,
            a.country_id,
            a.size_id,
            a.industry_id,
            a.timezone_id,
            a.date_format_id,
            a.datetime_format_id,
            a.currency_id,
            a.language_id,
            a.invoice_terms,
            a.email_footer,
          ],
        )?)
      })
      .await?;

    if updated == 0 {
      return Err(Error::AccountNotFound(account_id));
    }
    Ok(())
  }

  async fn create_user(&self, account_id: Uuid, input: NewUser) -> Result<User> {
    if self.get_account(account_id).await?.is_none() {
      return Err(Error::AccountNotFound(account_id));
    }

    let user = User {
      user_id:       Uuid::new_v4(),
      account_id,
      first_name:    input.first_name,
      last_name:     input.last_name,
      username:      input.email.clone(),
      email:         input.email,
      phone:         String::new(),
      notify_sent:   true,
      notify_viewed: false,
      notify_paid:   true,
    };

    let row = user.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (
             user_id, account_id, first_name, last_name, username, email, phone,
             notify_sent, notify_viewed, notify_paid
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            encode_uuid(row.user_id),
            encode_uuid(row.account_id),
            row.first_name,
            row.last_name,
            row.username,
            row.email,
            row.phone,
            row.notify_sent,
            row.notify_viewed,
            row.notify_paid,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(user_id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
              rusqlite::params![id_str],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn list_users(&self, account_id: Uuid) -> Result<Vec<User>> {
    self
      .select_by_account(USER_COLUMNS, "users", account_id, RawUser::from_row)
      .await?
      .into_iter()
      .map(RawUser::into_user)
      .collect()
  }

  async fn update_user(&self, user: User) -> Result<()> {
    let user_id = user.user_id;
    let id_str = encode_uuid(user_id);

    let updated = self
      .conn
      .call(move |conn| {
        let u = user;
        Ok(conn.execute(
          "UPDATE users SET
             first_name = ?2, last_name = ?3, username = ?4, email = ?5, phone = ?6,
             notify_sent = ?7, notify_viewed = ?8, notify_paid = ?9
           WHERE user_id = ?1",
          rusqlite::params![
            id_str,
            u.first_name,
            u.last_name,
            u.username,
            u.email,
            u.phone,
            u.notify_sent,
            u.notify_viewed,
            u.notify_paid,
          ],
        )?)
      })
      .await?;

    if updated == 0 {
      return Err(Error::UserNotFound(user_id));
    }
    Ok(())
  }

  async fn find_user_by_email(&self, email: String) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {USER_COLUMNS} FROM users
                 WHERE lower(email) = lower(?1) ORDER BY rowid LIMIT 1"
              ),
              rusqlite::params![email.trim()],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Reference data ────────────────────────────────────────────────────────

  async fn list_countries(&self) -> Result<Vec<Country>> {
    let countries = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT country_id, name, iso_3166_2 FROM countries ORDER BY name")?;
        let rows = stmt
          .query_map([], country_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(countries)
  }

  async fn list_gateways(&self) -> Result<Vec<Gateway>> {
    let raws: Vec<RawGateway> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT gateway_id, name, provider, fields_json FROM gateways
           ORDER BY gateway_id",
        )?;
        let rows = stmt
          .query_map([], RawGateway::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawGateway::into_gateway).collect()
  }

  async fn get_gateway(&self, gateway_id: u32) -> Result<Option<Gateway>> {
    let raw: Option<RawGateway> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT gateway_id, name, provider, fields_json FROM gateways
               WHERE gateway_id = ?1",
              rusqlite::params![gateway_id],
              RawGateway::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawGateway::into_gateway).transpose()
  }

  // ── Gateway configuration ─────────────────────────────────────────────────

  async fn get_account_gateway(&self, account_id: Uuid) -> Result<Option<AccountGateway>> {
    let id_str = encode_uuid(account_id);

    let raw: Option<RawAccountGateway> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT account_gateway_id, account_id, gateway_id, config_json
               FROM account_gateways WHERE account_id = ?1
               ORDER BY rowid DESC LIMIT 1",
              rusqlite::params![id_str],
              RawAccountGateway::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAccountGateway::into_account_gateway).transpose()
  }

  async fn replace_account_gateway(
    &self,
    account_id:  Uuid,
    replacement: Option<NewAccountGateway>,
  ) -> Result<Option<AccountGateway>> {
    if let Some(r) = &replacement {
      if self.get_gateway(r.gateway_id).await?.is_none() {
        return Err(Error::GatewayNotFound(r.gateway_id));
      }
    }

    let stored = replacement.map(|r| AccountGateway {
      account_gateway_id: Uuid::new_v4(),
      account_id,
      gateway_id: r.gateway_id,
      config: r.config,
    });

    let account_id_str = encode_uuid(account_id);
    let row = stored.as_ref().map(|g| {
      (encode_uuid(g.account_gateway_id), g.gateway_id, g.config.to_string())
    });

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM account_gateways WHERE account_id = ?1",
          rusqlite::params![account_id_str],
        )?;
        if let Some((id_str, gateway_id, config_json)) = row {
          tx.execute(
            "INSERT INTO account_gateways (
               account_gateway_id, account_id, gateway_id, config_json
             ) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![id_str, account_id_str, gateway_id, config_json],
          )?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(stored)
  }

  // ── Clients ───────────────────────────────────────────────────────────────

  async fn count_clients(&self, account_id: Uuid) -> Result<usize> {
    let id_str = encode_uuid(account_id);

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM clients WHERE account_id = ?1",
          rusqlite::params![id_str],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count as usize)
  }

  async fn create_client(
    &self,
    account_id: Uuid,
    user_id:    Uuid,
    client:     NewClient,
    contact:    NewContact,
  ) -> Result<CreatedClient> {
    let actor = self
      .get_user(user_id)
      .await?
      .filter(|u| u.account_id == account_id)
      .ok_or(Error::UserNotFound(user_id))?;

    let now = Utc::now();
    let client = Client::from_new(Uuid::new_v4(), account_id, client, now);
    let contact = Contact::from_new(Uuid::new_v4(), &client, contact, now);
    let activity = Activity {
      activity_id: Uuid::new_v4(),
      account_id,
      user_id,
      client_id: Some(client.client_id),
      kind: ActivityKind::CreateClient,
      message: client_created_message(&actor.display_name(), &client.name),
      created_at: now,
    };

    let created = CreatedClient { client, contact, activity };
    let rows = created.clone();

    self
      .conn
      .call(move |conn| {
        let CreatedClient { client: c, contact: k, activity: a } = rows;
        let tx = conn.transaction()?;

        tx.execute(
          &format!(
            "INSERT INTO clients ({CLIENT_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
          ),
          rusqlite::params![
            encode_uuid(c.client_id),
            encode_uuid(c.account_id),
            c.name,
            c.work_phone,
            c.address1,
            c.address2,
            c.city,
            c.state,
            c.postal_code,
            c.country_id,
            c.private_notes,
            encode_dt(c.created_at),
          ],
        )?;

        tx.execute(
          &format!(
            "INSERT INTO contacts ({CONTACT_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
          ),
          rusqlite::params![
            encode_uuid(k.contact_id),
            encode_uuid(k.client_id),
            encode_uuid(k.account_id),
            k.first_name,
            k.last_name,
            k.phone,
            k.email,
            k.is_primary,
            encode_dt(k.created_at),
          ],
        )?;

        tx.execute(
          &format!(
            "INSERT INTO activities ({ACTIVITY_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
          ),
          rusqlite::params![
            encode_uuid(a.activity_id),
            encode_uuid(a.account_id),
            encode_uuid(a.user_id),
            a.client_id.map(encode_uuid),
            a.kind.as_str(),
            a.message,
            encode_dt(a.created_at),
          ],
        )?;

        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(created)
  }

  async fn list_clients(&self, account_id: Uuid) -> Result<Vec<Client>> {
    self
      .select_by_account(CLIENT_COLUMNS, "clients", account_id, RawClient::from_row)
      .await?
      .into_iter()
      .map(RawClient::into_client)
      .collect()
  }

  async fn list_contacts(&self, account_id: Uuid) -> Result<Vec<Contact>> {
    self
      .select_by_account(CONTACT_COLUMNS, "contacts", account_id, RawContact::from_row)
      .await?
      .into_iter()
      .map(RawContact::into_contact)
      .collect()
  }

  async fn list_activities(&self, account_id: Uuid) -> Result<Vec<Activity>> {
    self
      .select_by_account(
        ACTIVITY_COLUMNS,
        "activities",
        account_id,
        RawActivity::from_row,
      )
      .await?
      .into_iter()
      .map(RawActivity::into_activity)
      .collect()
  }

  // ── Ledger ────────────────────────────────────────────────────────────────

  async fn create_invoice(&self, account_id: Uuid, input: NewInvoice) -> Result<Invoice> {
    let total = input.total();
    let invoice = Invoice {
      invoice_id:     Uuid::new_v4(),
      account_id,
      client_id:      input.client_id,
      invoice_number: input.invoice_number,
      invoice_date:   input.invoice_date,
      due_date:       input.due_date,
      amount:         total,
      balance:        total,
      created_at:     Utc::now(),
    };
    let items: Vec<InvoiceItem> = input
      .items
      .into_iter()
      .map(|item| InvoiceItem {
        invoice_item_id: Uuid::new_v4(),
        invoice_id:      invoice.invoice_id,
        account_id,
        product_key:     item.product_key,
        notes:           item.notes,
        cost:            item.cost,
        qty:             item.qty,
      })
      .collect();

    let inv = invoice.clone();
    let missing = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let client_id_str = encode_uuid(inv.client_id);
        let account_id_str = encode_uuid(inv.account_id);
        if !client_in_account(&tx, &client_id_str, &account_id_str)? {
          return Ok(Some(Missing::Client));
        }

        tx.execute(
          &format!(
            "INSERT INTO invoices ({INVOICE_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
          ),
          rusqlite::params![
            encode_uuid(inv.invoice_id),
            account_id_str,
            client_id_str,
            inv.invoice_number,
            encode_date(inv.invoice_date),
            inv.due_date.map(encode_date),
            inv.amount,
            inv.balance,
            encode_dt(inv.created_at),
          ],
        )?;

        for item in items {
          tx.execute(
            &format!(
              "INSERT INTO invoice_items ({INVOICE_ITEM_COLUMNS})
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
            ),
            rusqlite::params![
              encode_uuid(item.invoice_item_id),
              encode_uuid(item.invoice_id),
              encode_uuid(item.account_id),
              item.product_key,
              item.notes,
              item.cost,
              item.qty,
            ],
          )?;
        }

        tx.commit()?;
        Ok(None)
      })
      .await?;

    match missing {
      Some(_) => Err(Error::ClientNotFound(invoice.client_id)),
      None => Ok(invoice),
    }
  }

  async fn record_payment(&self, account_id: Uuid, input: NewPayment) -> Result<Payment> {
    let payment = Payment {
      payment_id:            Uuid::new_v4(),
      account_id,
      client_id:             input.client_id,
      invoice_id:            input.invoice_id,
      amount:                input.amount,
      payment_date:          input.payment_date,
      transaction_reference: input.transaction_reference,
      created_at:            Utc::now(),
    };

    let p = payment.clone();
    let missing = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let client_id_str = encode_uuid(p.client_id);
        let account_id_str = encode_uuid(p.account_id);
        if !client_in_account(&tx, &client_id_str, &account_id_str)? {
          return Ok(Some(Missing::Client));
        }

        let invoice_id_str = p.invoice_id.map(encode_uuid);
        // Stored balances are left as recorded.
        if let Some(invoice_id) = p.invoice_id {
          let known = tx
            .query_row(
              "SELECT 1 FROM invoices
               WHERE invoice_id = ?1 AND account_id = ?2 AND client_id = ?3",
              rusqlite::params![invoice_id_str, account_id_str, client_id_str],
              |_| Ok(()),
            )
            .optional()?
            .is_some();
          if !known {
            return Ok(Some(Missing::Invoice(invoice_id)));
          }
        }

        tx.execute(
          &format!(
            "INSERT INTO payments ({PAYMENT_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
          ),
          rusqlite::params![
            encode_uuid(p.payment_id),
            account_id_str,
            client_id_str,
            invoice_id_str,
            p.amount,
            encode_date(p.payment_date),
            p.transaction_reference,
            encode_dt(p.created_at),
          ],
        )?;

        tx.commit()?;
        Ok(None)
      })
      .await?;

    match missing {
      Some(Missing::Client) => Err(Error::ClientNotFound(payment.client_id)),
      Some(Missing::Invoice(invoice_id)) => Err(Error::InvoiceNotFound(invoice_id)),
      None => Ok(payment),
    }
  }

  async fn record_credit(&self, account_id: Uuid, input: NewCredit) -> Result<Credit> {
    let credit = Credit {
      credit_id:     Uuid::new_v4(),
      account_id,
      client_id:     input.client_id,
      amount:        input.amount,
      balance:       input.amount,
      credit_date:   input.credit_date,
      credit_number: input.credit_number,
      private_notes: input.private_notes,
      created_at:    Utc::now(),
    };

    let c = credit.clone();
    let missing = self
      .conn
      .call(move |conn| {
        let client_id_str = encode_uuid(c.client_id);
        let account_id_str = encode_uuid(c.account_id);
        if !client_in_account(conn, &client_id_str, &account_id_str)? {
          return Ok(Some(Missing::Client));
        }

        conn.execute(
          &format!(
            "INSERT INTO credits ({CREDIT_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
          ),
          rusqlite::params![
            encode_uuid(c.credit_id),
            account_id_str,
            client_id_str,
            c.amount,
            c.balance,
            encode_date(c.credit_date),
            c.credit_number,
            c.private_notes,
            encode_dt(c.created_at),
          ],
        )?;
        Ok(None)
      })
      .await?;

    match missing {
      Some(_) => Err(Error::ClientNotFound(credit.client_id)),
      None => Ok(credit),
    }
  }

  async fn list_invoices(&self, account_id: Uuid) -> Result<Vec<Invoice>> {
    self
      .select_by_account(INVOICE_COLUMNS, "invoices", account_id, RawInvoice::from_row)
      .await?
      .into_iter()
      .map(RawInvoice::into_invoice)
      .collect()
  }

  async fn list_invoice_items(&self, account_id: Uuid) -> Result<Vec<InvoiceItem>> {
    self
      .select_by_account(
        INVOICE_ITEM_COLUMNS,
        "invoice_items",
        account_id,
        RawInvoiceItem::from_row,
      )
      .await?
      .into_iter()
      .map(RawInvoiceItem::into_invoice_item)
      .collect()
  }

  async fn list_payments(&self, account_id: Uuid) -> Result<Vec<Payment>> {
    self
      .select_by_account(PAYMENT_COLUMNS, "payments", account_id, RawPayment::from_row)
      .await?
      .into_iter()
      .map(RawPayment::into_payment)
      .collect()
  }

  async fn list_credits(&self, account_id: Uuid) -> Result<Vec<Credit>> {
    self
      .select_by_account(CREDIT_COLUMNS, "credits", account_id, RawCredit::from_row)
      .await?
      .into_iter()
      .map(RawCredit::into_credit)
      .collect()
  }
}
