//! SQL schema for the Tally SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS accounts (
    account_id         TEXT PRIMARY KEY,
    account_key        TEXT NOT NULL UNIQUE,
    name               TEXT NOT NULL DEFAULT '',
    work_email         TEXT NOT NULL DEFAULT '',
    work_phone         TEXT NOT NULL DEFAULT '',
    address1           TEXT NOT NULL DEFAULT '',
    address2           TEXT NOT NULL DEFAULT '',
    city               TEXT NOT NULL DEFAULT '',
    state              TEXT NOT NULL DEFAULT '',
    postal_code        TEXT NOT NULL DEFAULT '',
    country_id         INTEGER,
    size_id            INTEGER,
    industry_id        INTEGER,
    timezone_id        INTEGER,
    date_format_id     INTEGER,
    datetime_format_id INTEGER,
    currency_id        INTEGER NOT NULL DEFAULT 1,
    language_id        INTEGER NOT NULL DEFAULT 1,
    invoice_terms      TEXT NOT NULL DEFAULT '',
    email_footer       TEXT NOT NULL DEFAULT '',
    created_at         TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    account_id    TEXT NOT NULL REFERENCES accounts(account_id),
    first_name    TEXT NOT NULL DEFAULT '',
    last_name     TEXT NOT NULL DEFAULT '',
    username      TEXT NOT NULL DEFAULT '',
    email         TEXT NOT NULL DEFAULT '',
    phone         TEXT NOT NULL DEFAULT '',
    notify_sent   INTEGER NOT NULL DEFAULT 1,
    notify_viewed INTEGER NOT NULL DEFAULT 0,
    notify_paid   INTEGER NOT NULL DEFAULT 1
);

-- Reference data, seeded at startup.
CREATE TABLE IF NOT EXISTS countries (
    country_id INTEGER PRIMARY KEY,   -- ISO 3166-1 numeric
    name       TEXT NOT NULL UNIQUE,
    iso_3166_2 TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS gateways (
    gateway_id  INTEGER PRIMARY KEY,
    name        TEXT NOT NULL,
    provider    TEXT NOT NULL,
    fields_json TEXT NOT NULL          -- JSON array of parameter names
);

CREATE TABLE IF NOT EXISTS account_gateways (
    account_gateway_id TEXT PRIMARY KEY,
    account_id         TEXT NOT NULL REFERENCES accounts(account_id),
    gateway_id         INTEGER NOT NULL REFERENCES gateways(gateway_id),
    config_json        TEXT NOT NULL   -- opaque JSON object
);

CREATE TABLE IF NOT EXISTS clients (
    client_id     TEXT PRIMARY KEY,
    account_id    TEXT NOT NULL REFERENCES accounts(account_id),
    name          TEXT NOT NULL,
    work_phone    TEXT NOT NULL,
    address1      TEXT NOT NULL,
    address2      TEXT NOT NULL,
    city          TEXT NOT NULL,
    state         TEXT NOT NULL,
    postal_code   TEXT NOT NULL,
    country_id    INTEGER REFERENCES countries(country_id),
    private_notes TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS contacts (
    contact_id TEXT PRIMARY KEY,
    client_id  TEXT NOT NULL REFERENCES clients(client_id),
    account_id TEXT NOT NULL REFERENCES accounts(account_id),
    first_name TEXT NOT NULL,
    last_name  TEXT NOT NULL,
    phone      TEXT NOT NULL,
    email      TEXT NOT NULL,
    is_primary INTEGER NOT NULL,
    created_at TEXT NOT NULL
);

-- Append-only audit trail.
CREATE TABLE IF NOT EXISTS activities (
    activity_id TEXT PRIMARY KEY,
    account_id  TEXT NOT NULL REFERENCES accounts(account_id),
    user_id     TEXT NOT NULL REFERENCES users(user_id),
    client_id   TEXT REFERENCES clients(client_id),
    kind        TEXT NOT NULL,
    message     TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS invoices (
    invoice_id     TEXT PRIMARY KEY,
    account_id     TEXT NOT NULL REFERENCES accounts(account_id),
    client_id      TEXT NOT NULL REFERENCES clients(client_id),
    invoice_number TEXT NOT NULL,
    invoice_date   TEXT NOT NULL,      -- YYYY-MM-DD
    due_date       TEXT,
    amount         INTEGER NOT NULL,   -- minor units
    balance        INTEGER NOT NULL,
    created_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS invoice_items (
    invoice_item_id TEXT PRIMARY KEY,
    invoice_id      TEXT NOT NULL REFERENCES invoices(invoice_id),
    account_id      TEXT NOT NULL REFERENCES accounts(account_id),
    product_key     TEXT NOT NULL,
    notes           TEXT NOT NULL,
    cost            INTEGER NOT NULL,
    qty             INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS payments (
    payment_id            TEXT PRIMARY KEY,
    account_id            TEXT NOT NULL REFERENCES accounts(account_id),
    client_id             TEXT NOT NULL REFERENCES clients(client_id),
    invoice_id            TEXT REFERENCES invoices(invoice_id),
    amount                INTEGER NOT NULL,
    payment_date          TEXT NOT NULL,
    transaction_reference TEXT NOT NULL,
    created_at            TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS credits (
    credit_id     TEXT PRIMARY KEY,
    account_id    TEXT NOT NULL REFERENCES accounts(account_id),
    client_id     TEXT NOT NULL REFERENCES clients(client_id),
    amount        INTEGER NOT NULL,
    balance       INTEGER NOT NULL,
    credit_date   TEXT NOT NULL,
    credit_number TEXT NOT NULL,
    private_notes TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS users_account_idx      ON users(account_id);
CREATE INDEX IF NOT EXISTS users_email_idx        ON users(email);
CREATE INDEX IF NOT EXISTS clients_account_idx    ON clients(account_id);
CREATE INDEX IF NOT EXISTS contacts_account_idx   ON contacts(account_id);
CREATE INDEX IF NOT EXISTS activities_account_idx ON activities(account_id);
CREATE INDEX IF NOT EXISTS invoices_account_idx   ON invoices(account_id);

PRAGMA user_version = 1;
";
