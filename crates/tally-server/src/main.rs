//! tally-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) layered with
//! `TALLY_*` environment variables, opens the SQLite store, and serves the
//! settings API over HTTP.
//!
//! # Bootstrapping
//!
//! Requests are attributed to the user named in the `x-tally-user` header.
//! To create a first account and user:
//!
//! ```text
//! cargo run -p tally-server -- --create-account ada@acme.com
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use serde::Deserialize;
use tally_api::AppState;
use tally_core::{account::NewUser, store::AccountStore};
use tally_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Tally account settings server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Create an account with a user for this email, print their ids and exit.
  #[arg(long, value_name = "EMAIL")]
  create_account: Option<String>,

  /// Company name for `--create-account`.
  #[arg(long, default_value = "")]
  account_name: String,
}

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Deserialize, Clone)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host:        String,
  #[serde(default = "default_port")]
  port:        u16,
  #[serde(default = "default_store_path")]
  store_path:  PathBuf,
  /// Most clients an account may hold after an import.
  #[serde(default = "default_max_clients")]
  max_clients: usize,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/tally/tally.db") }

fn default_max_clients() -> usize { 500 }

fn load_config(path: PathBuf) -> anyhow::Result<ServerConfig> {
  let settings = config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("TALLY"))
    .build()
    .context("failed to read config file")?;

  settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let server_cfg = load_config(cli.config)?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Helper mode: create an account and exit.
  if let Some(email) = cli.create_account {
    let account = store
      .create_account(cli.account_name)
      .await
      .context("failed to create account")?;
    let user = store
      .create_user(account.account_id, NewUser {
        first_name: String::new(),
        last_name:  String::new(),
        email:      email.trim().to_lowercase(),
      })
      .await
      .context("failed to create user")?;
    println!("account_id = {}", account.account_id);
    println!("user_id    = {}", user.user_id);
    return Ok(());
  }

  let state = AppState::new(store, server_cfg.max_clients);
  let app = tally_api::router(state).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!(
    store = %store_path.display(),
    max_clients = server_cfg.max_clients,
    "Listening on http://{address}"
  );
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_config_file_uses_defaults() {
    let cfg = load_config(PathBuf::from("does-not-exist.toml")).unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.max_clients, 500);
  }

  #[test]
  fn absolute_paths_are_untouched() {
    let path = Path::new("/var/lib/tally.db");
    assert_eq!(expand_tilde(path), path);
  }
}
