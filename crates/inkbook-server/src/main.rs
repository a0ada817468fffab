//! inkbook-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) layered under
//! `INKBOOK_*` environment variables, opens the SQLite store, and serves the
//! JSON API over HTTP.
//!
//! # Token generation
//!
//! To generate an API token and the hash for `auth_token_hash`:
//!
//! ```text
//! cargo run -p inkbook-server -- --generate-token
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::Context as _;
use clap::Parser;
use inkbook_server::{AppState, ServerConfig, auth::AuthConfig};
use inkbook_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Inkbook studio server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print a fresh API token and its argon2 hash, then exit.
  #[arg(long)]
  generate_token: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.generate_token {
    let (token, hash) = inkbook_server::auth::generate_token()
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
    println!("token:           {token}");
    println!("auth_token_hash: {hash}");
    return Ok(());
  }

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("INKBOOK"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  let timeout = Duration::from_millis(server_cfg.store_timeout_ms);
  let store = SqliteStore::open(&store_path, timeout)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  tracing::info!(path = ?store_path, ?timeout, "store opened");

  let state = AppState {
    store: Arc::new(store),
    auth:  Arc::new(AuthConfig { token_hash: server_cfg.auth_token_hash.clone() }),
  };

  let app = inkbook_server::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  tracing::info!("shut down");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for ctrl-c; serving until killed");
    std::future::pending::<()>().await;
  }
  tracing::info!("ctrl-c received, draining connections");
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
