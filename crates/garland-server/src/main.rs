//! garland server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the wishlist JSON API under `/api`.
//!
//! # Configuration
//!
//! ```toml
//! host       = "127.0.0.1"
//! port       = 8640
//! store_path = "~/.local/share/garland/garland.db"
//! # Optional; /api/enrich reports missing credentials when absent.
//! gemini_api_key = "…"
//! # gemini_model = "gemini-3-pro-preview"
//! ```
//!
//! Every key can also come from the environment with a `GARLAND_` prefix,
//! e.g. `GARLAND_GEMINI_API_KEY`.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use clap::Parser;
use garland_api::ApiState;
use garland_enrich::{EnrichClient, EnrichConfig};
use garland_store_sqlite::SqliteStore;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host:           String,
  #[serde(default = "default_port")]
  port:           u16,
  #[serde(default = "default_store_path")]
  store_path:     PathBuf,
  gemini_api_key: Option<String>,
  gemini_model:   Option<String>,
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 8640 }
fn default_store_path() -> PathBuf { PathBuf::from("garland.db") }

#[derive(Parser)]
#[command(author, version, about = "Garland wishlist server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
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

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("GARLAND"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Optional enrichment collaborator.
  let enrich = match &server_cfg.gemini_api_key {
    Some(key) if !key.is_empty() => {
      let mut enrich_cfg = EnrichConfig::new(key.clone());
      if let Some(model) = &server_cfg.gemini_model {
        enrich_cfg.model = model.clone();
      }
      Some(Arc::new(
        EnrichClient::new(enrich_cfg).context("failed to build enrichment client")?,
      ))
    }
    _ => {
      tracing::info!("no gemini_api_key configured; /api/enrich disabled");
      None
    }
  };

  // Build application state and router.
  let state = ApiState {
    store: Arc::new(store),
    enrich,
  };
  let app = Router::new()
    .nest("/api", garland_api::api_router(state))
    .layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("Listening on http://{address}");
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
