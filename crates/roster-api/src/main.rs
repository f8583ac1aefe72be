//! roster-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite people store, builds the HTTP gateway from the configured base URL
//! and bearer token, and serves the JSON API.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use roster_api::{AppState, ServerConfig};
use roster_remote::{GatewayConfig, HttpGateway};
use roster_service::PeopleService;
use roster_store_sqlite::SqlitePersonStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Roster people server")]
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
    .add_source(config::Environment::with_prefix("ROSTER"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open the local store.
  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqlitePersonStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Build the gateway and the reconciliation service.
  let gateway = HttpGateway::new(GatewayConfig {
    base_url: server_cfg.remote_base_url.clone(),
    token:    server_cfg.remote_token.clone(),
  })
  .context("failed to build HTTP gateway")?;

  let store = Arc::new(store);
  let gateway = Arc::new(gateway);
  let service = Arc::new(PeopleService::new(Arc::clone(&store), gateway));

  let state = AppState { store, service };
  let app = roster_api::router(state).layer(TraceLayer::new_for_http());

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
