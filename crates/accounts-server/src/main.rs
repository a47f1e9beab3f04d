//! accounts server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, seeds it when empty, and serves the JSON API under `/api`.
//!
//! # Password hash generation
//!
//! To print the credential hash a new user with a given role would get:
//!
//! ```
//! cargo run -p accounts-server --bin server -- --hash-password --role admin
//! ```

use std::{path::PathBuf, sync::Arc};

use accounts_core::{credential, seed::seed_if_empty, service::UserService};
use accounts_server::{ServerConfig, expand_tilde};
use accounts_store_sqlite::SqliteStore;
use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "User accounts server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the credential hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,

  /// Role the hashed password is for; `admin` selects bcrypt.
  #[arg(long, default_value = accounts_core::user::DEFAULT_ROLE)]
  role: String,
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

  if cli.hash_password {
    let password = read_password()?;
    let hash = credential::hash(&password, &cli.role).context("failed to hash password")?;
    println!("{hash}");
    return Ok(());
  }

  let server_cfg = ServerConfig::load(&cli.config).context("failed to load configuration")?;
  let store_path = expand_tilde(&server_cfg.store_path);

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let seeded = seed_if_empty(&store).await.context("failed to seed initial users")?;
  if seeded > 0 {
    tracing::info!(seeded, "initialised empty store");
  }

  let service = UserService::new(Arc::new(store));
  let app = accounts_server::app(accounts_api::api_router(service));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a single password line from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
}
