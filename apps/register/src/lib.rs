//! # Comanda Register Library
//!
//! The order-taking front end: configuration, the order session, and a
//! line-oriented terminal loop over both.
//!
//! ## Module Organization
//! ```text
//! comanda_register_lib/
//! ├── lib.rs          ◄─── You are here (startup & terminal loop)
//! ├── config.rs       ◄─── RegisterConfig (defaults → TOML → env)
//! ├── session.rs      ◄─── OrderSession: selection, ledger, archive
//! ├── commands.rs     ◄─── Command parsing and execution
//! └── error.rs        ◄─── RegisterError / ApiError
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod session;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use comanda_store::{Database, StoreConfig, StoreError};

use crate::commands::{Command, Register, Reply};
use crate::config::{RegisterConfig, DEFAULT_LOG_FILTER};
use crate::error::{ApiError, RegisterResult};
use crate::session::OrderSession;

/// Initializes the tracing subscriber. `RUST_LOG` wins over the configured
/// filter. Logs go to stderr so they never mix with command replies.
pub fn init_tracing(config: &RegisterConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Opens the database the configuration points at and checks that it
/// answers and is fully migrated.
pub async fn open_database(config: &RegisterConfig) -> RegisterResult<Database> {
    let store_config = if config.storage.in_memory {
        StoreConfig::in_memory()
    } else {
        StoreConfig::new(config.database_path()?).max_connections(config.storage.max_connections)
    };
    let db = Database::new(store_config).await?;

    if !db.health_check().await {
        return Err(StoreError::ConnectionFailed("database did not answer".to_string()).into());
    }

    let (total, applied) = db.migration_status().await?;
    if applied < total {
        warn!(total, applied, "Database has pending migrations");
    } else {
        info!(total, "Database schema up to date");
    }
    Ok(db)
}

/// Runs the register until `quit` or end of input.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Open database ─────► WAL SQLite, migrations applied                 │
/// │  2. Build session ─────► kv store (orders), catalog (menu)              │
/// │  3. Read commands ─────► one line, one reply, until quit/EOF            │
/// │  4. Close database                                                      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(config: RegisterConfig) -> RegisterResult<()> {
    let db = open_database(&config).await?;

    let session = OrderSession::new(db.kv(), db.catalog())
        .with_time_format(config.orders.time_format.clone());
    let mut register = Register::new(session);

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(b"Comanda register. Type 'help' for commands.\n")
        .await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let reply = match Command::parse(&line) {
            Ok(None) => continue,
            Ok(Some(command)) => register.execute(command).await,
            Err(err) => Err(ApiError::from(err)),
        };

        let output = match reply {
            Ok(Reply::Quit) => break,
            Ok(Reply::Lines(lines)) => lines.join("\n"),
            Err(err) => {
                warn!(code = err.code.as_str(), message = %err.message, "Command failed");
                format!("error {}", err)
            }
        };
        stdout.write_all(output.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
    }

    if register.session().is_ordering() && !register.session().items().is_empty() {
        warn!(
            items = register.session().items().len(),
            "Exiting with an unsaved order"
        );
    }

    db.close().await;
    info!("Register stopped");
    Ok(())
}
