//! # Database Connection Management
//!
//! Connection creation and configuration for SQLite.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Lifecycle                                 │
//! │                                                                         │
//! │  DbConfig::new(path) / DbConfig::from_env()                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await                                           │
//! │       ├── connect fails?   → ConnectionFailed, nothing left open       │
//! │       ├── migration fails? → pool closed, MigrationFailed              │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool (1 connection)     │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.payments().add(...) / list_all(...) / ...                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.close().await  (or drop) → connection released                     │
//! │  every later call → ConnectionFailed                                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## One Connection
//! The default pool holds a single connection. Every repository call runs
//! on it, one after another. Callers sharing a `Database` across tasks are
//! serialized by the pool, nothing more.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, DbError, DbResult};
use crate::migrations;
use crate::repository::payment::PaymentRepository;

/// Path value that selects a private in-memory database.
const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/zakat.db")
///     .connect_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 1 (one live connection per repository)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// How long to wait for a free connection.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection. `None` keeps it forever.
    /// Default: 10 minutes
    pub idle_timeout: Option<Duration>,

    /// Maximum age of a connection. `None` keeps it forever.
    /// Default: 30 minutes
    pub max_lifetime: Option<Duration>,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// ## Arguments
    /// * `path` - Path to the SQLite database file. Will be created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            max_lifetime: Some(Duration::from_secs(1800)),
            run_migrations: true,
        }
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// Each `Database` built from this config gets its own private database,
    /// and the single connection is never recycled (recycling it would throw
    /// the data away).
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            max_lifetime: None,
            run_migrations: true,
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// | Variable                        | Default       |
    /// |---------------------------------|---------------|
    /// | `ZAKAT_DB_PATH`                 | `./zakat.db`  |
    /// | `ZAKAT_DB_CONNECT_TIMEOUT_SECS` | `30`          |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`DbConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let path = lookup("ZAKAT_DB_PATH").unwrap_or_else(|| "./zakat.db".to_string());

        let timeout_secs: u64 = lookup("ZAKAT_DB_CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue("ZAKAT_DB_CONNECT_TIMEOUT_SECS".to_string()))?;

        let config = if path == IN_MEMORY_PATH {
            DbConfig::in_memory()
        } else {
            DbConfig::new(path)
        };

        Ok(config.connect_timeout(Duration::from_secs(timeout_secs)))
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Whether this config points at an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(IN_MEMORY_PATH)
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        if self.is_in_memory() {
            return SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()));
        }

        Ok(SqliteConnectOptions::new()
            .filename(&self.database_path)
            // WAL mode: readers don't block the writer
            .journal_mode(SqliteJournalMode::Wal)
            // NORMAL synchronous: safe from corruption, may lose the last
            // transaction on power loss
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Owner of the database connection.
///
/// Repositories borrow the pool from here; closing the `Database` closes it
/// for all of them.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the database and provisions the schema.
    ///
    /// ## What This Does
    /// 1. Opens (or creates) the database file
    /// 2. Configures SQLite: WAL mode, NORMAL synchronous, foreign keys
    /// 3. Creates the connection pool and establishes the first connection
    /// 4. Runs migrations and fills folded search columns (if enabled)
    ///
    /// ## Returns
    /// * `Ok(Database)` - Ready-to-use database handle
    /// * `Err(DbError::ConnectionFailed)` - Could not connect; nothing is left open
    /// * `Err(DbError::MigrationFailed)` - Schema could not be provisioned; the
    ///   connection has already been closed
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_options = config.connect_options()?;

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database { pool };

        if config.run_migrations {
            if let Err(err) = db.run_migrations().await {
                warn!(error = %err, "Migration failed, closing connection");
                db.close().await;
                return Err(err);
            }

            if let Err(err) = db.payments().fill_search_columns().await {
                warn!(error = %err, "Filling search columns failed, closing connection");
                db.close().await;
                return Err(err);
            }
        }

        Ok(db)
    }

    /// Runs database migrations.
    ///
    /// Called by `new()` unless `run_migrations` is false in the config.
    pub async fn run_migrations(&self) -> DbResult<()> {
        self.ensure_connected()?;
        migrations::run_migrations(&self.pool).await
    }

    /// Returns (total, applied) migration counts.
    pub async fn migration_status(&self) -> DbResult<(usize, usize)> {
        self.ensure_connected()?;
        migrations::migration_status(&self.pool).await
    }

    /// Returns a reference to the connection pool.
    ///
    /// Prefer repository methods; this exists for diagnostics.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the payment repository.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let id = db.payments().add(&new_payment).await?;
    /// ```
    pub fn payments(&self) -> PaymentRepository {
        PaymentRepository::new(self.pool.clone())
    }

    /// Whether the connection is still open.
    pub fn is_connected(&self) -> bool {
        !self.pool.is_closed()
    }

    fn ensure_connected(&self) -> DbResult<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(DbError::ConnectionFailed("database is closed".to_string()))
        }
    }

    /// Closes the connection.
    ///
    /// Waits for in-flight operations to finish. Every repository obtained
    /// from this database fails with `ConnectionFailed` afterwards. Calling
    /// it twice is harmless.
    pub async fn close(&self) {
        info!("Closing database connection");
        self.pool.close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        self.is_connected() && sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
