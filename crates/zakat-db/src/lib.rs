//! # zakat-db: Database Layer for Zakat Ledger
//!
//! This crate provides database access for zakat payment records.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Zakat Ledger Data Flow                             │
//! │                                                                         │
//! │  Menu option (Cari / Tambah / Verifikasi / Laporan)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     zakat-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repository   │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (payment.rs)  │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ PaymentRepo   │    │ 001_create_  │  │   │
//! │  │   │ open / close  │    │               │    │ pembayar_... │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ./zakat.db  (or ZAKAT_DB_PATH, or in-memory for tests)       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Payment repository
//!
//! ## Usage
//!
//! ```rust,ignore
//! use zakat_db::{Database, DbConfig};
//!
//! // Open (and migrate) the database named by ZAKAT_DB_PATH
//! let db = Database::new(DbConfig::from_env()?).await?;
//!
//! // Use the repository
//! let matches = db.payments().search("jane", "name", None).await?;
//!
//! db.close().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::payment::PaymentRepository;
