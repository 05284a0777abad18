//! # Repository Module
//!
//! Database repository implementations for Zakat Ledger.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  Menu option "Cari Pembayaran"                                         │
//! │       │                                                                 │
//! │       │  db.payments().search("jane", "name", None)                    │
//! │       ▼                                                                 │
//! │  PaymentRepository                                                     │
//! │  ├── validate input (zakat-core)                                       │
//! │  ├── pick a fixed, parameterized statement                             │
//! │  └── run it (inside a transaction when it writes)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  SQL lives only in this module. Callers never build query text.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`PaymentRepository`](payment::PaymentRepository) - Zakat payment CRUD, search and aggregates

pub mod payment;
