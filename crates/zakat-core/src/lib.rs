//! # zakat-core: Pure Domain Logic for Zakat Ledger
//!
//! Payment records, money and validation rules, with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Zakat Ledger Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               Menu / CLI / Reports (callers)                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ zakat-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │   money   │  │ validation│                  │   │
//! │  │   │ Payment   │  │   Money   │  │   rules   │                  │   │
//! │  │   │ Category  │  │  parsing  │  │  checks   │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    zakat-db (Database Layer)                    │   │
//! │  │          SQLite queries, migration, PaymentRepository           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (PaymentRecord, NewPayment, enums)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Validation error type
//! - [`validation`] - Field rules and normalization
//!
//! ## Example Usage
//!
//! ```rust
//! use zakat_core::validation::validate_new_payment;
//! use zakat_core::{Money, NewPayment};
//!
//! let amount: Money = "250.50".parse().unwrap();
//! let input = NewPayment::new("Jane Doe", "08123456789", "MAAL", amount, "2026-01-15");
//!
//! let valid = validate_new_payment(&input).unwrap();
//! assert_eq!(valid.category.to_string(), "Maal");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use money::Money;
pub use types::*;
pub use validation::ValidatedPayment;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Longest accepted payer name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Longest accepted address, in characters.
pub const MAX_ADDRESS_LEN: usize = 255;

/// Longest accepted payment method, in characters.
pub const MAX_PAYMENT_METHOD_LEN: usize = 50;

/// Stored when the payer gives no payment method.
pub const UNKNOWN_PAYMENT_METHOD: &str = "Unknown";

/// Shortest keyword accepted for substring search.
///
/// Single letters match most of the table and are almost never what the
/// operator meant.
pub const MIN_KEYWORD_LEN: usize = 2;

/// Longest keyword accepted for substring search.
///
/// Matches the longest searchable column (the address).
pub const MAX_KEYWORD_LEN: usize = MAX_ADDRESS_LEN;

/// Row cap for listing all payments when the caller gives none.
pub const DEFAULT_LIST_LIMIT: u32 = 1000;

/// Row cap for search results when the caller gives none.
pub const DEFAULT_SEARCH_LIMIT: u32 = 100;
