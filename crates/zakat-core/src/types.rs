//! # Domain Types
//!
//! Core domain types used throughout Zakat Ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   NewPayment    │   │  PaymentRecord  │   │CategoryStatistics│      │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  raw input      │──►│  id (INTEGER)   │──►│  category       │       │
//! │  │  (no status!)   │   │  status         │   │  payer_count    │       │
//! │  │                 │   │  created_at     │   │  total, average │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ ZakatCategory   │   │ PaymentStatus   │   │  SearchField    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Fitrah, Maal   │   │  Pending        │   │  Name, Address  │       │
//! │  │  Infaq, Fidyah  │   │  Verified       │   │  Phone, Category│       │
//! │  │                 │   │  Rejected       │   │  Id             │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Zakat Category
// =============================================================================

/// Kind of zakat (or related giving) a payment belongs to.
///
/// Input is matched case-insensitively; storage always uses the
/// capitalized variant name (`"Fitrah"`, `"Maal"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum ZakatCategory {
    /// End-of-Ramadan zakat.
    Fitrah,
    /// Zakat on wealth.
    Maal,
    /// Voluntary giving.
    Infaq,
    /// Compensation for missed fasts.
    Fidyah,
}

impl ZakatCategory {
    pub const ALL: [ZakatCategory; 4] = [
        ZakatCategory::Fitrah,
        ZakatCategory::Maal,
        ZakatCategory::Infaq,
        ZakatCategory::Fidyah,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ZakatCategory::Fitrah => "Fitrah",
            ZakatCategory::Maal => "Maal",
            ZakatCategory::Infaq => "Infaq",
            ZakatCategory::Fidyah => "Fidyah",
        }
    }
}

impl FromStr for ZakatCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ZakatCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let allowed: Vec<&str> = ZakatCategory::ALL.iter().map(|c| c.as_str()).collect();
                ValidationError::not_allowed("category", &allowed)
            })
    }
}

impl fmt::Display for ZakatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// Verification status of a payment.
///
/// Any status may follow any other; there is no enforced state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Recorded but not yet checked. Every new payment starts here.
    Pending,
    /// Confirmed as received. Only verified payments count toward totals.
    Verified,
    /// Checked and refused.
    Rejected,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 3] = [
        PaymentStatus::Pending,
        PaymentStatus::Verified,
        PaymentStatus::Rejected,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Verified => "verified",
            PaymentStatus::Rejected => "rejected",
        }
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

impl FromStr for PaymentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        PaymentStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let allowed: Vec<&str> = PaymentStatus::ALL.iter().map(|s| s.as_str()).collect();
                ValidationError::not_allowed("status", &allowed)
            })
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Payment Record
// =============================================================================

/// A stored zakat payment, as read back from the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PaymentRecord {
    /// Database-assigned identifier. Never reused, never changed.
    pub id: i64,

    /// Name of the payer.
    pub payer_name: String,

    pub address: Option<String>,

    pub phone: String,

    pub category: ZakatCategory,

    /// Amount paid, always strictly positive.
    pub amount: Money,

    /// Day the payment was made (not the day it was recorded).
    pub payment_date: NaiveDate,

    /// Free-text payment method ("Transfer", "Tunai", ...). "Unknown" when
    /// the payer did not say.
    pub payment_method: String,

    /// The only field that changes after creation.
    pub status: PaymentStatus,

    pub created_at: DateTime<Utc>,
}

// =============================================================================
// New Payment
// =============================================================================

/// Caller input for recording a payment.
///
/// Text fields hold what the user typed; validation normalizes them. There is no
/// status field: new payments always start as
/// [`PaymentStatus::Pending`].
///
/// ## Example
/// ```rust
/// use zakat_core::{Money, NewPayment};
///
/// let payment = NewPayment::new("Jane Doe", "0812-3456-7890", "fitrah", Money::from_minor(4500000), "2026-03-30")
///     .with_address("Jl. Merdeka 1")
///     .with_payment_method("Transfer");
/// assert_eq!(payment.category, "fitrah");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPayment {
    pub payer_name: String,
    pub address: Option<String>,
    pub phone: String,
    /// Category name, any letter case.
    pub category: String,
    pub amount: Money,
    /// Payment date as `YYYY-MM-DD`.
    pub payment_date: String,
    pub payment_method: Option<String>,
}

impl NewPayment {
    /// Creates a payment input with the required fields.
    pub fn new(
        payer_name: impl Into<String>,
        phone: impl Into<String>,
        category: impl Into<String>,
        amount: Money,
        payment_date: impl Into<String>,
    ) -> Self {
        NewPayment {
            payer_name: payer_name.into(),
            address: None,
            phone: phone.into(),
            category: category.into(),
            amount,
            payment_date: payment_date.into(),
            payment_method: None,
        }
    }

    /// Sets the payer's address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets the payment method.
    pub fn with_payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = Some(method.into());
        self
    }
}

// =============================================================================
// Search Field
// =============================================================================

/// The closed set of columns a search may filter on.
///
/// Each variant maps to one fixed SQL statement in zakat-db, so caller text
/// never becomes part of the query syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Name,
    Address,
    Phone,
    Category,
    /// Exact match on the record id.
    Id,
}

impl SearchField {
    pub const ALL: [SearchField; 5] = [
        SearchField::Name,
        SearchField::Address,
        SearchField::Phone,
        SearchField::Category,
        SearchField::Id,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            SearchField::Name => "name",
            SearchField::Address => "address",
            SearchField::Phone => "phone",
            SearchField::Category => "category",
            SearchField::Id => "id",
        }
    }

    /// Whether this field uses case-insensitive "contains" matching.
    pub const fn is_substring(&self) -> bool {
        !matches!(self, SearchField::Id)
    }
}

/// Accepts the English names plus the stored column names
/// (`nama`, `alamat`, `telepon`, `jenis_zakat`), ignoring case.
impl FromStr for SearchField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" | "nama" => Ok(SearchField::Name),
            "address" | "alamat" => Ok(SearchField::Address),
            "phone" | "telepon" => Ok(SearchField::Phone),
            "category" | "jenis_zakat" => Ok(SearchField::Category),
            "id" => Ok(SearchField::Id),
            _ => {
                let allowed: Vec<&str> = SearchField::ALL.iter().map(|f| f.as_str()).collect();
                Err(ValidationError::not_allowed("field", &allowed))
            }
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Per-category aggregate over verified payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStatistics {
    pub category: ZakatCategory,
    /// Number of verified payments in this category.
    pub payer_count: i64,
    pub total: Money,
    /// `total / payer_count`, rounded to the nearest minor unit.
    pub average: Money,
}

impl CategoryStatistics {
    /// Builds the statistics row, deriving the average from total and count.
    pub fn new(category: ZakatCategory, payer_count: i64, total: Money) -> Self {
        CategoryStatistics {
            category,
            payer_count,
            total,
            average: total.average_of(payer_count),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
