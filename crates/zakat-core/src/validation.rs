//! # Validation Module
//!
//! Input validation for zakat payments.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Menu / CLI (caller)                                          │
//! │  └── Parses typed input (amount text → Money)                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Field rules (length, pattern, enum membership, positivity)        │
//! │  └── Normalization (trim, capitalize category, default method)         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── CHECK constraints (amount > 0, enum columns)                      │
//! │                                                                         │
//! │  Nothing reaches layer 3 until layer 2 has passed completely.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use zakat_core::validation::{validate_phone, validate_payment_date};
//!
//! assert!(validate_phone("+62 812-3456-7890").is_ok());
//! assert!(validate_payment_date("2026-02-30").is_err());
//! ```

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{NewPayment, PaymentStatus, ZakatCategory};
use crate::{
    MAX_ADDRESS_LEN, MAX_KEYWORD_LEN, MAX_NAME_LEN, MAX_PAYMENT_METHOD_LEN, MIN_KEYWORD_LEN,
    UNKNOWN_PAYMENT_METHOD,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Validated Payment
// =============================================================================

/// A [`NewPayment`] that passed every rule, with normalized values.
///
/// Only this type can be written to the database.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPayment {
    pub payer_name: String,
    pub address: Option<String>,
    pub phone: String,
    pub category: ZakatCategory,
    pub amount: Money,
    pub payment_date: NaiveDate,
    pub payment_method: String,
}

/// Validates a payment input.
///
/// ## Order
/// Rules run in a fixed order and stop at the first failure:
/// 1. payer name length
/// 2. phone pattern
/// 3. category membership
/// 4. amount positivity
/// 5. payment date
/// 6. address length
/// 7. payment method length
///
/// ## Example
/// ```rust
/// use zakat_core::validation::validate_new_payment;
/// use zakat_core::{Money, NewPayment, ZakatCategory};
///
/// let input = NewPayment::new("Jane Doe", "08123456789", "maal", Money::from_minor(10000), "2026-01-15");
/// let valid = validate_new_payment(&input).unwrap();
/// assert_eq!(valid.category, ZakatCategory::Maal);
/// assert_eq!(valid.payment_method, "Unknown");
/// ```
pub fn validate_new_payment(input: &NewPayment) -> ValidationResult<ValidatedPayment> {
    let payer_name = validate_payer_name(&input.payer_name)?;
    let phone = validate_phone(&input.phone)?;
    let category = validate_category(&input.category)?;
    let amount = validate_amount(input.amount)?;
    let payment_date = validate_payment_date(&input.payment_date)?;
    let address = validate_address(input.address.as_deref())?;
    let payment_method = validate_payment_method(input.payment_method.as_deref())?;

    Ok(ValidatedPayment {
        payer_name,
        address,
        phone,
        category,
        amount,
        payment_date,
        payment_method,
    })
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a payer name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 100 characters
///
/// ## Returns
/// The trimmed name.
pub fn validate_payer_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "payer_name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "payer_name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates a phone number.
///
/// ## Rules
/// - 7 to 20 characters
/// - Only digits, spaces, `+`, `-`, `(` and `)`
///
/// ## Example
/// ```rust
/// use zakat_core::validation::validate_phone;
///
/// assert!(validate_phone("(021) 555-0123").is_ok());
/// assert!(validate_phone("abc").is_err());
/// assert!(validate_phone("12").is_err());
/// assert!(validate_phone(&"1".repeat(25)).is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<String> {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();

    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    let regex = PHONE_REGEX.get_or_init(|| {
        Regex::new(r"^[0-9+\-() ]{7,20}$").expect("phone pattern is a valid regex")
    });

    if !regex.is_match(phone) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must be 7-20 characters of digits, spaces, +, -, ( or )".to_string(),
        });
    }

    Ok(phone.to_string())
}

/// Validates an optional address.
///
/// Blank input is treated as no address.
pub fn validate_address(address: Option<&str>) -> ValidationResult<Option<String>> {
    let address = match address.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(a) => a,
    };

    if address.chars().count() > MAX_ADDRESS_LEN {
        return Err(ValidationError::TooLong {
            field: "address".to_string(),
            max: MAX_ADDRESS_LEN,
        });
    }

    Ok(Some(address.to_string()))
}

/// Validates an optional payment method, defaulting to `"Unknown"`.
pub fn validate_payment_method(method: Option<&str>) -> ValidationResult<String> {
    let method = match method.map(str::trim) {
        None | Some("") => return Ok(UNKNOWN_PAYMENT_METHOD.to_string()),
        Some(m) => m,
    };

    if method.chars().count() > MAX_PAYMENT_METHOD_LEN {
        return Err(ValidationError::TooLong {
            field: "payment_method".to_string(),
            max: MAX_PAYMENT_METHOD_LEN,
        });
    }

    Ok(method.to_string())
}

/// Validates a search keyword for substring matching.
///
/// ## Rules
/// - 2 to 255 characters after trimming
///
/// ## Returns
/// The trimmed keyword.
pub fn validate_search_keyword(keyword: &str) -> ValidationResult<String> {
    let keyword = keyword.trim();
    let len = keyword.chars().count();

    if len < MIN_KEYWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "keyword".to_string(),
            min: MIN_KEYWORD_LEN,
        });
    }

    if len > MAX_KEYWORD_LEN {
        return Err(ValidationError::TooLong {
            field: "keyword".to_string(),
            max: MAX_KEYWORD_LEN,
        });
    }

    Ok(keyword.to_string())
}

// =============================================================================
// Enum Validators
// =============================================================================

/// Validates a category name (case-insensitive).
pub fn validate_category(category: &str) -> ValidationResult<ZakatCategory> {
    category.parse()
}

/// Validates a status name (case-insensitive).
pub fn validate_status(status: &str) -> ValidationResult<PaymentStatus> {
    status.parse()
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a zakat amount.
///
/// ## Rules
/// - Must be strictly positive
pub fn validate_amount(amount: Money) -> ValidationResult<Money> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(amount)
}

/// Validates a record id.
///
/// ## Rules
/// - Must be positive (SQLite rowids start at 1)
pub fn validate_record_id(id: i64) -> ValidationResult<i64> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "id".to_string(),
        });
    }

    Ok(id)
}

/// Parses a record id typed as text (used by id search).
///
/// Only the integer syntax is checked. Zero and negative ids parse fine;
/// they simply never match a stored row.
pub fn parse_record_id(text: &str) -> ValidationResult<i64> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "id".to_string(),
            reason: "must be a whole number".to_string(),
        })
}

// =============================================================================
// Date Validators
// =============================================================================

/// Validates a payment date.
///
/// ## Rules
/// - Exactly `YYYY-MM-DD` (zero-padded)
/// - Must be a real calendar date (no day 32, no February 30)
///
/// ## Example
/// ```rust
/// use zakat_core::validation::validate_payment_date;
///
/// assert!(validate_payment_date("2024-02-29").is_ok());
/// assert!(validate_payment_date("2023-02-29").is_err());
/// assert!(validate_payment_date("2024-01-32").is_err());
/// assert!(validate_payment_date("2024-1-5").is_err());
/// ```
pub fn validate_payment_date(date: &str) -> ValidationResult<NaiveDate> {
    let date = date.trim();

    if date.is_empty() {
        return Err(ValidationError::Required {
            field: "payment_date".to_string(),
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "payment_date".to_string(),
        reason: "must be a valid date in YYYY-MM-DD form".to_string(),
    };

    let bytes = date.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

    if !well_formed {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| invalid())
}

// =============================================================================
// Unit Tests
// =============================================================================
