//! # Payment Repository
//!
//! Database operations for zakat payments.
//!
//! ## Key Operations
//! - Record a payment (always starts as `pending`)
//! - List, look up and search payments
//! - Change status, delete
//! - Totals and per-category statistics over verified payments
//!
//! ## Write Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Every Write Looks Like This                          │
//! │                                                                         │
//! │  1. connection open?      no → ConnectionFailed                        │
//! │  2. input valid?          no → Validation (nothing sent to SQLite)     │
//! │  3. BEGIN                                                              │
//! │  4. row exists?           no → ROLLBACK, NotFound   (update / delete)  │
//! │  5. INSERT / UPDATE / DELETE                                           │
//! │       ├── error  → ROLLBACK, QueryFailed                               │
//! │       └── ok     → COMMIT                                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Search Safety
//! The search column comes from the closed [`SearchField`] enum. Each variant
//! has its own static statement below; only the keyword and limit are bound
//! as parameters.

use chrono::Utc;
use sqlx::{FromRow, Sqlite, SqliteConnection, SqlitePool, Transaction};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use zakat_core::validation::{
    parse_record_id, validate_new_payment, validate_record_id, validate_search_keyword,
    validate_status, ValidatedPayment,
};
use zakat_core::{
    CategoryStatistics, Money, NewPayment, PaymentRecord, PaymentStatus, SearchField,
    ZakatCategory, DEFAULT_LIST_LIMIT, DEFAULT_SEARCH_LIMIT,
};

const ENTITY: &str = "Payment";

// =============================================================================
// Statements
// =============================================================================

/// Prefixes a `PaymentRecord`-shaped SELECT onto the given tail.
macro_rules! select_payments {
    ($tail:literal) => {
        concat!(
            "SELECT id, nama AS payer_name, alamat AS address, telepon AS phone, \
             jenis_zakat AS category, jumlah_zakat AS amount, tanggal_bayar AS payment_date, \
             metodo_pembayaran AS payment_method, status, created_at \
             FROM pembayar_zakat ",
            $tail
        )
    };
}

const INSERT_PAYMENT: &str = r#"
    INSERT INTO pembayar_zakat (
        nama, alamat, telepon, jenis_zakat, jumlah_zakat,
        tanggal_bayar, metodo_pembayaran, status, created_at,
        nama_cari, alamat_cari
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
"#;

const UNFOLDED_ROWS: &str = "SELECT id, nama, alamat FROM pembayar_zakat WHERE nama_cari IS NULL";

const SET_SEARCH_COLUMNS: &str =
    "UPDATE pembayar_zakat SET nama_cari = ?1, alamat_cari = ?2 WHERE id = ?3";

const PAYMENT_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM pembayar_zakat WHERE id = ?1)";

const UPDATE_STATUS: &str = "UPDATE pembayar_zakat SET status = ?1 WHERE id = ?2";

const DELETE_PAYMENT: &str = "DELETE FROM pembayar_zakat WHERE id = ?1";

const LIST_ALL: &str = select_payments!("ORDER BY tanggal_bayar DESC, id DESC LIMIT ?1");

const GET_BY_ID: &str = select_payments!("WHERE id = ?1");

const SEARCH_BY_NAME: &str = select_payments!(
    r"WHERE nama_cari LIKE ?1 ESCAPE '\' ORDER BY tanggal_bayar DESC, id DESC LIMIT ?2"
);

const SEARCH_BY_ADDRESS: &str = select_payments!(
    r"WHERE alamat_cari LIKE ?1 ESCAPE '\' ORDER BY tanggal_bayar DESC, id DESC LIMIT ?2"
);

const SEARCH_BY_PHONE: &str = select_payments!(
    r"WHERE LOWER(telepon) LIKE ?1 ESCAPE '\' ORDER BY tanggal_bayar DESC, id DESC LIMIT ?2"
);

const SEARCH_BY_CATEGORY: &str = select_payments!(
    r"WHERE LOWER(jenis_zakat) LIKE ?1 ESCAPE '\' ORDER BY tanggal_bayar DESC, id DESC LIMIT ?2"
);

const SEARCH_BY_ID: &str =
    select_payments!("WHERE id = ?1 ORDER BY tanggal_bayar DESC, id DESC LIMIT ?2");

const TOTAL_BY_STATUS: &str = "SELECT SUM(jumlah_zakat) FROM pembayar_zakat WHERE status = ?1";

const CATEGORY_TOTALS: &str = r#"
    SELECT
        jenis_zakat AS category,
        COUNT(*) AS payer_count,
        SUM(jumlah_zakat) AS total
    FROM pembayar_zakat
    WHERE status = ?1
    GROUP BY jenis_zakat
    ORDER BY total DESC, jenis_zakat ASC
"#;

/// Maps each search field to its statement.
fn search_statement(field: SearchField) -> &'static str {
    match field {
        SearchField::Name => SEARCH_BY_NAME,
        SearchField::Address => SEARCH_BY_ADDRESS,
        SearchField::Phone => SEARCH_BY_PHONE,
        SearchField::Category => SEARCH_BY_CATEGORY,
        SearchField::Id => SEARCH_BY_ID,
    }
}

/// Case folding shared by the stored `*_cari` columns and search keywords.
///
/// Full Unicode lowercase, so "JOSÉ" and "josé" fold to the same text.
/// Phone and category values are ASCII, where SQLite's `LOWER()` agrees.
fn fold_for_search(text: &str) -> String {
    text.to_lowercase()
}

/// Builds a case-insensitive "contains" LIKE pattern.
///
/// `%`, `_` and `\` in the keyword are escaped so they match literally.
fn like_pattern(keyword: &str) -> String {
    let folded = fold_for_search(keyword);
    let mut pattern = String::with_capacity(folded.len() + 2);
    pattern.push('%');
    for c in folded.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[derive(FromRow)]
struct CategoryTotalsRow {
    category: ZakatCategory,
    payer_count: i64,
    total: Money,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for zakat payment operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.payments();
///
/// let id = repo.add(&NewPayment::new("Jane Doe", "08123456789", "fitrah", amount, "2026-03-30")).await?;
/// repo.update_status(id, "verified").await?;
///
/// let total = repo.total_verified().await?;
/// ```
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    /// Creates a new PaymentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PaymentRepository { pool }
    }

    /// Records a new payment.
    ///
    /// ## What This Does
    /// 1. Validates the input (name, phone, category, amount, date, then
    ///    address and method), stopping at the first failure
    /// 2. Inserts one row with status `pending` inside a transaction
    /// 3. Commits and returns the new id
    ///
    /// ## Returns
    /// * `Ok(id)` - Identifier of the new row
    /// * `Err(DbError::Validation)` - Input rejected; nothing was written
    /// * `Err(DbError::QueryFailed)` - SQLite rejected the insert; rolled back
    pub async fn add(&self, payment: &NewPayment) -> DbResult<i64> {
        self.ensure_connected()?;

        let payment = validate_new_payment(payment).map_err(|err| {
            warn!(field = err.field(), error = %err, "Rejected payment input");
            DbError::from(err)
        })?;

        debug!(
            payer = %payment.payer_name,
            category = %payment.category,
            amount = %payment.amount,
            "Inserting payment"
        );

        let mut tx = self.begin().await?;
        let outcome = insert_payment(&mut tx, &payment).await;
        let id = finish(tx, "add", outcome).await?;

        info!(id, "Payment recorded");
        Ok(id)
    }

    /// Lists payments, newest payment date first.
    ///
    /// Ties on the same date are broken by id (most recently recorded first),
    /// so the order is stable across calls.
    ///
    /// ## Arguments
    /// * `limit` - Maximum rows to return (default 1000)
    ///
    /// ## Returns
    /// An empty vec when there are no payments.
    pub async fn list_all(&self, limit: Option<u32>) -> DbResult<Vec<PaymentRecord>> {
        self.ensure_connected()?;

        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
        debug!(limit, "Listing payments");

        let records = sqlx::query_as::<_, PaymentRecord>(LIST_ALL)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = records.len(), "Listed payments");
        Ok(records)
    }

    /// Gets a payment by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(PaymentRecord))` - Payment found
    /// * `Ok(None)` - No payment with that id
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<PaymentRecord>> {
        self.ensure_connected()?;
        let id = validate_record_id(id)?;

        let record = sqlx::query_as::<_, PaymentRecord>(GET_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    /// Changes the status of a payment.
    ///
    /// Any status may replace any other.
    ///
    /// ## Arguments
    /// * `id` - Payment id (must be positive)
    /// * `status` - `pending`, `verified` or `rejected`, any letter case
    ///
    /// ## Returns
    /// * `Ok(())` - Status changed and committed
    /// * `Err(DbError::Validation)` - Bad id or status; nothing was sent
    /// * `Err(DbError::NotFound)` - No payment with that id
    pub async fn update_status(&self, id: i64, status: &str) -> DbResult<()> {
        self.ensure_connected()?;
        let id = validate_record_id(id)?;
        let status = validate_status(status)?;

        debug!(id, status = %status, "Updating payment status");

        let mut tx = self.begin().await?;
        let outcome = set_status(&mut tx, id, status).await;
        finish(tx, "update_status", outcome).await?;

        info!(id, status = %status, "Payment status updated");
        Ok(())
    }

    /// Permanently deletes a payment.
    ///
    /// Deleting an id that does not exist (including one already deleted)
    /// is `NotFound`, never a silent success.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        self.ensure_connected()?;
        let id = validate_record_id(id)?;

        debug!(id, "Deleting payment");

        let mut tx = self.begin().await?;
        let outcome = delete_payment(&mut tx, id).await;
        finish(tx, "delete", outcome).await?;

        info!(id, "Payment deleted");
        Ok(())
    }

    /// Searches payments by one field.
    ///
    /// ## Arguments
    /// * `keyword` - Text to look for. For `id`, a whole number matched
    ///   exactly (zero or negative simply matches nothing); otherwise 2-255
    ///   characters matched as a case-insensitive substring, with any
    ///   Unicode letter folded
    /// * `field` - `name`, `address`, `phone`, `category` or `id` (the stored
    ///   column names `nama`, `alamat`, `telepon`, `jenis_zakat` also work)
    /// * `limit` - Maximum rows to return (default 100)
    ///
    /// ## Returns
    /// Matches ordered like [`list_all`](Self::list_all); an empty vec when
    /// nothing matches. An unknown field is a validation error and no query
    /// is run.
    pub async fn search(
        &self,
        keyword: &str,
        field: &str,
        limit: Option<u32>,
    ) -> DbResult<Vec<PaymentRecord>> {
        self.ensure_connected()?;

        let field: SearchField = field.parse()?;
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        let statement = search_statement(field);

        let records = if field.is_substring() {
            let keyword = validate_search_keyword(keyword)?;
            debug!(field = %field, keyword = %keyword, limit, "Searching payments");

            sqlx::query_as::<_, PaymentRecord>(statement)
                .bind(like_pattern(&keyword))
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
        } else {
            let id = parse_record_id(keyword)?;
            debug!(field = %field, id, "Searching payments");

            sqlx::query_as::<_, PaymentRecord>(statement)
                .bind(id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
        };

        debug!(count = records.len(), "Search returned payments");
        Ok(records)
    }

    /// Sums the amounts of all payments with the given status.
    ///
    /// An unknown status is rejected rather than replaced with `verified`.
    ///
    /// ## Returns
    /// The total; `Money::zero()` when no payment has that status.
    pub async fn total_amount(&self, status: &str) -> DbResult<Money> {
        self.ensure_connected()?;
        let status = validate_status(status)?;

        let total: Option<i64> = sqlx::query_scalar(TOTAL_BY_STATUS)
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        Ok(Money::from_minor(total.unwrap_or(0)))
    }

    /// Total of all verified payments.
    pub async fn total_verified(&self) -> DbResult<Money> {
        self.total_amount(PaymentStatus::Verified.as_str()).await
    }

    /// Per-category count, total and average over verified payments.
    ///
    /// ## Returns
    /// One entry per category that has verified payments, largest total
    /// first (ties by category name). Empty when nothing is verified.
    pub async fn statistics(&self) -> DbResult<Vec<CategoryStatistics>> {
        self.ensure_connected()?;

        let rows = sqlx::query_as::<_, CategoryTotalsRow>(CATEGORY_TOTALS)
            .bind(PaymentStatus::Verified)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| CategoryStatistics::new(row.category, row.payer_count, row.total))
            .collect())
    }

    /// Fills the folded search columns of rows that predate them.
    ///
    /// Called by `Database::new` after migrations. Rows written through
    /// [`add`](Self::add) already carry their folded values, so on a current
    /// database this finds nothing to do.
    ///
    /// ## Returns
    /// Number of rows filled.
    pub async fn fill_search_columns(&self) -> DbResult<usize> {
        self.ensure_connected()?;

        let rows: Vec<(i64, String, Option<String>)> = sqlx::query_as(UNFOLDED_ROWS)
            .fetch_all(&self.pool)
            .await?;

        if rows.is_empty() {
            return Ok(0);
        }

        let mut tx = self.begin().await?;
        let outcome = set_search_columns(&mut tx, &rows).await;
        finish(tx, "fill_search_columns", outcome).await?;

        info!(rows = rows.len(), "Filled search columns");
        Ok(rows.len())
    }

    /// Counts all payments (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        self.ensure_connected()?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pembayar_zakat")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    fn ensure_connected(&self) -> DbResult<()> {
        if self.pool.is_closed() {
            warn!("Payment repository used after the database was closed");
            return Err(DbError::ConnectionFailed("database is closed".to_string()));
        }
        Ok(())
    }

    async fn begin(&self) -> DbResult<Transaction<'static, Sqlite>> {
        self.pool.begin().await.map_err(|err| match DbError::from(err) {
            DbError::Internal(msg) | DbError::QueryFailed(msg) => DbError::TransactionFailed(msg),
            other => other,
        })
    }
}

// =============================================================================
// Transaction Steps
// =============================================================================

async fn insert_payment(conn: &mut SqliteConnection, payment: &ValidatedPayment) -> DbResult<i64> {
    let result = sqlx::query(INSERT_PAYMENT)
        .bind(&payment.payer_name)
        .bind(payment.address.as_deref())
        .bind(&payment.phone)
        .bind(payment.category)
        .bind(payment.amount)
        .bind(payment.payment_date)
        .bind(&payment.payment_method)
        .bind(PaymentStatus::Pending)
        .bind(Utc::now())
        .bind(fold_for_search(&payment.payer_name))
        .bind(payment.address.as_deref().map(fold_for_search))
        .execute(&mut *conn)
        .await?;

    Ok(result.last_insert_rowid())
}

async fn set_search_columns(
    conn: &mut SqliteConnection,
    rows: &[(i64, String, Option<String>)],
) -> DbResult<()> {
    for (id, name, address) in rows {
        sqlx::query(SET_SEARCH_COLUMNS)
            .bind(fold_for_search(name))
            .bind(address.as_deref().map(fold_for_search))
            .bind(id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn payment_exists(conn: &mut SqliteConnection, id: i64) -> DbResult<bool> {
    let exists: i64 = sqlx::query_scalar(PAYMENT_EXISTS)
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(exists == 1)
}

async fn set_status(conn: &mut SqliteConnection, id: i64, status: PaymentStatus) -> DbResult<()> {
    if !payment_exists(conn, id).await? {
        return Err(DbError::not_found(ENTITY, id));
    }

    sqlx::query(UPDATE_STATUS)
        .bind(status)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

async fn delete_payment(conn: &mut SqliteConnection, id: i64) -> DbResult<()> {
    if !payment_exists(conn, id).await? {
        return Err(DbError::not_found(ENTITY, id));
    }

    sqlx::query(DELETE_PAYMENT)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Commits on success, rolls back on failure.
async fn finish<T>(
    tx: Transaction<'static, Sqlite>,
    operation: &'static str,
    outcome: DbResult<T>,
) -> DbResult<T> {
    match outcome {
        Ok(value) => {
            tx.commit()
                .await
                .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
            Ok(value)
        }
        Err(err) => {
            match tx.rollback().await {
                Ok(()) => debug!(operation, error = %err, "Transaction rolled back"),
                Err(rollback_err) => {
                    warn!(operation, error = %rollback_err, "Rollback failed")
                }
            }
            Err(err)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
