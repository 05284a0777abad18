//! End-to-end behavior of `PaymentRepository` against real SQLite databases.

use zakat_core::{Money, NewPayment, PaymentStatus, ZakatCategory};
use zakat_db::{Database, DbConfig, DbError};

async fn open() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database opens")
}

fn payment(name: &str, amount_minor: i64, date: &str) -> NewPayment {
    NewPayment::new(
        name,
        "0812-3456-7890",
        "fitrah",
        Money::from_minor(amount_minor),
        date,
    )
}

async fn add_verified(db: &Database, input: &NewPayment) -> i64 {
    let repo = db.payments();
    let id = repo.add(input).await.unwrap();
    repo.update_status(id, "verified").await.unwrap();
    id
}

// =============================================================================
// add / list_all
// =============================================================================

#[tokio::test]
async fn add_records_pending_payment_with_fresh_id() {
    let db = open().await;
    let repo = db.payments();

    let first = repo.add(&payment("Jane Doe", 4_500_000, "2026-03-30")).await.unwrap();
    let second = repo.add(&payment("John Roe", 4_500_000, "2026-03-30")).await.unwrap();
    assert_ne!(first, second);

    let all = repo.list_all(None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|r| r.status == PaymentStatus::Pending));
    assert!(all.iter().any(|r| r.id == first && r.payer_name == "Jane Doe"));
}

#[tokio::test]
async fn add_round_trips_every_field() {
    let db = open().await;
    let repo = db.payments();

    let input = NewPayment::new(
        "  Siti Rahman ",
        "+62 812 3456",
        "MAAL",
        "1250000.75".parse().unwrap(),
        "2026-02-14",
    )
    .with_address(" Jl. Merdeka No. 1, Bandung ")
    .with_payment_method("Transfer Bank");

    let id = repo.add(&input).await.unwrap();
    let record = repo.get_by_id(id).await.unwrap().expect("record exists");

    assert_eq!(record.id, id);
    assert_eq!(record.payer_name, "Siti Rahman");
    assert_eq!(record.address.as_deref(), Some("Jl. Merdeka No. 1, Bandung"));
    assert_eq!(record.phone, "+62 812 3456");
    assert_eq!(record.category, ZakatCategory::Maal);
    assert_eq!(record.amount, Money::from_minor(125_000_075));
    assert_eq!(record.payment_date.to_string(), "2026-02-14");
    assert_eq!(record.payment_method, "Transfer Bank");
    assert_eq!(record.status, PaymentStatus::Pending);

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["status"], "pending");
    assert_eq!(json["payment_date"], "2026-02-14");
}

#[tokio::test]
async fn add_defaults_missing_method_and_address() {
    let db = open().await;
    let repo = db.payments();

    let id = repo
        .add(&payment("Budi", 3_500_000, "2026-03-01").with_address("   "))
        .await
        .unwrap();
    let record = repo.get_by_id(id).await.unwrap().unwrap();

    assert_eq!(record.address, None);
    assert_eq!(record.payment_method, "Unknown");
}

#[tokio::test]
async fn add_rejects_invalid_phone_without_writing() {
    let db = open().await;
    let repo = db.payments();
    let too_long = "1".repeat(25);

    for phone in ["abc", "12", too_long.as_str()] {
        let mut input = payment("Jane Doe", 4_500_000, "2026-03-30");
        input.phone = phone.to_string();

        let err = repo.add(&input).await.unwrap_err();
        assert!(err.is_validation(), "phone {phone:?} gave {err}");
    }

    assert_eq!(repo.count().await.unwrap(), 0);
    assert!(repo.list_all(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn add_reports_first_failing_field() {
    let db = open().await;
    let repo = db.payments();

    let input = NewPayment::new("", "abc", "sedekah", Money::zero(), "2026-13-01");
    match repo.add(&input).await {
        Err(DbError::Validation(err)) => assert_eq!(err.field(), "payer_name"),
        other => panic!("expected validation error, got {other:?}"),
    }

    let input = NewPayment::new("Jane", "08123456789", "sedekah", Money::zero(), "2026-13-01");
    match repo.add(&input).await {
        Err(DbError::Validation(err)) => assert_eq!(err.field(), "category"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn list_all_orders_newest_first_and_respects_limit() {
    let db = open().await;
    let repo = db.payments();

    let old = repo.add(&payment("Old", 100, "2026-01-01")).await.unwrap();
    let tie_a = repo.add(&payment("Tie A", 100, "2026-03-01")).await.unwrap();
    let tie_b = repo.add(&payment("Tie B", 100, "2026-03-01")).await.unwrap();

    let ids: Vec<i64> = repo.list_all(None).await.unwrap().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![tie_b, tie_a, old]);

    let limited = repo.list_all(Some(2)).await.unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].id, tie_b);
}

// =============================================================================
// update_status / delete
// =============================================================================

#[tokio::test]
async fn update_status_changes_only_the_target() {
    let db = open().await;
    let repo = db.payments();

    let target = repo.add(&payment("Jane", 100, "2026-03-01")).await.unwrap();
    let other = repo.add(&payment("John", 100, "2026-03-01")).await.unwrap();

    repo.update_status(target, "VERIFIED").await.unwrap();
    assert_eq!(
        repo.get_by_id(target).await.unwrap().unwrap().status,
        PaymentStatus::Verified
    );
    assert_eq!(
        repo.get_by_id(other).await.unwrap().unwrap().status,
        PaymentStatus::Pending
    );

    // Any transition is allowed
    repo.update_status(target, "rejected").await.unwrap();
    repo.update_status(target, "pending").await.unwrap();
    assert_eq!(
        repo.get_by_id(target).await.unwrap().unwrap().status,
        PaymentStatus::Pending
    );
}

#[tokio::test]
async fn update_status_rejects_bad_input_and_missing_rows() {
    let db = open().await;
    let repo = db.payments();
    let id = repo.add(&payment("Jane", 100, "2026-03-01")).await.unwrap();

    assert!(repo.update_status(id, "approved").await.unwrap_err().is_validation());
    assert!(repo.update_status(0, "verified").await.unwrap_err().is_validation());
    assert!(repo.update_status(-4, "verified").await.unwrap_err().is_validation());

    let err = repo.update_status(id + 100, "verified").await.unwrap_err();
    assert!(err.is_not_found(), "got {err}");

    let all = repo.list_all(None).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status, PaymentStatus::Pending);
}

#[tokio::test]
async fn delete_is_permanent_and_not_repeatable() {
    let db = open().await;
    let repo = db.payments();

    let id = repo.add(&payment("Jane", 100, "2026-03-01")).await.unwrap();
    let keep = repo.add(&payment("John", 100, "2026-03-01")).await.unwrap();

    repo.delete(id).await.unwrap();

    assert!(repo.search(&id.to_string(), "id", None).await.unwrap().is_empty());
    assert!(repo.get_by_id(id).await.unwrap().is_none());
    assert!(repo.get_by_id(keep).await.unwrap().is_some());

    let err = repo.delete(id).await.unwrap_err();
    assert!(err.is_not_found(), "got {err}");
    assert!(repo.delete(0).await.unwrap_err().is_validation());
}

#[tokio::test]
async fn failed_writes_roll_back() {
    let db = open().await;
    let repo = db.payments();
    let id = repo.add(&payment("Jane", 100, "2026-03-01")).await.unwrap();

    // Make SQLite itself refuse every write after validation has passed
    for trigger in [
        "CREATE TRIGGER refuse_insert BEFORE INSERT ON pembayar_zakat \
         BEGIN SELECT RAISE(ABORT, 'insert refused'); END",
        "CREATE TRIGGER refuse_update BEFORE UPDATE ON pembayar_zakat \
         BEGIN SELECT RAISE(ABORT, 'update refused'); END",
        "CREATE TRIGGER refuse_delete BEFORE DELETE ON pembayar_zakat \
         BEGIN SELECT RAISE(ABORT, 'delete refused'); END",
    ] {
        sqlx::query(trigger).execute(db.pool()).await.unwrap();
    }

    assert!(repo.add(&payment("John", 100, "2026-03-02")).await.unwrap_err().is_datastore());
    assert!(repo.update_status(id, "verified").await.unwrap_err().is_datastore());
    assert!(repo.delete(id).await.unwrap_err().is_datastore());

    let all = repo.list_all(None).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, id);
    assert_eq!(all[0].status, PaymentStatus::Pending);
}

// =============================================================================
// search
// =============================================================================

#[tokio::test]
async fn search_name_is_case_insensitive_substring() {
    let db = open().await;
    let repo = db.payments();
    repo.add(&payment("Jane Doe", 100, "2026-03-01")).await.unwrap();
    repo.add(&payment("John Roe", 100, "2026-03-01")).await.unwrap();

    let found = repo.search("JANE", "name", None).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].payer_name, "Jane Doe");

    // Stored column names are accepted too
    assert_eq!(repo.search("oe", "nama", None).await.unwrap().len(), 2);
    assert!(repo.search("zzz", "name", None).await.unwrap().is_empty());
}

#[tokio::test]
async fn search_other_fields() {
    let db = open().await;
    let repo = db.payments();

    let with_address = repo
        .add(&payment("Jane", 100, "2026-03-01").with_address("Jl. Merdeka, Bandung"))
        .await
        .unwrap();
    let mut maal = payment("John", 100, "2026-03-02");
    maal.category = "maal".to_string();
    maal.phone = "021 555 0199".to_string();
    let maal = repo.add(&maal).await.unwrap();

    let by_address = repo.search("bandung", "address", None).await.unwrap();
    assert_eq!(by_address.len(), 1);
    assert_eq!(by_address[0].id, with_address);

    let by_phone = repo.search("555", "telepon", None).await.unwrap();
    assert_eq!(by_phone.len(), 1);
    assert_eq!(by_phone[0].id, maal);

    let by_category = repo.search("FIT", "category", None).await.unwrap();
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0].id, with_address);

    let by_id = repo.search(&format!(" {maal} "), "id", None).await.unwrap();
    assert_eq!(by_id.len(), 1);
    assert_eq!(by_id[0].payer_name, "John");
}

#[tokio::test]
async fn search_folds_non_ascii_letters() {
    let db = open().await;
    let repo = db.payments();
    let id = repo
        .add(&payment("José Ünal", 100, "2026-03-01").with_address("Straße der Einheit, Köln"))
        .await
        .unwrap();

    for keyword in ["JOSÉ", "josé", "ünal", "ÜNAL", "José Ü"] {
        let found = repo.search(keyword, "name", None).await.unwrap();
        assert_eq!(found.len(), 1, "keyword {keyword:?}");
        assert_eq!(found[0].id, id);
    }

    assert_eq!(repo.search("KÖLN", "address", None).await.unwrap().len(), 1);
    assert_eq!(repo.search("STRAßE", "alamat", None).await.unwrap().len(), 1);
    assert!(repo.search("jose", "name", None).await.unwrap().is_empty());
}

#[tokio::test]
async fn fill_search_columns_folds_older_rows() {
    let db = open().await;
    let repo = db.payments();

    // A row written without the folded columns, as older databases have
    sqlx::query(
        "INSERT INTO pembayar_zakat (nama, alamat, telepon, jenis_zakat, jumlah_zakat, tanggal_bayar) \
         VALUES ('ÉLODIE Ürk', 'Jl. Ömer 5', '08123456789', 'Infaq', 500, '2026-01-05')",
    )
    .execute(db.pool())
    .await
    .unwrap();
    assert!(repo.search("élodie", "name", None).await.unwrap().is_empty());

    assert_eq!(repo.fill_search_columns().await.unwrap(), 1);
    assert_eq!(repo.fill_search_columns().await.unwrap(), 0);

    assert_eq!(repo.search("élodie", "name", None).await.unwrap().len(), 1);
    assert_eq!(repo.search("ömer", "address", None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn search_accepts_long_address_keyword() {
    let db = open().await;
    let repo = db.payments();

    let address = format!("Jl. {}", "Panjang Sekali ".repeat(15).trim_end());
    assert!(address.chars().count() > 150);
    let id = repo
        .add(&payment("Jane", 100, "2026-03-01").with_address(address.as_str()))
        .await
        .unwrap();

    let keyword: String = address.chars().take(150).collect();
    let found = repo.search(&keyword, "address", None).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, id);
}

#[tokio::test]
async fn search_id_that_cannot_exist_is_empty() {
    let db = open().await;
    let repo = db.payments();
    repo.add(&payment("Jane", 100, "2026-03-01")).await.unwrap();

    assert!(repo.search("0", "id", None).await.unwrap().is_empty());
    assert!(repo.search("-1", "id", None).await.unwrap().is_empty());
    assert!(repo.search("999", "id", None).await.unwrap().is_empty());
    assert_eq!(repo.search("1", "id", None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
    let db = open().await;
    let repo = db.payments();
    repo.add(&payment("Amal 100% Ikhlas", 100, "2026-03-01")).await.unwrap();
    repo.add(&payment("Ahmad_Santoso", 100, "2026-03-01")).await.unwrap();
    repo.add(&payment("Ahmad Santoso", 100, "2026-03-01")).await.unwrap();

    assert_eq!(repo.search("0%", "name", None).await.unwrap().len(), 1);
    assert!(repo.search("%%", "name", None).await.unwrap().is_empty());

    let underscore = repo.search("d_s", "name", None).await.unwrap();
    assert_eq!(underscore.len(), 1);
    assert_eq!(underscore[0].payer_name, "Ahmad_Santoso");
}

#[tokio::test]
async fn search_rejects_bad_field_keyword_and_id() {
    let db = open().await;
    let repo = db.payments();
    repo.add(&payment("Jane Doe", 100, "2026-03-01")).await.unwrap();

    let err = repo.search("jane", "nonexistent_field", None).await.unwrap_err();
    assert!(err.is_validation(), "got {err}");
    let err = repo.search("jane", "nama; DROP TABLE pembayar_zakat", None).await.unwrap_err();
    assert!(err.is_validation(), "got {err}");

    assert!(repo.search("j", "name", None).await.unwrap_err().is_validation());
    assert!(repo.search(&"j".repeat(256), "name", None).await.unwrap_err().is_validation());
    assert!(repo.search("abc", "id", None).await.unwrap_err().is_validation());
    assert!(repo.search("1.5", "id", None).await.unwrap_err().is_validation());

    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn search_respects_limit() {
    let db = open().await;
    let repo = db.payments();
    for day in 1..=5 {
        repo.add(&payment("Jane", 100, &format!("2026-03-0{day}")))
            .await
            .unwrap();
    }

    let found = repo.search("jane", "name", Some(3)).await.unwrap();
    assert_eq!(found.len(), 3);
    assert_eq!(found[0].payment_date.to_string(), "2026-03-05");
}

// =============================================================================
// totals / statistics
// =============================================================================

#[tokio::test]
async fn totals_sum_exactly_by_status() {
    let db = open().await;
    let repo = db.payments();

    assert_eq!(repo.total_verified().await.unwrap(), Money::zero());

    add_verified(&db, &payment("A", 10_000, "2026-03-01")).await;
    add_verified(&db, &payment("B", 25_050, "2026-03-02")).await;
    repo.add(&payment("C", 99_999, "2026-03-03")).await.unwrap();

    let verified = repo.total_amount("verified").await.unwrap();
    assert_eq!(verified.to_string(), "350.50");
    assert_eq!(repo.total_verified().await.unwrap(), verified);
    assert_eq!(repo.total_amount("Pending").await.unwrap(), Money::from_minor(99_999));
    assert_eq!(repo.total_amount("rejected").await.unwrap(), Money::zero());

    let err = repo.total_amount("paid").await.unwrap_err();
    assert!(err.is_validation(), "got {err}");
}

#[tokio::test]
async fn statistics_group_verified_payments_by_category() {
    let db = open().await;
    let repo = db.payments();

    assert!(repo.statistics().await.unwrap().is_empty());

    add_verified(&db, &payment("A", 4_500_000, "2026-03-01")).await;
    add_verified(&db, &payment("B", 5_000_000, "2026-03-01")).await;

    let mut maal = payment("C", 100_000_000, "2026-03-01");
    maal.category = "Maal".to_string();
    add_verified(&db, &maal).await;

    let mut infaq = payment("D", 7_000_000, "2026-03-01");
    infaq.category = "infaq".to_string();
    repo.add(&infaq).await.unwrap();

    let stats = repo.statistics().await.unwrap();
    assert_eq!(stats.len(), 2);

    assert_eq!(stats[0].category, ZakatCategory::Maal);
    assert_eq!(stats[0].payer_count, 1);
    assert_eq!(stats[0].total, Money::from_minor(100_000_000));

    assert_eq!(stats[1].category, ZakatCategory::Fitrah);
    assert_eq!(stats[1].payer_count, 2);
    assert_eq!(stats[1].total, Money::from_minor(9_500_000));
    assert_eq!(stats[1].average, Money::from_minor(4_750_000));
}

// =============================================================================
// lifecycle
// =============================================================================

#[tokio::test]
async fn every_operation_fails_after_close() {
    let db = open().await;
    let repo = db.payments();
    let id = repo.add(&payment("Jane", 100, "2026-03-01")).await.unwrap();

    db.close().await;
    assert!(!db.is_connected());

    assert!(repo.add(&payment("John", 100, "2026-03-01")).await.unwrap_err().is_connection());
    assert!(repo.list_all(None).await.unwrap_err().is_connection());
    assert!(repo.get_by_id(id).await.unwrap_err().is_connection());
    assert!(repo.update_status(id, "verified").await.unwrap_err().is_connection());
    assert!(repo.delete(id).await.unwrap_err().is_connection());
    assert!(repo.search("jane", "name", None).await.unwrap_err().is_connection());
    assert!(repo.total_amount("verified").await.unwrap_err().is_connection());
    assert!(repo.total_verified().await.unwrap_err().is_connection());
    assert!(repo.statistics().await.unwrap_err().is_connection());
    assert!(repo.count().await.unwrap_err().is_connection());

    // Repositories created after close fail the same way
    assert!(db.payments().count().await.unwrap_err().is_connection());
}

#[tokio::test]
async fn file_database_persists_across_reopen() {
    let path = std::env::temp_dir().join(format!("zakat-ledger-test-{}.db", std::process::id()));
    let cleanup = |path: &std::path::Path| {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = path.as_os_str().to_owned();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    };
    cleanup(&path);

    let db = Database::new(DbConfig::new(&path)).await.unwrap();
    let id = add_verified(&db, &payment("Jane Doe", 4_500_000, "2026-03-30")).await;
    db.close().await;

    // Reopening runs the migrator again against the existing table
    let db = Database::new(DbConfig::new(&path)).await.unwrap();
    assert_eq!(db.migration_status().await.unwrap(), (2, 2));

    let record = db.payments().get_by_id(id).await.unwrap().expect("row survived");
    assert_eq!(record.payer_name, "Jane Doe");
    assert_eq!(record.status, PaymentStatus::Verified);
    db.close().await;

    cleanup(&path);
}
