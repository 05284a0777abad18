//! # Seed Data Generator
//!
//! Populates the database with sample zakat payments for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 payments (default)
//! cargo run -p zakat-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p zakat-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p zakat-db --bin seed -- --db ./data/zakat.db
//! ```
//!
//! ## Generated Payments
//! Every payment goes through `PaymentRepository::add`, so the seed data
//! obeys the same validation rules as real input. Afterwards roughly two in
//! three payments are verified and one in ten rejected, so totals and
//! statistics have something to show.

use chrono::{Duration, NaiveDate};
use std::env;
use tracing_subscriber::EnvFilter;
use zakat_core::{Money, NewPayment, ZakatCategory};
use zakat_db::{Database, DbConfig};

const DEFAULT_COUNT: usize = 200;

const FIRST_NAMES: &[&str] = &[
    "Ahmad", "Siti", "Budi", "Dewi", "Hasan", "Nur", "Rizky", "Aisyah", "Fajar", "Putri",
    "Yusuf", "Fatimah", "Agus", "Intan", "Ilham", "Zahra",
];

const LAST_NAMES: &[&str] = &[
    "Santoso", "Rahman", "Wijaya", "Hidayat", "Saputra", "Lestari", "Nasution", "Kurniawan",
    "Pratama", "Maulana",
];

const CITIES: &[&str] = &[
    "Jakarta", "Bandung", "Surabaya", "Medan", "Yogyakarta", "Makassar", "Semarang", "Padang",
];

const METHODS: &[&str] = &["Tunai", "Transfer Bank", "QRIS", "E-Wallet"];

/// Typical amount range per category, in whole rupiah.
fn amount_range(category: ZakatCategory) -> (i64, i64) {
    match category {
        ZakatCategory::Fitrah => (35_000, 50_000),
        ZakatCategory::Maal => (500_000, 25_000_000),
        ZakatCategory::Infaq => (10_000, 1_000_000),
        ZakatCategory::Fidyah => (45_000, 1_350_000),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut config = DbConfig::from_env()?;
    let mut count = DEFAULT_COUNT;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(DEFAULT_COUNT);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Zakat Ledger Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!(
                    "  -c, --count <N>    Number of payments to generate (default: {})",
                    DEFAULT_COUNT
                );
                println!("  -d, --db <PATH>    Database file path (default: $ZAKAT_DB_PATH or ./zakat.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Zakat Ledger Seed Data Generator");
    println!("===================================");
    println!("Database: {}", config.database_path.display());
    println!("Payments: {}", count);
    println!();

    let db = Database::new(config).await?;
    let payments = db.payments();

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = payments.count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} payments", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        db.close().await;
        return Ok(());
    }

    println!();
    println!("Generating payments...");

    let start = std::time::Instant::now();
    let mut generated = 0;
    let mut verified = 0;
    let mut rejected = 0;

    for seed in 0..count {
        let payment = generate_payment(seed);

        let id = match payments.add(&payment).await {
            Ok(id) => id,
            Err(e) => {
                eprintln!("Failed to insert {}: {}", payment.payer_name, e);
                continue;
            }
        };
        generated += 1;

        let status = match seed % 10 {
            0 => Some("rejected"),
            1..=6 => Some("verified"),
            _ => None,
        };
        if let Some(status) = status {
            payments.update_status(id, status).await?;
            if status == "verified" {
                verified += 1;
            } else {
                rejected += 1;
            }
        }

        if generated % 50 == 0 {
            println!("  Generated {} payments...", generated);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} payments in {:?}", generated, elapsed);
    println!("  Verified: {}, rejected: {}", verified, rejected);

    println!();
    println!("Total verified: Rp {}", payments.total_verified().await?);
    println!();
    println!("{:<8} {:>6} {:>18} {:>16}", "Jenis", "Jumlah", "Total", "Rata-rata");
    for stats in payments.statistics().await? {
        println!(
            "{:<8} {:>6} {:>18} {:>16}",
            stats.category.to_string(),
            stats.payer_count,
            stats.total.to_string(),
            stats.average.to_string()
        );
    }

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Installs the fmt subscriber. `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,zakat=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Generates one payment with realistic, deterministic data.
fn generate_payment(seed: usize) -> NewPayment {
    let first = FIRST_NAMES[seed % FIRST_NAMES.len()];
    let last = LAST_NAMES[(seed / FIRST_NAMES.len()) % LAST_NAMES.len()];
    let name = format!("{} {}", first, last);

    let category = ZakatCategory::ALL[(seed * 7) % ZakatCategory::ALL.len()];
    let (low, high) = amount_range(category);
    let rupiah = low + ((seed as i64 * 7_919) % (high - low + 1));
    let amount = Money::from_major_minor(rupiah, 0);

    // Spread payments over the last year
    let base = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default();
    let date = base + Duration::days((seed * 37 % 365) as i64);

    let phone = format!("08{:010}", 1_200_000_000 + (seed as u64 * 104_729) % 8_800_000_000);

    let mut payment = NewPayment::new(
        name,
        phone,
        category.as_str(),
        amount,
        date.format("%Y-%m-%d").to_string(),
    )
    .with_payment_method(METHODS[seed % METHODS.len()]);

    // About one in five payers leaves no address
    if seed % 5 != 0 {
        payment = payment.with_address(format!(
            "Jl. Merdeka No. {}, {}",
            seed % 200 + 1,
            CITIES[seed % CITIES.len()]
        ));
    }

    payment
}
