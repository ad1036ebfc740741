//! # Seed Data Loader
//!
//! Writes the April 2025 demo history into a SQLite database for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./uriage_dev.db (default)
//! cargo run -p uriage-db --bin seed
//!
//! # Specify database path
//! cargo run -p uriage-db --bin seed -- --db ./data/uriage.db
//! ```
//!
//! Does nothing when the database already holds records.

use std::env;
use uriage_core::aggregation::sales_totals;
use uriage_core::demo::demo_sales_history;
use uriage_core::validation::validate_record;
use uriage_db::{Database, DbConfig, SalesStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./uriage_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Uriage Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./uriage_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Uriage Seed Data Loader");
    println!("==========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let store = db.sales();

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = store.count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} sales records", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let history = demo_sales_history();
    for record in &history {
        validate_record(record)?;
        store.append(record).await?;
        println!("  {} {} {}", record.date, record.recorder, record.total);
    }

    let stored = store.list().await?;
    let totals = sales_totals(&stored);

    println!();
    println!(
        "✓ Seeded {} records, total sales {}",
        totals.record_count, totals.total_sales
    );

    db.close().await;
    Ok(())
}
