// Standalone database smoke check
// Run with: DATABASE_URL=postgres://... cargo run --bin storepulse-dbcheck
//
// Connects with the same configuration as the server, prints server
// identity, verifies the four fact tables with row counts, then inserts one
// probe visitor row and reads it back by id. Exits nonzero on any failure.

use anyhow::{ensure, Context, Result};
use storepulse_storage::{CreateVisitor, Database};

const EXPECTED_TABLES: &[&str] = &["visitors", "cashier", "heatmap", "predictions"];

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL environment variable required")?;
    let db = Database::from_url(&database_url)
        .await
        .context("Failed to connect to database")?;

    let info = db.server_info().await.context("Failed to query server identity")?;
    println!("Server:   {}", info.version);
    println!("Database: {} (user: {})", info.database, info.username);

    let tables = db.available_tables().await.context("Failed to list tables")?;
    for expected in EXPECTED_TABLES {
        ensure!(
            tables.iter().any(|t| t == expected),
            "table '{}' is missing; apply migrations/0001_schema.sql first",
            expected
        );
    }
    println!("Tables:   all {} present", EXPECTED_TABLES.len());

    let counts = db.table_counts().await.context("Failed to count rows")?;
    println!("Rows:     visitors={} cashier={} heatmap={} predictions={}",
        counts.visitors_records,
        counts.cashier_records,
        counts.heatmap_records,
        counts.predictions_records,
    );

    // Probe write + read-back through the same paths the API reads
    let created = db
        .create_visitor(CreateVisitor {
            section: "dbcheck-probe".to_string(),
            count: 1,
            gender_distribution: None,
        })
        .await
        .context("Probe insert failed")?;
    let fetched = db
        .get_visitor(created.id)
        .await
        .context("Probe read-back failed")?
        .context("Probe row not found after insert")?;
    ensure!(
        fetched.section == "dbcheck-probe" && fetched.count == 1,
        "probe row came back altered (id {})",
        created.id
    );
    println!("Probe:    insert/read-back ok (id {})", created.id);

    println!("All checks passed");
    Ok(())
}
