//! Product Ingest - fetch catalogue products over an id range into SQLite
//!
//! Three stages run in order: the `products` table is recreated, every id in
//! the requested range is fetched concurrently from the catalogue API, and the
//! fetched products are stored with a synthetic `date_added` and `total_cost`.

pub mod application;
pub mod domain;
pub mod infrastructure;

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::info;

pub use application::{IngestReport, ProductIngestor};
pub use domain::{ProductEnricher, ProductIdRange};
pub use infrastructure::{AppConfig, DatabaseConnection, ProductApiClient, ProductRepository};

/// Full interactive run: recreate the table, prompt for the range, ingest
pub async fn run<R: BufRead, W: Write>(
    config: &AppConfig,
    input: &mut R,
    output: &mut W,
) -> Result<IngestReport> {
    let db = DatabaseConnection::open_file(&config.database.path).await?;
    let repository = ProductRepository::new(db.pool().clone());
    let client = ProductApiClient::from_api_config(&config.api)?;
    let mut ingestor = ProductIngestor::new(
        Arc::new(client),
        repository,
        ProductEnricher::from_seed(config.ingest.random_seed),
    );

    ingestor.prepare().await?;
    info!("Database ready at {}", config.database.path.display());

    let (start, end) = infrastructure::console::read_id_bounds(input, output)?;
    let range = ProductIdRange::new(start, end).context("Invalid product ID range")?;

    let report = ingestor.ingest(range).await?;
    db.close().await;
    Ok(report)
}
