//! Ingest use case: recreate the table, fetch a range, store what came back

use anyhow::Result;
use chrono::Local;
use std::sync::Arc;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::application::dto::{IngestReport, SkippedProduct};
use crate::domain::{FetchOutcome, NewProduct, ProductEnricher, ProductIdRange, ProductSource};
use crate::infrastructure::ProductRepository;

pub struct ProductIngestor {
    source: Arc<dyn ProductSource>,
    repository: ProductRepository,
    enricher: ProductEnricher,
}

impl ProductIngestor {
    pub fn new(
        source: Arc<dyn ProductSource>,
        repository: ProductRepository,
        enricher: ProductEnricher,
    ) -> Self {
        Self {
            source,
            repository,
            enricher,
        }
    }

    /// Drop and recreate the products table
    pub async fn prepare(&self) -> Result<()> {
        self.repository.recreate_schema().await
    }

    /// Fetch every id of `range` and insert the fetched products
    ///
    /// Per-id fetch failures are skipped. Storage failures abort the run and
    /// nothing from this run is kept.
    pub async fn ingest(&mut self, range: ProductIdRange) -> Result<IngestReport> {
        let span = info_span!("ingest", run_id = %Uuid::new_v4(), range = %range);
        self.ingest_inner(range).instrument(span).await
    }

    /// `prepare` followed by `ingest`
    pub async fn run(&mut self, range: ProductIdRange) -> Result<IngestReport> {
        self.prepare().await?;
        self.ingest(range).await
    }

    async fn ingest_inner(&mut self, range: ProductIdRange) -> Result<IngestReport> {
        let outcomes = self.source.fetch_range(range).await;
        let (rows, skipped) = self.split_outcomes(outcomes);

        let inserted = self.repository.insert_products(&rows).await?;

        let report = IngestReport {
            range,
            requested: range.len(),
            inserted,
            skipped,
        };

        info!(
            "Ingest finished: {} requested, {} inserted, {} skipped",
            report.requested,
            report.inserted,
            report.skipped.len()
        );
        if report.unreachable_count() > 0 {
            warn!(
                "{} product(s) skipped because the API could not be reached",
                report.unreachable_count()
            );
        }

        Ok(report)
    }

    fn split_outcomes(
        &mut self,
        outcomes: Vec<FetchOutcome>,
    ) -> (Vec<NewProduct>, Vec<SkippedProduct>) {
        let now = Local::now().naive_local();
        let mut rows = Vec::with_capacity(outcomes.len());
        let mut skipped = Vec::new();

        for outcome in outcomes {
            match outcome {
                FetchOutcome::Fetched(record) => rows.push(self.enricher.enrich(record, now)),
                FetchOutcome::Skipped(reason) => skipped.push(SkippedProduct::from(reason)),
            }
        }

        (rows, skipped)
    }
}
