//! Data transfer objects returned by the ingest use cases

use serde::Serialize;

use crate::domain::{FetchError, ProductIdRange};

/// Product id that produced no row, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedProduct {
    pub product_id: u32,
    pub reason: FetchError,
}

impl From<FetchError> for SkippedProduct {
    fn from(reason: FetchError) -> Self {
        Self {
            product_id: reason.product_id(),
            reason,
        }
    }
}

/// Summary of one ingest run
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub range: ProductIdRange,
    pub requested: usize,
    pub inserted: usize,
    pub skipped: Vec<SkippedProduct>,
}

impl IngestReport {
    /// Skips where the service could not be reached at all
    #[must_use]
    pub fn unreachable_count(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| s.reason.is_unreachable())
            .count()
    }

    #[must_use]
    pub fn skipped_ids(&self) -> Vec<u32> {
        self.skipped.iter().map(|s| s.product_id).collect()
    }
}
