//! Synthetic fields added to every fetched product before it is stored
//!
//! `date_added` is backdated by a random number of whole days and
//! `total_cost` is the price times a random integer multiplier. The random
//! source is owned by the enricher so a seed makes a run reproducible.

use chrono::{Duration, NaiveDateTime};
use std::ops::RangeInclusive;

use super::product::{NewProduct, ProductRecord};

/// Days subtracted from "now" to build `date_added`
pub const BACKDATE_DAYS: RangeInclusive<i64> = 1..=365;

/// Integer factor applied to `price` to build `total_cost`
pub const COST_MULTIPLIER: RangeInclusive<u32> = 1..=10;

pub struct ProductEnricher {
    rng: fastrand::Rng,
}

impl ProductEnricher {
    /// Enricher seeded from system entropy
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    /// Deterministic enricher, same seed gives the same sequence of rows
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Build from an optional configured seed
    #[must_use]
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::with_seed)
    }

    /// Turn a fetched record into a row, using `now` as the reference time
    pub fn enrich(&mut self, record: ProductRecord, now: NaiveDateTime) -> NewProduct {
        let days_back = self.rng.i64(BACKDATE_DAYS);
        let multiplier = self.rng.u32(COST_MULTIPLIER);

        NewProduct {
            total_cost: record.price * f64::from(multiplier),
            date_added: now - Duration::days(days_back),
            title: record.title,
            category: record.category,
            price: record.price,
            description: record.description,
        }
    }
}

impl Default for ProductEnricher {
    fn default() -> Self {
        Self::new()
    }
}
