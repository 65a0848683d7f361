use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Product as returned by the remote catalogue API
///
/// Only the fields that end up in the `products` table are required; anything
/// else the API sends is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Catalogue id. Not persisted, the local table assigns its own key.
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    pub category: String,
    pub price: f64,
    pub description: String,
}

/// Row ready to be inserted into the `products` table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProduct {
    pub title: String,
    pub category: String,
    pub price: f64,
    pub description: String,
    pub date_added: NaiveDateTime,
    pub total_cost: f64,
}

/// Row read back from the `products` table
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct StoredProduct {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub price: f64,
    pub description: String,
    pub date_added: NaiveDateTime,
    pub total_cost: f64,
}

impl StoredProduct {
    /// Integer multiplier that was applied to `price`, if the row is consistent
    #[must_use]
    pub fn cost_multiplier(&self) -> Option<u32> {
        if self.price == 0.0 {
            return None;
        }
        let ratio = (self.total_cost / self.price).round();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let multiplier = ratio as u32;
        ((1..=10).contains(&multiplier)).then_some(multiplier)
    }
}
