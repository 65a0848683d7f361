//! Where product records come from
//!
//! A source turns an id range into one [`FetchOutcome`] per id. Per-id
//! failures are values here, not errors: the caller logs them and moves on.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use super::id_range::ProductIdRange;
use super::product::ProductRecord;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FetchError {
    #[error("Failed to fetch data for product ID {id}. Status code: {status}")]
    Status { id: u32, status: u16 },

    #[error("Failed to parse JSON response for product ID {id} (status {status}): {message}")]
    Decode { id: u32, status: u16, message: String },

    #[error("Network error for product ID {id}: {message}")]
    Network { id: u32, message: String },

    #[error("Request for product ID {id} timed out after {timeout_seconds}s")]
    Timeout { id: u32, timeout_seconds: u64 },
}

impl FetchError {
    #[must_use]
    pub const fn product_id(&self) -> u32 {
        match self {
            Self::Status { id, .. }
            | Self::Decode { id, .. }
            | Self::Network { id, .. }
            | Self::Timeout { id, .. } => *id,
        }
    }

    /// True when the service never answered, as opposed to answering badly
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }
}

/// Result of fetching a single product id
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Fetched(ProductRecord),
    Skipped(FetchError),
}

impl FetchOutcome {
    #[must_use]
    pub const fn record(&self) -> Option<&ProductRecord> {
        match self {
            Self::Fetched(record) => Some(record),
            Self::Skipped(_) => None,
        }
    }

    #[must_use]
    pub fn into_record(self) -> Option<ProductRecord> {
        match self {
            Self::Fetched(record) => Some(record),
            Self::Skipped(_) => None,
        }
    }
}

#[async_trait]
pub trait ProductSource: Send + Sync {
    /// One outcome per id in `range`, in ascending id order
    async fn fetch_range(&self, range: ProductIdRange) -> Vec<FetchOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_names_id_and_code() {
        let err = FetchError::Status { id: 2, status: 404 };
        assert_eq!(
            err.to_string(),
            "Failed to fetch data for product ID 2. Status code: 404"
        );
        assert_eq!(err.product_id(), 2);
        assert!(!err.is_unreachable());
    }

    #[test]
    fn test_network_errors_are_unreachable() {
        assert!(FetchError::Network { id: 1, message: "refused".into() }.is_unreachable());
        assert!(FetchError::Timeout { id: 1, timeout_seconds: 5 }.is_unreachable());
    }
}
