//! Application layer module
//!
//! This module contains use cases and data transfer objects
//! that orchestrate the domain logic.

pub mod dto;
pub mod use_cases;

pub use dto::{IngestReport, SkippedProduct};
pub use use_cases::ProductIngestor;
