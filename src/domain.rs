//! Domain module - product records, id ranges and the synthetic row fields
//!
//! Nothing in here touches the network or the database.

pub mod enrichment;
pub mod id_range;
pub mod product;
pub mod source;

pub use enrichment::ProductEnricher;
pub use id_range::{ProductIdRange, RangeError};
pub use product::{NewProduct, ProductRecord, StoredProduct};
pub use source::{FetchError, FetchOutcome, ProductSource};
