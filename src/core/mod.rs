//! Reporting pipeline: date normalization, join, filters, aggregations, charts

pub mod aggregate;
pub mod charts;
pub mod dashboard;
pub mod dates;
pub mod filter;
pub mod pipeline;

pub use dashboard::Dashboard;
pub use filter::{FilterOptions, ReplacementFilter};
pub use pipeline::{enrich, EnrichedDataset, EnrichmentReport};
