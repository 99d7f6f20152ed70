//! Laptop History - part-replacement dashboard for a laptop fleet
//!
//! Reads an asset workbook with a `Laptop Data` sheet (one row per laptop)
//! and a `Part Replacement` sheet (one row per repair), joins every
//! replacement to its laptop by user, and derives the dashboard views:
//! per-part counts, yearly and monthly trends, per-user totals, hardware
//! distributions and a user × part heatmap.
//!
//! # Example
//!
//! ```no_run
//! use laptop_history::core::{Dashboard, ReplacementFilter};
//!
//! let filter = ReplacementFilter::from_selections(Some("2023"), None, Some("all"))?;
//! let view = Dashboard::load("data/Laptop_Riwayat.xlsx", &filter)?;
//!
//! println!("Rows: {}", view.records.len());
//! for entry in &view.part_frequency {
//!     println!("{}: {}", entry.key, entry.count);
//! }
//! # Ok::<(), laptop_history::error::HistoryError>(())
//! ```

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod export;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{HistoryError, HistoryResult, LoadError};
pub use types::{AssetRecord, CellValue, EnrichedRecord, RawTables, ReplacementRecord};
