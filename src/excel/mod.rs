//! Excel import/export
//!
//! - Import: workbook (.xlsx) → asset and replacement records
//! - Export: dashboard view → report workbook (.xlsx)

mod exporter;
mod importer;

pub use exporter::{serial_of, ReportExporter};
pub use importer::WorkbookLoader;
