//! CSV export of the filtered replacement history

use std::io::Write;
use std::path::Path;

use crate::error::{HistoryError, HistoryResult};
use crate::types::{
    EnrichedRecord, COL_BRAND, COL_MODEL, COL_NOTE, COL_PART, COL_REPLACED_ON, COL_USER,
};

/// Columns written to the export, in order
pub const CSV_COLUMNS: [&str; 6] = [
    COL_USER,
    COL_BRAND,
    COL_MODEL,
    COL_PART,
    COL_REPLACED_ON,
    COL_NOTE,
];

/// File name offered for downloads
pub const DEFAULT_CSV_NAME: &str = "riwayat_penggantian_part.csv";

fn csv_row(record: &EnrichedRecord) -> [String; 6] {
    [
        record.user.clone(),
        record.brand.clone().unwrap_or_default(),
        record.model.clone().unwrap_or_default(),
        record.part.clone(),
        record
            .replaced_on
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        record.note.clone().unwrap_or_default(),
    ]
}

/// Write records as UTF-8 CSV. The header row is always written.
pub fn write_csv<W: Write>(records: &[EnrichedRecord], writer: W) -> HistoryResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_COLUMNS)?;
    for record in records {
        csv_writer.write_record(csv_row(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Serialize records to an in-memory CSV document
pub fn to_csv_bytes(records: &[EnrichedRecord]) -> HistoryResult<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(records, &mut buffer)?;
    Ok(buffer)
}

/// Write records to a CSV file at `path`
pub fn write_csv_file(records: &[EnrichedRecord], path: &Path) -> HistoryResult<()> {
    let file = std::fs::File::create(path).map_err(|e| {
        HistoryError::Export(format!("Failed to create {}: {}", path.display(), e))
    })?;
    write_csv(records, file)
}
