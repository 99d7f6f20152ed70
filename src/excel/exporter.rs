//! Report exporter - dashboard view → Excel (.xlsx)

use crate::core::dates;
use crate::core::aggregate::CountEntry;
use crate::core::Dashboard;
use crate::error::{HistoryError, HistoryResult};
use crate::types::{
    COL_BRAND, COL_CPU, COL_MODEL, COL_MONTH, COL_NOTE, COL_PART, COL_RAM, COL_RELEASE,
    COL_REPLACED_ON, COL_USER, COL_YEAR,
};
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;

const HISTORY_COLUMNS: [&str; 11] = [
    COL_USER,
    COL_BRAND,
    COL_MODEL,
    COL_CPU,
    COL_RAM,
    COL_RELEASE,
    COL_PART,
    COL_REPLACED_ON,
    COL_NOTE,
    COL_YEAR,
    COL_MONTH,
];

fn xlsx_err(context: &str) -> impl Fn(XlsxError) -> HistoryError + '_ {
    move |e| HistoryError::Export(format!("{}: {}", context, e))
}

/// Writes one dashboard view to a workbook: the filtered history plus one
/// sheet per aggregation
pub struct ReportExporter<'a> {
    dashboard: &'a Dashboard,
}

impl<'a> ReportExporter<'a> {
    pub fn new(dashboard: &'a Dashboard) -> Self {
        Self { dashboard }
    }

    /// Export the view to an Excel .xlsx file
    pub fn export(&self, output_path: &Path) -> HistoryResult<()> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");

        self.export_history(&mut workbook, &header, &date_format)?;
        Self::export_counts(
            &mut workbook,
            "Part",
            (COL_PART, "Jumlah"),
            &self.dashboard.part_frequency,
            &header,
        )?;
        let years: Vec<CountEntry> = self
            .dashboard
            .yearly_trend
            .iter()
            .map(|y| CountEntry::new(y.year.to_string(), y.count))
            .collect();
        Self::export_counts(&mut workbook, "Tahun", (COL_YEAR, "Jumlah"), &years, &header)?;
        Self::export_counts(
            &mut workbook,
            "User",
            (COL_USER, "Total"),
            &self.dashboard.user_counts,
            &header,
        )?;
        self.export_heatmap(&mut workbook, &header)?;

        workbook
            .save(output_path)
            .map_err(xlsx_err("Failed to save Excel file"))?;

        Ok(())
    }

    fn named_sheet<'w>(workbook: &'w mut Workbook, name: &str) -> HistoryResult<&'w mut Worksheet> {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(name)
            .map_err(xlsx_err("Failed to set worksheet name"))?;
        Ok(worksheet)
    }

    fn export_history(
        &self,
        workbook: &mut Workbook,
        header: &Format,
        date_format: &Format,
    ) -> HistoryResult<()> {
        let worksheet = Self::named_sheet(workbook, "Riwayat")?;
        let err = xlsx_err("Failed to write history row");

        for (col, name) in HISTORY_COLUMNS.iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, *name, header)
                .map_err(&err)?;
        }

        for (idx, record) in self.dashboard.records.iter().enumerate() {
            let row = (idx + 1) as u32;
            let texts = [
                (0u16, Some(record.user.as_str())),
                (1, record.brand.as_deref()),
                (2, record.model.as_deref()),
                (3, record.cpu.as_deref()),
                (4, record.ram.as_deref()),
                (6, Some(record.part.as_str())),
                (8, record.note.as_deref()),
                (10, record.month.as_deref()),
            ];
            for (col, value) in texts {
                if let Some(value) = value {
                    worksheet.write_string(row, col, value).map_err(&err)?;
                }
            }
            if let Some(release) = record.release_date.label() {
                worksheet.write_string(row, 5, release).map_err(&err)?;
            }
            if let Some(date) = record.replaced_on {
                worksheet
                    .write_number_with_format(row, 7, serial_of(date), date_format)
                    .map_err(&err)?;
            }
            if let Some(year) = record.year {
                worksheet
                    .write_number(row, 9, f64::from(year))
                    .map_err(&err)?;
            }
        }

        Ok(())
    }

    fn export_counts(
        workbook: &mut Workbook,
        sheet: &str,
        (key_header, count_header): (&str, &str),
        entries: &[CountEntry],
        header: &Format,
    ) -> HistoryResult<()> {
        let worksheet = Self::named_sheet(workbook, sheet)?;
        let err = xlsx_err("Failed to write count row");

        worksheet
            .write_string_with_format(0, 0, key_header, header)
            .map_err(&err)?;
        worksheet
            .write_string_with_format(0, 1, count_header, header)
            .map_err(&err)?;
        for (idx, entry) in entries.iter().enumerate() {
            let row = (idx + 1) as u32;
            worksheet.write_string(row, 0, &entry.key).map_err(&err)?;
            worksheet
                .write_number(row, 1, entry.count as f64)
                .map_err(&err)?;
        }
        Ok(())
    }

    fn export_heatmap(&self, workbook: &mut Workbook, header: &Format) -> HistoryResult<()> {
        let pivot = &self.dashboard.pivot;
        let worksheet = Self::named_sheet(workbook, "Heatmap")?;
        let err = xlsx_err("Failed to write heatmap cell");

        worksheet
            .write_string_with_format(0, 0, COL_USER, header)
            .map_err(&err)?;
        for (col, part) in pivot.parts.iter().enumerate() {
            worksheet
                .write_string_with_format(0, (col + 1) as u16, part, header)
                .map_err(&err)?;
        }
        for (row_idx, user) in pivot.users.iter().enumerate() {
            let row = (row_idx + 1) as u32;
            worksheet.write_string(row, 0, user).map_err(&err)?;
            for (col, count) in pivot.cells[row_idx].iter().enumerate() {
                worksheet
                    .write_number(row, (col + 1) as u16, *count as f64)
                    .map_err(&err)?;
            }
        }
        Ok(())
    }
}

/// Spreadsheet serial number of a calendar date
pub fn serial_of(date: NaiveDate) -> f64 {
    (date - dates::serial_epoch()).num_days() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_of_round_trips_with_loader_convention() {
        let date = NaiveDate::from_ymd_opt(2021, 10, 31).unwrap();
        assert_eq!(serial_of(date), 44500.0);
        assert_eq!(dates::from_serial(serial_of(date)), Some(date));
    }
}
