//! Spreadsheet loader - workbook (.xlsx/.xls/.ods) → asset and replacement records

use crate::core::dates;
use crate::error::LoadError;
use crate::types::{
    AssetRecord, CellValue, RawTables, ReplacementRecord, COL_BRAND, COL_CPU, COL_MODEL, COL_NOTE,
    COL_PART, COL_RAM, COL_RELEASE, COL_REPLACED_ON, COL_USER, SHEET_ASSETS, SHEET_REPLACEMENTS,
};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Reads the "Laptop Data" and "Part Replacement" sheets of one workbook
pub struct WorkbookLoader {
    path: PathBuf,
}

impl WorkbookLoader {
    /// Create a new loader for the workbook at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load both sheets. Any failure is fatal; no partial tables are returned.
    pub fn load(&self) -> Result<RawTables, LoadError> {
        let display = self.path.display().to_string();

        if !self.path.exists() {
            return Err(LoadError::Open {
                path: display,
                message: "file not found".to_string(),
            });
        }

        let mut workbook = open_workbook_auto(&self.path).map_err(|e| LoadError::Open {
            path: display.clone(),
            message: e.to_string(),
        })?;

        let sheet_names = workbook.sheet_names();
        for required in [SHEET_ASSETS, SHEET_REPLACEMENTS] {
            if !sheet_names.iter().any(|name| name == required) {
                return Err(LoadError::MissingSheet {
                    path: display,
                    sheet: required.to_string(),
                });
            }
        }

        let assets_range = workbook
            .worksheet_range(SHEET_ASSETS)
            .map_err(|e| LoadError::Sheet {
                sheet: SHEET_ASSETS.to_string(),
                message: e.to_string(),
            })?;
        let replacements_range =
            workbook
                .worksheet_range(SHEET_REPLACEMENTS)
                .map_err(|e| LoadError::Sheet {
                    sheet: SHEET_REPLACEMENTS.to_string(),
                    message: e.to_string(),
                })?;

        let assets = read_assets(&SheetTable::from_range(SHEET_ASSETS, &assets_range))?;
        let replacements =
            read_replacements(&SheetTable::from_range(SHEET_REPLACEMENTS, &replacements_range))?;

        info!(
            workbook = %self.path.display(),
            assets = assets.len(),
            replacements = replacements.len(),
            "loaded workbook"
        );

        Ok(RawTables {
            assets,
            replacements,
        })
    }
}

/// A worksheet split into its header row and data rows
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SheetTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetTable {
    pub(crate) fn from_range(name: &str, range: &Range<Data>) -> Self {
        let mut rows = range.rows();

        let headers = rows
            .next()
            .map(|header| {
                header
                    .iter()
                    .enumerate()
                    .map(|(idx, cell)| match cell {
                        Data::Empty => format!("col_{}", idx),
                        other => other.to_string().trim().to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let rows: Vec<Vec<CellValue>> = rows
            .map(|row| row.iter().map(convert_cell).collect::<Vec<_>>())
            .filter(|row| !row.iter().all(CellValue::is_empty))
            .collect();

        debug!(sheet = name, columns = ?headers, rows = rows.len(), "read sheet");

        Self {
            name: name.to_string(),
            headers,
            rows,
        }
    }

    fn column_index(&self) -> HashMap<&str, usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.as_str(), idx))
            .collect()
    }

    fn require(&self, index: &HashMap<&str, usize>, column: &str) -> Result<usize, LoadError> {
        index
            .get(column)
            .copied()
            .ok_or_else(|| LoadError::MissingColumn {
                sheet: self.name.clone(),
                column: column.to_string(),
            })
    }
}

/// Convert a calamine cell into a [`CellValue`]
pub(crate) fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dates::from_serial(dt.as_f64()) {
            Some(date) => CellValue::Date(date),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => match dates::parse_iso(s.get(..10).unwrap_or(s.as_str())) {
            Some(date) => CellValue::Date(date),
            None => CellValue::Text(s.clone()),
        },
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

fn cell_at(row: &[CellValue], idx: Option<usize>) -> CellValue {
    idx.and_then(|i| row.get(i)).cloned().unwrap_or_default()
}

fn text_at(row: &[CellValue], idx: Option<usize>) -> Option<String> {
    cell_at(row, idx).label()
}

fn read_assets(table: &SheetTable) -> Result<Vec<AssetRecord>, LoadError> {
    let index = table.column_index();
    let user = table.require(&index, COL_USER)?;
    let brand = index.get(COL_BRAND).copied();
    let model = index.get(COL_MODEL).copied();
    let cpu = index.get(COL_CPU).copied();
    let ram = index.get(COL_RAM).copied();
    let release = index.get(COL_RELEASE).copied();

    Ok(table
        .rows
        .iter()
        .map(|row| AssetRecord {
            user: text_at(row, Some(user)).unwrap_or_default(),
            brand: text_at(row, brand),
            model: text_at(row, model),
            cpu: text_at(row, cpu),
            ram: text_at(row, ram),
            release_date: cell_at(row, release),
        })
        .collect())
}

fn read_replacements(table: &SheetTable) -> Result<Vec<ReplacementRecord>, LoadError> {
    let index = table.column_index();
    let user = table.require(&index, COL_USER)?;
    let part = index.get(COL_PART).copied();
    let replaced_on = index.get(COL_REPLACED_ON).copied();
    let note = index.get(COL_NOTE).copied();

    Ok(table
        .rows
        .iter()
        .map(|row| ReplacementRecord {
            user: text_at(row, Some(user)).unwrap_or_default(),
            part: text_at(row, part).unwrap_or_default(),
            replaced_on: cell_at(row, replaced_on),
            note: text_at(row, note),
        })
        .collect())
}
