use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

//==============================================================================
// Workbook layout
//==============================================================================

/// Sheet holding one laptop per user
pub const SHEET_ASSETS: &str = "Laptop Data";
/// Sheet holding one row per part replacement event
pub const SHEET_REPLACEMENTS: &str = "Part Replacement";

pub const COL_USER: &str = "User";
pub const COL_BRAND: &str = "Merk";
pub const COL_MODEL: &str = "Model";
pub const COL_CPU: &str = "CPU";
pub const COL_RAM: &str = "RAM";
pub const COL_RELEASE: &str = "Product Release Date";
pub const COL_PART: &str = "Part";
pub const COL_REPLACED_ON: &str = "Tanggal Ganti";
pub const COL_NOTE: &str = "Keterangan";
pub const COL_YEAR: &str = "Tahun";
pub const COL_MONTH: &str = "Bulan";

//==============================================================================
// Cell values
//==============================================================================

/// A single spreadsheet cell as read from the workbook.
///
/// Date-formatted cells arrive as `Date`; everything else keeps the type the
/// workbook stored, so the date normalizer can tell serial numbers from text.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Display label used for grouping and export; `None` for empty cells
    pub fn label(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Number(n) => Some(format_number(*n)),
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
            CellValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label().unwrap_or_default())
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Empty => serializer.serialize_none(),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                serializer.serialize_i64(*n as i64)
            }
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Date(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
        }
    }
}

/// Format a number for display, dropping a trailing `.0` on whole values
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

//==============================================================================
// Source records
//==============================================================================

/// One row of the "Laptop Data" sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetRecord {
    #[serde(rename = "User")]
    pub user: String,
    #[serde(rename = "Merk")]
    pub brand: Option<String>,
    #[serde(rename = "Model")]
    pub model: Option<String>,
    #[serde(rename = "CPU")]
    pub cpu: Option<String>,
    #[serde(rename = "RAM")]
    pub ram: Option<String>,
    #[serde(rename = "Product Release Date")]
    pub release_date: CellValue,
}

impl AssetRecord {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            brand: None,
            model: None,
            cpu: None,
            ram: None,
            release_date: CellValue::Empty,
        }
    }
}

/// One row of the "Part Replacement" sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplacementRecord {
    #[serde(rename = "User")]
    pub user: String,
    #[serde(rename = "Part")]
    pub part: String,
    /// Raw replacement date: a serial number, a text date, or a date cell
    #[serde(rename = "Tanggal Ganti")]
    pub replaced_on: CellValue,
    #[serde(rename = "Keterangan")]
    pub note: Option<String>,
}

impl ReplacementRecord {
    pub fn new(user: impl Into<String>, part: impl Into<String>, replaced_on: CellValue) -> Self {
        Self {
            user: user.into(),
            part: part.into(),
            replaced_on,
            note: None,
        }
    }
}

/// Both sheets of one workbook snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawTables {
    pub assets: Vec<AssetRecord>,
    pub replacements: Vec<ReplacementRecord>,
}

//==============================================================================
// Enriched records
//==============================================================================

/// A replacement event joined with its user's laptop, plus derived date fields.
///
/// Asset attributes are `None` when no laptop row exists for the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    #[serde(rename = "User")]
    pub user: String,
    #[serde(rename = "Part")]
    pub part: String,
    #[serde(rename = "Tanggal Ganti")]
    pub replaced_on: Option<NaiveDate>,
    #[serde(rename = "Keterangan")]
    pub note: Option<String>,
    #[serde(rename = "Merk")]
    pub brand: Option<String>,
    #[serde(rename = "Model")]
    pub model: Option<String>,
    #[serde(rename = "CPU")]
    pub cpu: Option<String>,
    #[serde(rename = "RAM")]
    pub ram: Option<String>,
    #[serde(rename = "Product Release Date")]
    pub release_date: CellValue,
    #[serde(rename = "Tahun")]
    pub year: Option<i32>,
    #[serde(rename = "Bulan")]
    pub month: Option<String>,
}

impl EnrichedRecord {
    /// Every column rendered to its display form; two records with equal keys
    /// are exact duplicates.
    pub fn row_key(&self) -> Vec<Option<String>> {
        vec![
            Some(self.user.clone()),
            Some(self.part.clone()),
            self.replaced_on.map(|d| d.format("%Y-%m-%d").to_string()),
            self.note.clone(),
            self.brand.clone(),
            self.model.clone(),
            self.cpu.clone(),
            self.ram.clone(),
            self.release_date.label(),
            self.year.map(|y| y.to_string()),
            self.month.clone(),
        ]
    }
}
