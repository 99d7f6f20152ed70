//! Chart descriptions built from aggregated data.
//!
//! Nothing here draws anything: each function returns a serializable value that
//! a renderer (browser, notebook, terminal) turns into a figure.

use chrono::NaiveDate;
use serde::Serialize;

use super::aggregate::{CountEntry, PivotMatrix, YearCount};
use crate::types::EnrichedRecord;

/// Donut hole used by every pie chart
pub const PIE_HOLE: f64 = 0.3;
/// How far the first (largest) slice is pulled out
pub const PIE_PULL_FIRST: f64 = 0.05;

/// One replacement event on the timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub user: String,
    /// Colour group
    pub part: String,
    /// Marker symbol group
    pub brand: Option<String>,
    pub model: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Timeline {
        title: String,
        x_label: String,
        y_label: String,
        points: Vec<TimelinePoint>,
    },
    Bar {
        title: String,
        x_label: String,
        y_label: String,
        bars: Vec<CountEntry>,
    },
    Line {
        title: String,
        x_label: String,
        y_label: String,
        points: Vec<YearCount>,
    },
    Pie {
        title: String,
        hole: f64,
        /// Pull offset per slice, same order as `slices`
        pull: Vec<f64>,
        slices: Vec<CountEntry>,
    },
    Heatmap {
        title: String,
        x_label: String,
        y_label: String,
        color_label: String,
        matrix: PivotMatrix,
    },
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Timeline { title, .. }
            | ChartSpec::Bar { title, .. }
            | ChartSpec::Line { title, .. }
            | ChartSpec::Pie { title, .. }
            | ChartSpec::Heatmap { title, .. } => title,
        }
    }
}

/// Scatter of replacement date × user. Records without a date are left out.
pub fn timeline(records: &[EnrichedRecord]) -> ChartSpec {
    let points = records
        .iter()
        .filter_map(|r| {
            r.replaced_on.map(|date| TimelinePoint {
                date,
                user: r.user.clone(),
                part: r.part.clone(),
                brand: r.brand.clone(),
                model: r.model.clone(),
                note: r.note.clone(),
            })
        })
        .collect();

    ChartSpec::Timeline {
        title: "Timeline Riwayat Penggantian Part".to_string(),
        x_label: "Tanggal Ganti".to_string(),
        y_label: "User".to_string(),
        points,
    }
}

pub fn part_bar(parts: &[CountEntry]) -> ChartSpec {
    ChartSpec::Bar {
        title: "Jumlah Penggantian per Jenis Part".to_string(),
        x_label: "Jenis Part".to_string(),
        y_label: "Jumlah".to_string(),
        bars: parts.to_vec(),
    }
}

pub fn yearly_line(years: &[YearCount]) -> ChartSpec {
    ChartSpec::Line {
        title: "Tren Penggantian Part per Tahun".to_string(),
        x_label: "Tahun".to_string(),
        y_label: "Jumlah Penggantian".to_string(),
        points: years.to_vec(),
    }
}

pub fn pie(title: &str, slices: &[CountEntry]) -> ChartSpec {
    let pull = (0..slices.len())
        .map(|i| if i == 0 { PIE_PULL_FIRST } else { 0.0 })
        .collect();

    ChartSpec::Pie {
        title: title.to_string(),
        hole: PIE_HOLE,
        pull,
        slices: slices.to_vec(),
    }
}

pub fn heatmap(matrix: &PivotMatrix) -> ChartSpec {
    ChartSpec::Heatmap {
        title: "Jumlah Penggantian Part per User".to_string(),
        x_label: "Jenis Part".to_string(),
        y_label: "User".to_string(),
        color_label: "Jumlah".to_string(),
        matrix: matrix.clone(),
    }
}
