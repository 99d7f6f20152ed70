//! One full dashboard render: load → enrich → filter → aggregate → describe charts

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use super::aggregate::{
    self, AssetDistributions, CountEntry, PivotMatrix, YearCount,
};
use super::charts::{self, ChartSpec};
use super::filter::{FilterOptions, ReplacementFilter};
use super::pipeline::{self, EnrichedDataset, EnrichmentReport};
use crate::error::HistoryResult;
use crate::excel::WorkbookLoader;
use crate::types::{AssetRecord, EnrichedRecord, RawTables};

/// Everything the presentation layer needs for one view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub filter: ReplacementFilter,
    pub options: FilterOptions,
    pub report: EnrichmentReport,
    /// Enriched rows before filtering
    pub total_records: usize,
    /// Laptop inventory table
    pub assets: Vec<AssetRecord>,
    /// Filtered, de-duplicated replacement history
    pub records: Vec<EnrichedRecord>,
    pub part_frequency: Vec<CountEntry>,
    pub yearly_trend: Vec<YearCount>,
    pub monthly_trend: Vec<CountEntry>,
    pub user_counts: Vec<CountEntry>,
    pub distributions: AssetDistributions,
    pub pivot: PivotMatrix,
    pub charts: Vec<ChartSpec>,
}

impl Dashboard {
    /// Build a view from already-loaded data
    pub fn build(
        assets: &[AssetRecord],
        dataset: &EnrichedDataset,
        filter: &ReplacementFilter,
    ) -> Self {
        let records = filter.apply(&dataset.records);
        debug!(
            total = dataset.records.len(),
            filtered = records.len(),
            ?filter,
            "applied filters"
        );

        let part_frequency = aggregate::part_frequency(&records);
        let yearly_trend = aggregate::yearly_trend(&records);
        let monthly_trend = aggregate::monthly_trend(&records);
        let user_counts = aggregate::user_counts(&records);
        let distributions = AssetDistributions::from_assets(assets);
        let pivot = PivotMatrix::from_records(&records);

        let charts = vec![
            charts::timeline(&records),
            charts::part_bar(&part_frequency),
            charts::yearly_line(&yearly_trend),
            charts::pie("Distribusi CPU", &distributions.cpu),
            charts::pie("Distribusi RAM", &distributions.ram),
            charts::pie("Distribusi Merek Laptop", &distributions.brand),
            charts::pie("Distribusi Tahun Rilis Laptop", &distributions.release_year),
            charts::pie("Distribusi Penggantian Part per User", &user_counts),
            charts::heatmap(&pivot),
        ];

        Self {
            filter: filter.clone(),
            options: FilterOptions::from_records(&dataset.records),
            report: dataset.report.clone(),
            total_records: dataset.records.len(),
            assets: assets.to_vec(),
            records,
            part_frequency,
            yearly_trend,
            monthly_trend,
            user_counts,
            distributions,
            pivot,
            charts,
        }
    }

    /// Build a view from raw tables
    pub fn from_tables(tables: &RawTables, filter: &ReplacementFilter) -> Self {
        let dataset = pipeline::enrich(tables);
        Self::build(&tables.assets, &dataset, filter)
    }

    /// Re-read the workbook and build a fresh view
    pub fn load<P: AsRef<Path>>(workbook: P, filter: &ReplacementFilter) -> HistoryResult<Self> {
        let tables = WorkbookLoader::new(workbook).load()?;
        Ok(Self::from_tables(&tables, filter))
    }
}
