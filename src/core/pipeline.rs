//! Join & enrichment: replacement events left-joined onto laptops by user

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use super::dates;
use crate::types::{AssetRecord, EnrichedRecord, RawTables, ReplacementRecord};

/// Data-quality counters gathered while enriching
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentReport {
    /// Replacement rows in the source sheet
    pub replacements: usize,
    /// Replacement rows whose user has no laptop row
    pub orphaned: usize,
    /// Distinct users referenced by orphaned rows
    pub orphaned_users: Vec<String>,
    /// Replacement rows whose date could not be normalized
    pub unparsed_dates: usize,
    /// Users with more than one laptop row; only the first row is joined
    pub duplicate_asset_users: Vec<String>,
}

/// Enriched records plus the report describing how they were produced
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnrichedDataset {
    pub records: Vec<EnrichedRecord>,
    pub report: EnrichmentReport,
}

/// Index laptops by user. The first row wins so the join stays many-to-one.
fn index_assets(assets: &[AssetRecord]) -> (HashMap<&str, &AssetRecord>, Vec<String>) {
    let mut index: HashMap<&str, &AssetRecord> = HashMap::with_capacity(assets.len());
    let mut duplicates = Vec::new();

    for asset in assets {
        if index.contains_key(asset.user.as_str()) {
            if !duplicates.contains(&asset.user) {
                duplicates.push(asset.user.clone());
            }
        } else {
            index.insert(asset.user.as_str(), asset);
        }
    }

    (index, duplicates)
}

fn enrich_one(replacement: &ReplacementRecord, asset: Option<&AssetRecord>) -> EnrichedRecord {
    let replaced_on = dates::normalize(&replacement.replaced_on);

    EnrichedRecord {
        user: replacement.user.clone(),
        part: replacement.part.clone(),
        replaced_on,
        note: replacement.note.clone(),
        brand: asset.and_then(|a| a.brand.clone()),
        model: asset.and_then(|a| a.model.clone()),
        cpu: asset.and_then(|a| a.cpu.clone()),
        ram: asset.and_then(|a| a.ram.clone()),
        release_date: asset.map(|a| a.release_date.clone()).unwrap_or_default(),
        year: dates::year_of(replaced_on),
        month: dates::month_of(replaced_on),
    }
}

/// Join every replacement row to its user's laptop and derive Tahun/Bulan.
///
/// Produces exactly one record per replacement row, in source order.
pub fn enrich(tables: &RawTables) -> EnrichedDataset {
    let (index, duplicate_asset_users) = index_assets(&tables.assets);
    let mut report = EnrichmentReport {
        replacements: tables.replacements.len(),
        duplicate_asset_users,
        ..Default::default()
    };

    let records: Vec<EnrichedRecord> = tables
        .replacements
        .iter()
        .map(|replacement| {
            let asset = index.get(replacement.user.as_str()).copied();
            if asset.is_none() {
                report.orphaned += 1;
                if !report.orphaned_users.contains(&replacement.user) {
                    report.orphaned_users.push(replacement.user.clone());
                }
            }
            let record = enrich_one(replacement, asset);
            if record.replaced_on.is_none() {
                report.unparsed_dates += 1;
            }
            record
        })
        .collect();

    if !report.duplicate_asset_users.is_empty() {
        warn!(
            users = ?report.duplicate_asset_users,
            "users with more than one laptop row; joining the first"
        );
    }
    if report.orphaned > 0 {
        warn!(
            rows = report.orphaned,
            users = ?report.orphaned_users,
            "replacement rows without a matching laptop"
        );
    }
    if report.unparsed_dates > 0 {
        warn!(rows = report.unparsed_dates, "replacement dates that could not be parsed");
    }
    debug!(records = records.len(), "enriched replacement records");

    EnrichedDataset { records, report }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn asset(user: &str, brand: &str, cpu: &str) -> AssetRecord {
        let mut a = AssetRecord::new(user);
        a.brand = Some(brand.to_string());
        a.cpu = Some(cpu.to_string());
        a.ram = Some("8GB".to_string());
        a.release_date = CellValue::Number(2021.0);
        a
    }

    fn replacement(user: &str, part: &str, date: CellValue) -> ReplacementRecord {
        ReplacementRecord::new(user, part, date)
    }

    #[test]
    fn test_enrich_joins_and_derives_dates() {
        let tables = RawTables {
            assets: vec![asset("alice", "Dell", "i5")],
            replacements: vec![replacement("alice", "Battery", CellValue::Number(44500.0))],
        };

        let dataset = enrich(&tables);
        assert_eq!(dataset.records.len(), 1);

        let record = &dataset.records[0];
        assert_eq!(record.brand.as_deref(), Some("Dell"));
        assert_eq!(record.cpu.as_deref(), Some("i5"));
        assert_eq!(record.replaced_on, NaiveDate::from_ymd_opt(2021, 10, 31));
        assert_eq!(record.year, Some(2021));
        assert_eq!(record.month.as_deref(), Some("2021-10"));
        assert_eq!(dataset.report.orphaned, 0);
    }

    #[test]
    fn test_enrich_keeps_orphans_with_null_assets() {
        let tables = RawTables {
            assets: vec![asset("alice", "Dell", "i5")],
            replacements: vec![
                replacement("ghost", "Keyboard", CellValue::Text("2023-01-02".to_string())),
                replacement("ghost", "Fan", CellValue::Empty),
            ],
        };

        let dataset = enrich(&tables);
        assert_eq!(dataset.records.len(), 2);
        assert!(dataset.records.iter().all(|r| r.brand.is_none()));
        assert_eq!(dataset.records[0].release_date, CellValue::Empty);
        assert_eq!(dataset.report.orphaned, 2);
        assert_eq!(dataset.report.orphaned_users, vec!["ghost".to_string()]);
    }

    #[test]
    fn test_enrich_unparsed_dates_are_retained() {
        let tables = RawTables {
            assets: vec![asset("alice", "Dell", "i5")],
            replacements: vec![replacement(
                "alice",
                "SSD",
                CellValue::Text("15/06/2023".to_string()),
            )],
        };

        let dataset = enrich(&tables);
        assert_eq!(dataset.records.len(), 1);
        assert_eq!(dataset.records[0].year, None);
        assert_eq!(dataset.records[0].month, None);
        assert_eq!(dataset.report.unparsed_dates, 1);
    }

    #[test]
    fn test_enrich_never_multiplies_rows_on_duplicate_assets() {
        let tables = RawTables {
            assets: vec![asset("alice", "Dell", "i5"), asset("alice", "HP", "i7")],
            replacements: vec![
                replacement("alice", "Battery", CellValue::Number(45000.0)),
                replacement("alice", "RAM", CellValue::Number(45001.0)),
            ],
        };

        let dataset = enrich(&tables);
        assert_eq!(dataset.records.len(), tables.replacements.len());
        assert!(dataset
            .records
            .iter()
            .all(|r| r.brand.as_deref() == Some("Dell")));
        assert_eq!(dataset.report.duplicate_asset_users, vec!["alice".to_string()]);
    }

    #[test]
    fn test_enrich_is_idempotent() {
        let tables = RawTables {
            assets: vec![asset("alice", "Dell", "i5"), asset("bob", "Lenovo", "Ryzen 5")],
            replacements: vec![
                replacement("alice", "Battery", CellValue::Number(44500.0)),
                replacement("bob", "Screen", CellValue::Text("2022-04-01".to_string())),
                replacement("carol", "Fan", CellValue::Text("bad".to_string())),
            ],
        };

        assert_eq!(enrich(&tables), enrich(&tables));
    }

    #[test]
    fn test_enrich_empty_tables() {
        let dataset = enrich(&RawTables::default());
        assert!(dataset.records.is_empty());
        assert_eq!(dataset.report, EnrichmentReport::default());
    }
}
