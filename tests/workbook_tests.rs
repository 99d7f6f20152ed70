//! Workbook ingestion and end-to-end dashboard tests against real .xlsx files

mod common;

use chrono::NaiveDate;
use laptop_history::core::{Dashboard, ReplacementFilter};
use laptop_history::excel::{ReportExporter, WorkbookLoader};
use laptop_history::export::write_csv_file;
use laptop_history::types::CellValue;
use laptop_history::{HistoryError, LoadError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// LOADER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_load_reads_both_sheets() {
    let dir = TempDir::new().unwrap();
    let path = common::write_fixture(dir.path());

    let tables = WorkbookLoader::new(&path).load().unwrap();
    assert_eq!(tables.assets.len(), 3);
    assert_eq!(tables.replacements.len(), 5);

    let alice = &tables.assets[0];
    assert_eq!(alice.user, "alice");
    assert_eq!(alice.brand.as_deref(), Some("Lenovo"));
    assert_eq!(alice.cpu.as_deref(), Some("i5"));
    assert_eq!(alice.release_date, CellValue::Date(ymd(2020, 1, 1)));
}

#[test]
fn test_load_keeps_date_cells_in_every_shape() {
    let dir = TempDir::new().unwrap();
    let path = common::write_fixture(dir.path());
    let tables = WorkbookLoader::new(&path).load().unwrap();

    let dates: Vec<&CellValue> = tables.replacements.iter().map(|r| &r.replaced_on).collect();
    assert_eq!(dates[0], &CellValue::Date(ymd(2021, 10, 31)));
    assert_eq!(dates[1], &CellValue::Number(common::SERIAL_2023_01_15));
    assert_eq!(dates[2], &CellValue::Text("2023-06-01".to_string()));
    assert_eq!(dates[3], &CellValue::Text("soon".to_string()));
    assert_eq!(tables.replacements[0].note.as_deref(), Some("Swollen"));
    assert_eq!(tables.replacements[1].note, None);
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = WorkbookLoader::new(dir.path().join("nope.xlsx")).load();
    assert!(matches!(result, Err(LoadError::Open { .. })));
}

#[test]
fn test_load_missing_sheet() {
    let dir = TempDir::new().unwrap();
    let path = common::write_assets_only(dir.path());

    match WorkbookLoader::new(&path).load() {
        Err(LoadError::MissingSheet { sheet, .. }) => assert_eq!(sheet, "Part Replacement"),
        other => panic!("expected MissingSheet, got {:?}", other),
    }
}

#[test]
fn test_dashboard_load_wraps_load_errors() {
    let dir = TempDir::new().unwrap();
    let result = Dashboard::load(dir.path().join("nope.xlsx"), &ReplacementFilter::all());
    assert!(matches!(result, Err(HistoryError::Load(_))));
}

// ═══════════════════════════════════════════════════════════════════════════
// DASHBOARD TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_dashboard_unfiltered() {
    let dir = TempDir::new().unwrap();
    let path = common::write_fixture(dir.path());
    let view = Dashboard::load(&path, &ReplacementFilter::all()).unwrap();

    assert_eq!(view.total_records, 5);
    assert_eq!(view.records.len(), 5);
    assert_eq!(view.report.orphaned, 1);
    assert_eq!(view.report.orphaned_users, vec!["dave".to_string()]);
    assert_eq!(view.report.unparsed_dates, 1);

    let alice = &view.records[0];
    assert_eq!(alice.replaced_on, Some(ymd(2021, 10, 31)));
    assert_eq!(alice.year, Some(2021));
    assert_eq!(alice.month.as_deref(), Some("2021-10"));
    assert_eq!(alice.model.as_deref(), Some("T14"));

    let dave = &view.records[4];
    assert_eq!(dave.brand, None);
    assert_eq!(dave.year, Some(2023));

    let parts: Vec<(&str, usize)> = view
        .part_frequency
        .iter()
        .map(|e| (e.key.as_str(), e.count))
        .collect();
    assert_eq!(
        parts,
        vec![("Battery", 2), ("Charger", 1), ("Keyboard", 1), ("Screen", 1)]
    );

    let years: Vec<(i32, usize)> = view.yearly_trend.iter().map(|y| (y.year, y.count)).collect();
    assert_eq!(years, vec![(2021, 1), (2023, 3)]);

    assert_eq!(view.user_counts[0].key, "bob");
    assert_eq!(view.user_counts[0].count, 2);
    assert_eq!(view.pivot.get("bob", "Battery"), 1);
    assert_eq!(view.pivot.row_totals().iter().sum::<usize>(), 5);
    assert_eq!(view.charts.len(), 9);
}

#[test]
fn test_dashboard_filters_combine() {
    let dir = TempDir::new().unwrap();
    let path = common::write_fixture(dir.path());

    let filter = ReplacementFilter::from_selections(Some("2023"), Some("bob"), Some("Semua")).unwrap();
    let view = Dashboard::load(&path, &filter).unwrap();
    assert_eq!(view.records.len(), 2);
    assert!(view.records.iter().all(|r| r.user == "bob"));

    // Options and asset distributions ignore the filters
    assert_eq!(view.options.years, vec![2021, 2023]);
    assert_eq!(view.options.users.len(), 4);
    let i5 = view.distributions.cpu.iter().find(|e| e.key == "i5").unwrap();
    assert_eq!(i5.count, 2);
}

#[test]
fn test_dashboard_year_filter_drops_undated_rows() {
    let dir = TempDir::new().unwrap();
    let path = common::write_fixture(dir.path());

    let filter = ReplacementFilter::from_selections(Some("2021"), None, None).unwrap();
    let view = Dashboard::load(&path, &filter).unwrap();
    assert_eq!(view.records.len(), 1);
    assert_eq!(view.records[0].part, "Battery");
}

#[test]
fn test_dashboard_filter_with_no_matches_is_empty() {
    let dir = TempDir::new().unwrap();
    let path = common::write_fixture(dir.path());

    let filter = ReplacementFilter::from_selections(Some("1999"), None, None).unwrap();
    let view = Dashboard::load(&path, &filter).unwrap();
    assert!(view.records.is_empty());
    assert!(view.part_frequency.is_empty());
    assert!(view.pivot.users.is_empty());
    assert_eq!(view.total_records, 5);
}

// ═══════════════════════════════════════════════════════════════════════════
// EXPORT TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_csv_export_of_filtered_view() {
    let dir = TempDir::new().unwrap();
    let path = common::write_fixture(dir.path());
    let filter = ReplacementFilter::from_selections(None, Some("alice"), None).unwrap();
    let view = Dashboard::load(&path, &filter).unwrap();

    let out = dir.path().join("out.csv");
    write_csv_file(&view.records, &out).unwrap();

    let content = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "User,Merk,Model,Part,Tanggal Ganti,Keterangan");
    assert_eq!(lines[1], "alice,Lenovo,T14,Battery,2021-10-31,Swollen");
    assert_eq!(lines.len(), 2);
}

#[test]
fn test_xlsx_report_can_be_read_back() {
    let dir = TempDir::new().unwrap();
    let path = common::write_fixture(dir.path());
    let view = Dashboard::load(&path, &ReplacementFilter::all()).unwrap();

    let out = dir.path().join("report.xlsx");
    ReportExporter::new(&view).export(&out).unwrap();
    assert!(out.exists());

    use calamine::{open_workbook_auto, Reader};
    let workbook = open_workbook_auto(&out).unwrap();
    assert_eq!(
        workbook.sheet_names(),
        vec!["Riwayat", "Part", "Tahun", "User", "Heatmap"]
    );
}
