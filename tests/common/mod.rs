//! Shared workbook fixtures for the integration tests

#![allow(dead_code)] // each test binary uses a different subset

use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};

/// 2021-10-31
pub const SERIAL_2021_10_31: f64 = 44500.0;
/// 2023-01-15
pub const SERIAL_2023_01_15: f64 = 44941.0;

/// Laptop Data rows: User, Merk, Model, CPU, RAM, release serial
pub const ASSETS: [(&str, &str, &str, &str, &str, f64); 3] = [
    ("alice", "Lenovo", "T14", "i5", "16GB", 43831.0),
    ("bob", "Dell", "Latitude 5420", "i7", "16GB", 44197.0),
    ("carol", "HP", "EliteBook 840", "i5", "8GB", 44197.0),
];

/// Write the standard fixture: three laptops, five replacements.
///
/// Replacement rows mix a date-formatted serial, a plain serial, an ISO text
/// date, an unparseable date and a user with no laptop row.
pub fn write_fixture(dir: &Path) -> PathBuf {
    let path = dir.join("Laptop_Riwayat.xlsx");
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let assets = workbook.add_worksheet();
    assets.set_name("Laptop Data").unwrap();
    for (col, name) in ["User", "Merk", "Model", "CPU", "RAM", "Product Release Date"]
        .iter()
        .enumerate()
    {
        assets.write_string(0, col as u16, *name).unwrap();
    }
    for (idx, (user, brand, model, cpu, ram, release)) in ASSETS.iter().enumerate() {
        let row = (idx + 1) as u32;
        assets.write_string(row, 0, *user).unwrap();
        assets.write_string(row, 1, *brand).unwrap();
        assets.write_string(row, 2, *model).unwrap();
        assets.write_string(row, 3, *cpu).unwrap();
        assets.write_string(row, 4, *ram).unwrap();
        assets
            .write_number_with_format(row, 5, *release, &date_format)
            .unwrap();
    }

    let replacements = workbook.add_worksheet();
    replacements.set_name("Part Replacement").unwrap();
    for (col, name) in ["User", "Part", "Tanggal Ganti", "Keterangan"]
        .iter()
        .enumerate()
    {
        replacements.write_string(0, col as u16, *name).unwrap();
    }

    // alice / Battery / 2021-10-31 (date-formatted serial)
    replacements.write_string(1, 0, "alice").unwrap();
    replacements.write_string(1, 1, "Battery").unwrap();
    replacements
        .write_number_with_format(1, 2, SERIAL_2021_10_31, &date_format)
        .unwrap();
    replacements.write_string(1, 3, "Swollen").unwrap();

    // bob / Keyboard / 2023-01-15 (plain serial)
    replacements.write_string(2, 0, "bob").unwrap();
    replacements.write_string(2, 1, "Keyboard").unwrap();
    replacements.write_number(2, 2, SERIAL_2023_01_15).unwrap();

    // bob / Battery / ISO text date
    replacements.write_string(3, 0, "bob").unwrap();
    replacements.write_string(3, 1, "Battery").unwrap();
    replacements.write_string(3, 2, "2023-06-01").unwrap();

    // carol / Screen / unparseable date
    replacements.write_string(4, 0, "carol").unwrap();
    replacements.write_string(4, 1, "Screen").unwrap();
    replacements.write_string(4, 2, "soon").unwrap();

    // dave has no laptop row
    replacements.write_string(5, 0, "dave").unwrap();
    replacements.write_string(5, 1, "Charger").unwrap();
    replacements.write_string(5, 2, "2023-02-10").unwrap();

    workbook.save(&path).unwrap();
    path
}

/// A workbook with only the Laptop Data sheet
pub fn write_assets_only(dir: &Path) -> PathBuf {
    let path = dir.join("assets_only.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Laptop Data").unwrap();
    sheet.write_string(0, 0, "User").unwrap();
    sheet.write_string(1, 0, "alice").unwrap();
    workbook.save(&path).unwrap();
    path
}
