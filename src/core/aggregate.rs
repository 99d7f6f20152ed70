//! Group-by counts feeding each dashboard chart

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::types::{AssetRecord, EnrichedRecord};

/// One group and how many rows fell into it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountEntry {
    pub key: String,
    pub count: usize,
}

impl CountEntry {
    pub fn new(key: impl Into<String>, count: usize) -> Self {
        Self {
            key: key.into(),
            count,
        }
    }
}

/// Replacements in one calendar year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// Count keys, ordered by count descending then key ascending
fn frequency<'a, I>(keys: I) -> Vec<CountEntry>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    let mut entries: Vec<CountEntry> = counts
        .into_iter()
        .map(|(key, count)| CountEntry::new(key, count))
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    entries
}

/// Replacements per part type
pub fn part_frequency(records: &[EnrichedRecord]) -> Vec<CountEntry> {
    frequency(records.iter().map(|r| r.part.as_str()))
}

/// Replacements per user
pub fn user_counts(records: &[EnrichedRecord]) -> Vec<CountEntry> {
    frequency(records.iter().map(|r| r.user.as_str()))
}

/// Replacements per year, ascending. Records without a year are not counted.
pub fn yearly_trend(records: &[EnrichedRecord]) -> Vec<YearCount> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for year in records.iter().filter_map(|r| r.year) {
        *counts.entry(year).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// Replacements per `YYYY-MM`, ascending. Records without a month are not counted.
pub fn monthly_trend(records: &[EnrichedRecord]) -> Vec<CountEntry> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for month in records.iter().filter_map(|r| r.month.as_deref()) {
        *counts.entry(month).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(month, count)| CountEntry::new(month, count))
        .collect()
}

/// Laptop inventory breakdowns, computed over every asset row regardless of filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssetDistributions {
    pub cpu: Vec<CountEntry>,
    pub ram: Vec<CountEntry>,
    pub brand: Vec<CountEntry>,
    /// Ordered by release value ascending
    pub release_year: Vec<CountEntry>,
}

impl AssetDistributions {
    pub fn from_assets(assets: &[AssetRecord]) -> Self {
        let mut release: BTreeMap<String, usize> = BTreeMap::new();
        for label in assets.iter().filter_map(|a| a.release_date.label()) {
            *release.entry(label).or_insert(0) += 1;
        }

        Self {
            cpu: frequency(assets.iter().filter_map(|a| a.cpu.as_deref())),
            ram: frequency(assets.iter().filter_map(|a| a.ram.as_deref())),
            brand: frequency(assets.iter().filter_map(|a| a.brand.as_deref())),
            release_year: release
                .into_iter()
                .map(|(key, count)| CountEntry::new(key, count))
                .collect(),
        }
    }
}

/// User × part replacement counts, missing combinations are 0
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PivotMatrix {
    /// Row labels, ascending
    pub users: Vec<String>,
    /// Column labels, ascending
    pub parts: Vec<String>,
    /// `cells[row][col]` = replacements of `parts[col]` for `users[row]`
    pub cells: Vec<Vec<usize>>,
}

impl PivotMatrix {
    pub fn from_records(records: &[EnrichedRecord]) -> Self {
        let users: Vec<String> = records
            .iter()
            .map(|r| r.user.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let parts: Vec<String> = records
            .iter()
            .map(|r| r.part.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let user_idx: HashMap<&str, usize> = users
            .iter()
            .enumerate()
            .map(|(i, u)| (u.as_str(), i))
            .collect();
        let part_idx: HashMap<&str, usize> = parts
            .iter()
            .enumerate()
            .map(|(i, p)| (p.as_str(), i))
            .collect();

        let mut cells = vec![vec![0usize; parts.len()]; users.len()];
        for record in records {
            let row = user_idx[record.user.as_str()];
            let col = part_idx[record.part.as_str()];
            cells[row][col] += 1;
        }

        Self {
            users,
            parts,
            cells,
        }
    }

    pub fn get(&self, user: &str, part: &str) -> usize {
        let row = self.users.iter().position(|u| u == user);
        let col = self.parts.iter().position(|p| p == part);
        match (row, col) {
            (Some(r), Some(c)) => self.cells[r][c],
            _ => 0,
        }
    }

    pub fn row_totals(&self) -> Vec<usize> {
        self.cells.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn column_totals(&self) -> Vec<usize> {
        (0..self.parts.len())
            .map(|c| self.cells.iter().map(|row| row[c]).sum())
            .collect()
    }
}
