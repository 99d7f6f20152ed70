//! Filter engine: year / user / part equality filters plus display de-duplication

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{HistoryError, HistoryResult};
use crate::types::EnrichedRecord;

/// Selector labels that mean "no filter"
const ALL_SENTINELS: [&str; 2] = ["all", "semua"];

fn is_all(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || ALL_SENTINELS.iter().any(|s| trimmed.eq_ignore_ascii_case(s))
}

/// Active filter selections. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementFilter {
    #[serde(default, deserialize_with = "year_selector")]
    pub year: Option<i32>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub part: Option<String>,
}

impl ReplacementFilter {
    /// Filter with every selector set to "all"
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a filter from raw selector text; "", "all" and "Semua" are the sentinel
    pub fn from_selections(
        year: Option<&str>,
        user: Option<&str>,
        part: Option<&str>,
    ) -> HistoryResult<Self> {
        Ok(Self {
            year: year.map(parse_year).transpose()?.flatten(),
            user: user.and_then(parse_label),
            part: part.and_then(parse_label),
        })
    }

    /// Drop sentinel values that arrived verbatim (e.g. `"user": "Semua"` over the API)
    pub fn normalized(self) -> Self {
        Self {
            year: self.year,
            user: self.user.as_deref().and_then(parse_label),
            part: self.part.as_deref().and_then(parse_label),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.user.is_none() && self.part.is_none()
    }

    /// True when the record satisfies every active selection
    pub fn matches(&self, record: &EnrichedRecord) -> bool {
        if let Some(year) = self.year {
            if record.year != Some(year) {
                return false;
            }
        }
        if let Some(ref user) = self.user {
            if &record.user != user {
                return false;
            }
        }
        if let Some(ref part) = self.part {
            if &record.part != part {
                return false;
            }
        }
        true
    }

    /// Apply all active selections, then remove exact duplicate rows
    pub fn apply(&self, records: &[EnrichedRecord]) -> Vec<EnrichedRecord> {
        let selected: Vec<EnrichedRecord> = records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();
        dedup_rows(selected)
    }
}

/// Parse a year selector
pub fn parse_year(value: &str) -> HistoryResult<Option<i32>> {
    if is_all(value) {
        return Ok(None);
    }
    value
        .trim()
        .parse::<i32>()
        .map(Some)
        .map_err(|_| HistoryError::Validation(format!("Invalid year filter '{}'", value)))
}

/// Accepts `2023`, `"2023"`, `"all"` or null
fn year_selector<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Selector {
        Year(i32),
        Label(String),
    }

    match Option::<Selector>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Selector::Year(year)) => Ok(Some(year)),
        Some(Selector::Label(label)) => parse_year(&label).map_err(serde::de::Error::custom),
    }
}

fn parse_label(value: &str) -> Option<String> {
    if is_all(value) {
        None
    } else {
        Some(value.to_string())
    }
}

/// Remove rows whose every column equals an earlier row. First occurrence wins.
pub fn dedup_rows(records: Vec<EnrichedRecord>) -> Vec<EnrichedRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|r| seen.insert(r.row_key()))
        .collect()
}

/// Choices offered by the year, user and part selectors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Distinct non-null years, ascending
    pub years: Vec<i32>,
    /// Distinct users in first-appearance order
    pub users: Vec<String>,
    /// Distinct parts in first-appearance order
    pub parts: Vec<String>,
}

impl FilterOptions {
    pub fn from_records(records: &[EnrichedRecord]) -> Self {
        let mut years: Vec<i32> = records.iter().filter_map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();

        let mut users: Vec<String> = Vec::new();
        let mut parts: Vec<String> = Vec::new();
        for record in records {
            if !users.contains(&record.user) {
                users.push(record.user.clone());
            }
            if !parts.contains(&record.part) {
                parts.push(record.part.clone());
            }
        }

        Self {
            years,
            users,
            parts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;

    fn record(user: &str, part: &str, year: Option<i32>) -> EnrichedRecord {
        EnrichedRecord {
            user: user.to_string(),
            part: part.to_string(),
            replaced_on: year.and_then(|y| chrono::NaiveDate::from_ymd_opt(y, 1, 1)),
            note: None,
            brand: Some("Dell".to_string()),
            model: None,
            cpu: None,
            ram: None,
            release_date: CellValue::Empty,
            year,
            month: year.map(|y| format!("{}-01", y)),
        }
    }

    fn sample() -> Vec<EnrichedRecord> {
        vec![
            record("alice", "Battery", Some(2021)),
            record("alice", "Keyboard", Some(2022)),
            record("bob", "Battery", Some(2022)),
            record("bob", "Fan", None),
        ]
    }

    #[test]
    fn test_all_filter_returns_everything() {
        let records = sample();
        assert_eq!(ReplacementFilter::all().apply(&records), records);
    }

    #[test]
    fn test_filters_are_anded() {
        let filter = ReplacementFilter {
            year: Some(2022),
            user: Some("bob".to_string()),
            part: None,
        };
        let result = filter.apply(&sample());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].part, "Battery");
    }

    #[test]
    fn test_deserialize_year_as_number_or_label() {
        let f: ReplacementFilter = serde_json::from_str(r#"{"year": 2022}"#).unwrap();
        assert_eq!(f.year, Some(2022));
        let f: ReplacementFilter = serde_json::from_str(r#"{"year": "2022"}"#).unwrap();
        assert_eq!(f.year, Some(2022));
        let f: ReplacementFilter = serde_json::from_str(r#"{"year": "Semua"}"#).unwrap();
        assert_eq!(f.year, None);
        let f: ReplacementFilter = serde_json::from_str(r#"{"year": null}"#).unwrap();
        assert_eq!(f.year, None);
        assert!(serde_json::from_str::<ReplacementFilter>(r#"{"year": "next"}"#).is_err());
    }

    #[test]
    fn test_year_filter_excludes_null_years() {
        let filter = ReplacementFilter {
            year: Some(2022),
            ..Default::default()
        };
        let result = filter.apply(&sample());
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|r| r.year == Some(2022)));
    }

    #[test]
    fn test_year_with_no_matches_is_empty() {
        let filter = ReplacementFilter {
            year: Some(1999),
            ..Default::default()
        };
        assert!(filter.apply(&sample()).is_empty());
    }

    #[test]
    fn test_duplicates_removed_after_filtering() {
        let mut records = sample();
        records.push(record("alice", "Battery", Some(2021)));
        records.push(record("bob", "Fan", None));

        let result = ReplacementFilter::all().apply(&records);
        assert_eq!(result, sample());
    }

    #[test]
    fn test_rows_differing_in_one_column_are_kept() {
        let mut a = record("alice", "Battery", Some(2021));
        let mut b = a.clone();
        a.note = Some("swollen".to_string());
        b.note = Some("dead".to_string());

        assert_eq!(dedup_rows(vec![a, b]).len(), 2);
    }

    #[test]
    fn test_from_selections_sentinels() {
        let filter =
            ReplacementFilter::from_selections(Some("Semua"), Some("all"), Some("")).unwrap();
        assert!(filter.is_empty());

        let filter =
            ReplacementFilter::from_selections(Some("2023"), Some("alice"), None).unwrap();
        assert_eq!(filter.year, Some(2023));
        assert_eq!(filter.user.as_deref(), Some("alice"));
        assert_eq!(filter.part, None);
    }

    #[test]
    fn test_from_selections_rejects_bad_year() {
        let result = ReplacementFilter::from_selections(Some("twenty"), None, None);
        assert!(matches!(result, Err(HistoryError::Validation(_))));
    }

    #[test]
    fn test_normalized_drops_verbatim_sentinels() {
        let filter = ReplacementFilter {
            year: None,
            user: Some("Semua".to_string()),
            part: Some("Battery".to_string()),
        }
        .normalized();
        assert_eq!(filter.user, None);
        assert_eq!(filter.part.as_deref(), Some("Battery"));
    }

    #[test]
    fn test_filter_options() {
        let options = FilterOptions::from_records(&sample());
        assert_eq!(options.years, vec![2021, 2022]);
        assert_eq!(options.users, vec!["alice".to_string(), "bob".to_string()]);
        assert_eq!(
            options.parts,
            vec!["Battery".to_string(), "Keyboard".to_string(), "Fan".to_string()]
        );
    }
}
