//! Listing filter and sort models.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DEBOUNCE, PREVIEW_SIZE};
use crate::errors::{Error, ValidationError};

/// Ordering applied to the materials listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    MostDownloaded,
    #[serde(rename = "a-z")]
    Alphabetical,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Newest,
        SortKey::Oldest,
        SortKey::MostDownloaded,
        SortKey::Alphabetical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::MostDownloaded => "most-downloaded",
            SortKey::Alphabetical => "a-z",
        }
    }

    /// Parses a sort key, falling back to newest-first for unknown input.
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s.trim())
            .ok_or_else(|| ValidationError::InvalidInput(format!("Unknown sort key '{}'", s)).into())
    }
}

/// Everything the user can set on the landing listing.
///
/// Empty strings mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingFilters {
    pub search: String,
    pub medium: String,
    pub grade: String,
    pub material_type: String,
    pub year: String,
    pub subject: String,
    pub sort: SortKey,
}

impl ListingFilters {
    /// True when any search term or categorical filter is set. Sort is not a filter.
    pub fn has_active_filters(&self) -> bool {
        [
            &self.search,
            &self.medium,
            &self.grade,
            &self.material_type,
            &self.year,
            &self.subject,
        ]
        .iter()
        .any(|value| !value.trim().is_empty())
    }

    /// Human readable summary of the categorical filters ("Grade 10 • English").
    pub fn summary(&self) -> String {
        [
            &self.grade,
            &self.medium,
            &self.material_type,
            &self.year,
            &self.subject,
        ]
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join(" • ")
    }
}

/// Tuning for the listing runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingConfig {
    /// Quiescence window before a filter change is queried.
    pub debounce: Duration,
    /// Rows shown before "show all" when no filter is active.
    pub preview_size: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            preview_size: PREVIEW_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_parse_falls_back_to_newest() {
        assert_eq!(SortKey::parse_or_default("a-z"), SortKey::Alphabetical);
        assert_eq!(
            SortKey::parse_or_default("most-downloaded"),
            SortKey::MostDownloaded
        );
        assert_eq!(SortKey::parse_or_default("popular"), SortKey::Newest);
    }

    #[test]
    fn test_sort_key_serde_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&SortKey::Alphabetical).unwrap(),
            "\"a-z\""
        );
        assert_eq!(
            serde_json::to_string(&SortKey::MostDownloaded).unwrap(),
            "\"most-downloaded\""
        );
    }

    #[test]
    fn test_sort_alone_is_not_an_active_filter() {
        let filters = ListingFilters {
            sort: SortKey::Oldest,
            ..Default::default()
        };
        assert!(!filters.has_active_filters());

        let filters = ListingFilters {
            year: "2021".to_string(),
            ..Default::default()
        };
        assert!(filters.has_active_filters());
    }

    #[test]
    fn test_summary_joins_set_filters_in_display_order() {
        let filters = ListingFilters {
            medium: "English".to_string(),
            grade: "Grade 10".to_string(),
            subject: "Physics".to_string(),
            ..Default::default()
        };
        assert_eq!(filters.summary(), "Grade 10 • English • Physics");
    }
}
