use serde::{Deserialize, Serialize};

use crate::materials::StudyMaterial;

/// Subjects every grade range is expected to have material for.
pub const IMPORTANT_SUBJECTS: [&str; 14] = [
    "Mathematics",
    "Science",
    "English",
    "Sinhala",
    "Tamil",
    "Combined Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "Economics",
    "Accounting",
    "ICT",
    "History",
    "Geography",
];

/// Subjects with fewer materials than this are reported as low.
pub const LOW_COVERAGE_THRESHOLD: usize = 3;

pub const RECENT_UPLOADS_LIMIT: usize = 10;
pub const TOP_CONTRIBUTORS_LIMIT: usize = 5;
pub const REQUESTED_SUBJECTS_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactTotals {
    pub total_downloads: i64,
    pub total_materials: usize,
    pub total_contributors: usize,
    pub total_requests: usize,
    pub requests_fulfilled: usize,
}

/// A label with how many materials carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

impl LabelCount {
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapAnalysis {
    /// Important subjects with no material at all.
    pub missing: Vec<String>,
    /// Important subjects with some, but too little, material.
    pub low: Vec<LabelCount>,
    /// Subjects of open requests, first few distinct.
    pub requested: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImpactReport {
    pub totals: ImpactTotals,
    pub by_grade: Vec<LabelCount>,
    pub by_type: Vec<LabelCount>,
    pub by_subject: Vec<LabelCount>,
    pub recent: Vec<StudyMaterial>,
    pub top_contributors: Vec<LabelCount>,
    pub gaps: GapAnalysis,
}

impl ImpactReport {
    /// Share of requests marked fulfilled, in whole percent.
    pub fn fulfilment_rate(&self) -> u32 {
        if self.totals.total_requests == 0 {
            return 0;
        }
        let rate = self.totals.requests_fulfilled as f64 * 100.0 / self.totals.total_requests as f64;
        rate.round() as u32
    }
}
