//! Pure aggregation behind the impact dashboard.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};

use super::stats_model::{
    GapAnalysis, ImpactReport, ImpactTotals, LabelCount, IMPORTANT_SUBJECTS,
    LOW_COVERAGE_THRESHOLD, RECENT_UPLOADS_LIMIT, REQUESTED_SUBJECTS_LIMIT,
    TOP_CONTRIBUTORS_LIMIT,
};
use crate::materials::{grade_rank, StudyMaterial};
use crate::requests::MaterialRequest;

pub fn build_report(materials: &[StudyMaterial], requests: &[MaterialRequest]) -> ImpactReport {
    let contributors: HashSet<Option<&str>> =
        materials.iter().map(|m| m.author.as_deref()).collect();

    let totals = ImpactTotals {
        total_downloads: materials.iter().map(|m| m.downloads).sum(),
        total_materials: materials.len(),
        total_contributors: contributors.len(),
        total_requests: requests.len(),
        requests_fulfilled: requests.iter().filter(|r| r.fulfilled).count(),
    };

    let mut by_grade = count_labels(materials.iter().map(|m| m.grade.as_str()));
    by_grade.sort_by(|a, b| match (grade_rank(&a.label), grade_rank(&b.label)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.label.cmp(&b.label),
    });

    let mut by_type = count_labels(materials.iter().map(|m| m.type_label()));
    sort_by_count(&mut by_type);

    let mut by_subject = count_labels(
        materials
            .iter()
            .filter_map(|m| m.subject.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty()),
    );
    sort_by_count(&mut by_subject);

    let mut recent: Vec<StudyMaterial> = materials.to_vec();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(RECENT_UPLOADS_LIMIT);

    let mut top_contributors = count_labels(materials.iter().map(|m| m.author_display()));
    sort_by_count(&mut top_contributors);
    top_contributors.truncate(TOP_CONTRIBUTORS_LIMIT);

    ImpactReport {
        totals,
        by_grade,
        by_type,
        by_subject,
        recent,
        top_contributors,
        gaps: analyze_gaps(materials, requests),
    }
}

/// Coverage of the important subjects plus what students are asking for.
///
/// A material counts toward every important subject whose name occurs in its
/// subject, ignoring case, so "Combined Mathematics" also counts as
/// "Mathematics".
pub fn analyze_gaps(materials: &[StudyMaterial], requests: &[MaterialRequest]) -> GapAnalysis {
    let subjects: Vec<String> = materials
        .iter()
        .filter_map(|m| m.subject.as_deref())
        .map(str::to_lowercase)
        .collect();

    let mut gaps = GapAnalysis::default();
    for important in IMPORTANT_SUBJECTS {
        let needle = important.to_lowercase();
        let count = subjects.iter().filter(|s| s.contains(&needle)).count();
        if count == 0 {
            gaps.missing.push(important.to_string());
        } else if count < LOW_COVERAGE_THRESHOLD {
            gaps.low.push(LabelCount::new(important, count));
        }
    }

    let mut seen = BTreeSet::new();
    gaps.requested = requests
        .iter()
        .filter(|r| !r.fulfilled)
        .map(|r| r.subject.clone())
        .filter(|s| seen.insert(s.clone()))
        .take(REQUESTED_SUBJECTS_LIMIT)
        .collect();
    gaps
}

/// Counts labels, keeping first-appearance order.
fn count_labels<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<LabelCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<LabelCount> = Vec::new();
    for label in labels {
        match index.get(label) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(label, counts.len());
                counts.push(LabelCount::new(label, 1));
            }
        }
    }
    counts
}

/// Highest count first; ties keep their order.
fn sort_by_count(counts: &mut [LabelCount]) {
    counts.sort_by(|a, b| b.count.cmp(&a.count));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::RecordId;
    use chrono::{Duration, TimeZone, Utc};

    fn material(
        id: i64,
        subject: &str,
        grade: &str,
        author: Option<&str>,
        downloads: i64,
    ) -> StudyMaterial {
        StudyMaterial {
            id: RecordId::Int(id),
            title: format!("Material {}", id),
            subject: Some(subject.to_string()),
            grade: grade.to_string(),
            medium: None,
            material_type: None,
            author: author.map(str::to_string),
            year: None,
            downloads,
            file_url: None,
            file_size: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(id),
        }
    }

    fn request(id: i64, subject: &str, fulfilled: bool) -> MaterialRequest {
        MaterialRequest {
            id: RecordId::Int(id),
            student_name: None,
            subject: subject.to_string(),
            grade: "Grade 10".to_string(),
            note_content: None,
            upvotes: 0,
            fulfilled,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_totals_and_groupings() {
        let materials = vec![
            material(1, "Physics", "Grade 10", Some("Nimal"), 10),
            material(2, "Physics", "Grade 12-13 (A/L)", Some("Nimal"), 5),
            material(3, "Chemistry", "Grade 1-5", Some("Anon#AAAA"), 0),
            material(4, "History", "Grade 10", None, 1),
        ];
        let requests = vec![request(1, "ICT", false), request(2, "Maths", true)];

        let report = build_report(&materials, &requests);

        assert_eq!(
            report.totals,
            ImpactTotals {
                total_downloads: 16,
                total_materials: 4,
                total_contributors: 3,
                total_requests: 2,
                requests_fulfilled: 1,
            }
        );
        assert_eq!(report.fulfilment_rate(), 50);
        assert_eq!(
            report.by_grade,
            vec![
                LabelCount::new("Grade 1-5", 1),
                LabelCount::new("Grade 10", 2),
                LabelCount::new("Grade 12-13 (A/L)", 1),
            ]
        );
        assert_eq!(report.by_type, vec![LabelCount::new("Note", 4)]);
        assert_eq!(report.by_subject[0], LabelCount::new("Physics", 2));
        assert_eq!(
            report.top_contributors,
            vec![LabelCount::new("Nimal", 2), LabelCount::new("Anonymous", 2)]
        );
        assert_eq!(report.recent[0].id, RecordId::Int(4));
    }

    #[test]
    fn test_recent_is_capped() {
        let materials: Vec<StudyMaterial> = (1..=12)
            .map(|i| material(i, "Physics", "Grade 10", Some("Nimal"), 0))
            .collect();
        let report = build_report(&materials, &[]);
        assert_eq!(report.recent.len(), RECENT_UPLOADS_LIMIT);
        assert_eq!(report.recent[0].id, RecordId::Int(12));
        assert_eq!(report.fulfilment_rate(), 0);
    }

    #[test]
    fn test_gap_analysis() {
        let materials = vec![
            material(1, "Combined Mathematics", "Grade 12-13 (A/L)", None, 0),
            material(2, "physics", "Grade 10", None, 0),
            material(3, "Physics", "Grade 10", None, 0),
            material(4, "Physics", "Grade 10", None, 0),
        ];
        let requests = vec![
            request(1, "ICT", false),
            request(2, "ICT", false),
            request(3, "Tamil", true),
            request(4, "Art", false),
        ];

        let gaps = analyze_gaps(&materials, &requests);

        assert!(!gaps.missing.contains(&"Physics".to_string()));
        assert!(!gaps.missing.contains(&"Mathematics".to_string()));
        assert!(gaps.missing.contains(&"Biology".to_string()));
        assert_eq!(gaps.missing.len(), 11);
        assert_eq!(
            gaps.low,
            vec![
                LabelCount::new("Mathematics", 1),
                LabelCount::new("Combined Mathematics", 1),
            ]
        );
        assert_eq!(gaps.requested, vec!["ICT".to_string(), "Art".to_string()]);
    }
}
