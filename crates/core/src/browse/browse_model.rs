use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::materials::{grade_rank, MaterialType, StudyMaterial};
use crate::utils::text_utils::{normalize_key, title_case_words};

/// Where the user currently is in the drill-down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "camelCase")]
pub enum BrowseLevel {
    #[default]
    Grades,
    Subjects {
        grade: String,
    },
    Types {
        grade: String,
        subject: String,
    },
    Materials {
        grade: String,
        subject: String,
        material_type: String,
    },
}

impl BrowseLevel {
    /// One level up. The grade list is its own parent.
    pub fn parent(&self) -> BrowseLevel {
        match self {
            BrowseLevel::Grades | BrowseLevel::Subjects { .. } => BrowseLevel::Grades,
            BrowseLevel::Types { grade, .. } => BrowseLevel::Subjects {
                grade: grade.clone(),
            },
            BrowseLevel::Materials { grade, subject, .. } => BrowseLevel::Types {
                grade: grade.clone(),
                subject: subject.clone(),
            },
        }
    }

    /// `grade > subject > type` for the current selection.
    pub fn breadcrumb(&self) -> String {
        match self {
            BrowseLevel::Grades => String::new(),
            BrowseLevel::Subjects { grade } => grade.clone(),
            BrowseLevel::Types { grade, subject } => format!("{} > {}", grade, subject),
            BrowseLevel::Materials {
                grade,
                subject,
                material_type,
            } => format!("{} > {} > {}", grade, subject, material_type),
        }
    }
}

/// A named group with the number of materials in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub name: String,
    /// Grouping key; equal to `name` except for subjects.
    pub key: String,
    pub count: usize,
}

/// Items listed at one level.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseItems {
    Grades(Vec<Bucket>),
    Subjects(Vec<Bucket>),
    Types(Vec<Bucket>),
    Materials(Vec<StudyMaterial>),
}

impl BrowseItems {
    pub fn len(&self) -> usize {
        match self {
            BrowseItems::Grades(b) | BrowseItems::Subjects(b) | BrowseItems::Types(b) => b.len(),
            BrowseItems::Materials(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keeps items whose name (or title) contains `query`, ignoring case.
    pub fn filtered(&self, query: &str) -> BrowseItems {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.clone();
        }
        let buckets = |b: &[Bucket]| -> Vec<Bucket> {
            b.iter()
                .filter(|b| b.name.to_lowercase().contains(&needle))
                .cloned()
                .collect()
        };
        match self {
            BrowseItems::Grades(b) => BrowseItems::Grades(buckets(b)),
            BrowseItems::Subjects(b) => BrowseItems::Subjects(buckets(b)),
            BrowseItems::Types(b) => BrowseItems::Types(buckets(b)),
            BrowseItems::Materials(m) => BrowseItems::Materials(
                m.iter()
                    .filter(|m| m.title.to_lowercase().contains(&needle))
                    .cloned()
                    .collect(),
            ),
        }
    }
}

/// Counts rows per grade in the fixed grade order.
///
/// Grades outside the known set are kept and sort after the known ones,
/// alphabetically.
pub fn group_grades<'a, I>(grades: I) -> Vec<Bucket>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for grade in grades.into_iter().flatten() {
        *counts.entry(grade.to_string()).or_default() += 1;
    }

    let mut buckets: Vec<Bucket> = counts
        .into_iter()
        .map(|(name, count)| Bucket {
            key: name.clone(),
            name,
            count,
        })
        .collect();
    buckets.sort_by(|a, b| compare_grades(&a.name, &b.name));
    buckets
}

fn compare_grades(a: &str, b: &str) -> Ordering {
    match (grade_rank(a), grade_rank(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Groups subjects by their trimmed, lowercased spelling.
///
/// Each bucket is displayed with the first spelling seen, title-cased per
/// word. Buckets are sorted by display name.
pub fn group_subjects<'a, I>(subjects: I) -> Vec<Bucket>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut buckets: Vec<Bucket> = Vec::new();
    for subject in subjects.into_iter().flatten() {
        let key = normalize_key(subject);
        if key.is_empty() {
            continue;
        }
        match buckets.iter_mut().find(|b| b.key == key) {
            Some(bucket) => bucket.count += 1,
            None => buckets.push(Bucket {
                name: title_case_words(subject.trim()),
                key,
                count: 1,
            }),
        }
    }
    buckets.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    buckets
}

/// True when a stored subject belongs to the bucket for `selected`.
pub fn subject_matches(stored: Option<&str>, selected: &str) -> bool {
    stored.is_some_and(|s| normalize_key(s) == normalize_key(selected))
}

/// Counts material types among rows of the selected subject, in order of
/// first appearance. A missing type counts as a note.
pub fn group_types<'a, I>(rows: I, subject: &str) -> Vec<Bucket>
where
    I: IntoIterator<Item = (Option<&'a str>, Option<&'a str>)>,
{
    let mut buckets: Vec<Bucket> = Vec::new();
    for (material_type, row_subject) in rows {
        if !subject_matches(row_subject, subject) {
            continue;
        }
        let name = material_type.unwrap_or(MaterialType::Note.as_str());
        match buckets.iter_mut().find(|b| b.name == name) {
            Some(bucket) => bucket.count += 1,
            None => buckets.push(Bucket {
                name: name.to_string(),
                key: name.to_string(),
                count: 1,
            }),
        }
    }
    buckets
}

/// Rows of the selected subject, newest first.
pub fn materials_for_subject(materials: Vec<StudyMaterial>, subject: &str) -> Vec<StudyMaterial> {
    let mut materials: Vec<StudyMaterial> = materials
        .into_iter()
        .filter(|m| subject_matches(m.subject.as_deref(), subject))
        .collect();
    materials.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    materials
}
