//! Navigation state for the browse drill-down.
//!
//! Every move issues a [`BrowseRequest`] tagged with a fresh generation. Only
//! the result for the latest generation is applied, so a slow response for a
//! level the user already left never replaces the current one.

use log::{debug, warn};

use super::browse_model::{BrowseItems, BrowseLevel};

/// A load the caller must perform for the navigator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseRequest {
    pub generation: u64,
    pub level: BrowseLevel,
}

#[derive(Debug, Clone, Default)]
pub struct BrowseNavigator {
    level: BrowseLevel,
    items: Option<BrowseItems>,
    search: String,
    loading: bool,
    generation: u64,
}

impl BrowseNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the navigator on the grade list.
    pub fn start(&mut self) -> BrowseRequest {
        self.open(BrowseLevel::Grades)
    }

    /// Opens the navigator directly on the subjects of `grade`.
    pub fn start_at_grade(&mut self, grade: &str) -> BrowseRequest {
        self.open(BrowseLevel::Subjects {
            grade: grade.to_string(),
        })
    }

    pub fn level(&self) -> &BrowseLevel {
        &self.level
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: &str) {
        self.search = query.to_string();
    }

    /// Items of the current level after the local search filter.
    pub fn visible_items(&self) -> Option<BrowseItems> {
        self.items.as_ref().map(|items| items.filtered(&self.search))
    }

    /// Descends into the named item of the current level.
    ///
    /// Returns `None` when the current level has nothing below it.
    pub fn select(&mut self, name: &str) -> Option<BrowseRequest> {
        let next = match &self.level {
            BrowseLevel::Grades => BrowseLevel::Subjects {
                grade: name.to_string(),
            },
            BrowseLevel::Subjects { grade } => BrowseLevel::Types {
                grade: grade.clone(),
                subject: name.to_string(),
            },
            BrowseLevel::Types { grade, subject } => BrowseLevel::Materials {
                grade: grade.clone(),
                subject: subject.clone(),
                material_type: name.to_string(),
            },
            BrowseLevel::Materials { .. } => return None,
        };
        Some(self.open(next))
    }

    /// Pops one level. Returns `None` at the top.
    pub fn back(&mut self) -> Option<BrowseRequest> {
        if self.level == BrowseLevel::Grades {
            return None;
        }
        let parent = self.level.parent();
        Some(self.open(parent))
    }

    /// Returns to the grade list.
    pub fn home(&mut self) -> BrowseRequest {
        self.open(BrowseLevel::Grades)
    }

    /// Applies a load result. Returns false when the result was superseded.
    pub fn apply(&mut self, generation: u64, items: BrowseItems) -> bool {
        if generation != self.generation {
            debug!(
                "Discarding browse result for generation {} (latest {})",
                generation, self.generation
            );
            return false;
        }
        self.items = Some(items);
        self.loading = false;
        true
    }

    /// Records a failed load; the level shows no items.
    pub fn fail(&mut self, generation: u64, message: &str) -> bool {
        if generation != self.generation {
            return false;
        }
        warn!("Error loading {:?}: {}", self.level, message);
        self.items = None;
        self.loading = false;
        true
    }

    fn open(&mut self, level: BrowseLevel) -> BrowseRequest {
        self.generation += 1;
        self.level = level.clone();
        self.items = None;
        self.search.clear();
        self.loading = true;
        BrowseRequest {
            generation: self.generation,
            level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse::Bucket;

    fn bucket(name: &str) -> Bucket {
        Bucket {
            name: name.to_string(),
            key: name.to_lowercase(),
            count: 1,
        }
    }

    #[test]
    fn test_drill_down_and_back() {
        let mut nav = BrowseNavigator::new();
        nav.start();
        nav.select("Grade 10").unwrap();
        nav.select("Maths").unwrap();
        let request = nav.select("Past Paper").unwrap();
        assert_eq!(
            request.level,
            BrowseLevel::Materials {
                grade: "Grade 10".into(),
                subject: "Maths".into(),
                material_type: "Past Paper".into(),
            }
        );
        assert!(nav.select("anything").is_none());

        let request = nav.back().unwrap();
        assert_eq!(request.level.breadcrumb(), "Grade 10 > Maths");
        assert_eq!(nav.home().level, BrowseLevel::Grades);
        assert!(nav.back().is_none());
    }

    #[test]
    fn test_superseded_result_is_discarded() {
        let mut nav = BrowseNavigator::new();
        let grades = nav.start();
        let subjects = nav.select("Grade 10").unwrap();

        assert!(!nav.apply(grades.generation, BrowseItems::Grades(vec![bucket("Grade 1-5")])));
        assert!(nav.is_loading());
        assert!(nav.visible_items().is_none());

        assert!(nav.apply(subjects.generation, BrowseItems::Subjects(vec![bucket("Maths")])));
        assert!(!nav.is_loading());
        assert_eq!(nav.visible_items().map(|i| i.len()), Some(1));
    }

    #[test]
    fn test_start_at_grade_and_search_reset() {
        let mut nav = BrowseNavigator::new();
        let request = nav.start_at_grade("Grade 11 (O/L)");
        nav.apply(
            request.generation,
            BrowseItems::Subjects(vec![bucket("Maths"), bucket("Science")]),
        );
        nav.set_search("sci");
        assert_eq!(nav.visible_items().map(|i| i.len()), Some(1));

        nav.back();
        assert_eq!(nav.search(), "");
        assert_eq!(nav.level(), &BrowseLevel::Grades);
    }

    #[test]
    fn test_failure_clears_items() {
        let mut nav = BrowseNavigator::new();
        let request = nav.start();
        assert!(nav.fail(request.generation, "offline"));
        assert!(!nav.is_loading());
        assert!(nav.visible_items().is_none());
    }
}
