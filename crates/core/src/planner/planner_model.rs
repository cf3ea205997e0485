use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::{Result, StorageError};
use crate::storage::{MigrationFn, VersionedRecord};

/// Daily study hours the planner offers.
pub const HOURS_PER_DAY_CHOICES: [u32; 6] = [2, 3, 4, 5, 6, 8];

pub const DEFAULT_HOURS_PER_DAY: u32 = 4;

/// Storage key of the persisted plan.
pub const STUDY_PLAN_KEY: &str = "studyPlannerData";

/// One day of the generated schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Stable per subject and day index, e.g. `Physics-0`.
    pub id: String,
    pub date: NaiveDate,
    /// Short weekday name.
    pub day: String,
    pub subject: String,
    pub hours: u32,
    pub topic: String,
}

/// How a schedule entry looks relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Completed,
    Today,
    Missed,
    Upcoming,
}

/// Everything the study planner keeps between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub exam_date: Option<NaiveDate>,
    pub subjects: Vec<String>,
    pub hours_per_day: u32,
    pub schedule: Option<Vec<ScheduleEntry>>,
    /// Completion flag per schedule entry id.
    pub completed: BTreeMap<String, bool>,
}

impl Default for StudyPlan {
    fn default() -> Self {
        Self {
            exam_date: None,
            subjects: Vec::new(),
            hours_per_day: DEFAULT_HOURS_PER_DAY,
            schedule: None,
            completed: BTreeMap::new(),
        }
    }
}

const STUDY_PLAN_MIGRATIONS: &[(u32, MigrationFn)] = &[(0, migrate_plan_v0)];

impl VersionedRecord for StudyPlan {
    const STORAGE_KEY: &'static str = STUDY_PLAN_KEY;
    const CURRENT_VERSION: u32 = 1;

    fn migrations() -> &'static [(u32, MigrationFn)] {
        STUDY_PLAN_MIGRATIONS
    }
}

/// Legacy layout: `{ examDate, subjects, schedule, completedTopics }` with the
/// exam date as a `YYYY-MM-DD` string (empty when unset) and no hours setting.
fn migrate_plan_v0(legacy: Value) -> Result<Value> {
    let corrupt = |message: &str| StorageError::Corrupt {
        key: STUDY_PLAN_KEY.to_string(),
        message: message.to_string(),
    };
    let object = legacy
        .as_object()
        .ok_or_else(|| corrupt("legacy plan is not an object"))?;

    let exam_date = match object.get("examDate").and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => Value::from(s.trim()),
        _ => Value::Null,
    };
    let subjects = object.get("subjects").cloned().unwrap_or_else(|| json!([]));
    let schedule = object.get("schedule").cloned().unwrap_or(Value::Null);
    let completed = object
        .get("completedTopics")
        .cloned()
        .unwrap_or_else(|| json!({}));

    Ok(json!({
        "exam_date": exam_date,
        "subjects": subjects,
        "hours_per_day": DEFAULT_HOURS_PER_DAY,
        "schedule": schedule,
        "completed": completed,
    }))
}
