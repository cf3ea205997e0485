//! Turns batches of change notifications into one refresh plan.

use log::debug;

use super::change_event::{ChangeEvent, ChangeKind};
use crate::materials::{RecordId, StudyMaterial};
use crate::query::decode_row;

/// What the listing view has to refetch after remote changes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RefreshPlan {
    pub refresh_totals: bool,
    pub refresh_listing: bool,
    pub refresh_subjects: bool,
    /// Updated rows delivered with the notification, newest version per id.
    pub patched_rows: Vec<StudyMaterial>,
}

impl RefreshPlan {
    pub fn is_empty(&self) -> bool {
        !self.refresh_totals
            && !self.refresh_listing
            && !self.refresh_subjects
            && self.patched_rows.is_empty()
    }

    /// Plan for a single inserted row: everything is stale.
    pub fn full() -> Self {
        Self {
            refresh_totals: true,
            refresh_listing: true,
            refresh_subjects: true,
            patched_rows: Vec::new(),
        }
    }
}

/// Plans the refresh for a batch of events on `table`.
///
/// - Update: aggregate counters only; the changed row is patched in place when
///   the notification carries it.
/// - Insert: counters, the filtered listing and the subject list.
/// - Delete and other tables: ignored.
///
/// Returns `None` when nothing needs refreshing.
pub fn plan_refresh(events: &[ChangeEvent], table: &str) -> Option<RefreshPlan> {
    let mut plan = RefreshPlan::default();

    for event in events.iter().filter(|e| e.table == table) {
        match event.kind {
            ChangeKind::Update => {
                plan.refresh_totals = true;
                if let Some(record) = &event.record {
                    match decode_row::<StudyMaterial>(record.clone()) {
                        Ok(material) => upsert_patch(&mut plan.patched_rows, material),
                        Err(e) => debug!("Ignoring undecodable change payload: {}", e),
                    }
                }
            }
            ChangeKind::Insert => {
                plan.refresh_totals = true;
                plan.refresh_listing = true;
                plan.refresh_subjects = true;
            }
            ChangeKind::Delete => {}
        }
    }

    if plan.is_empty() {
        None
    } else {
        Some(plan)
    }
}

fn upsert_patch(patches: &mut Vec<StudyMaterial>, material: StudyMaterial) {
    let id: RecordId = material.id.clone();
    match patches.iter_mut().find(|p| p.id == id) {
        Some(existing) => *existing = material,
        None => patches.push(material),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NOTES_TABLE;
    use serde_json::json;

    fn record(id: i64, downloads: i64) -> serde_json::Value {
        json!({
            "id": id,
            "title": "Physics",
            "grade": "Grade 10",
            "downloads": downloads,
            "created_at": "2024-01-01T00:00:00+00:00"
        })
    }

    #[test]
    fn test_update_refreshes_counters_only() {
        let plan = plan_refresh(&[ChangeEvent::update(NOTES_TABLE, None)], NOTES_TABLE).unwrap();
        assert!(plan.refresh_totals);
        assert!(!plan.refresh_listing);
        assert!(!plan.refresh_subjects);
    }

    #[test]
    fn test_insert_refreshes_everything() {
        let plan = plan_refresh(&[ChangeEvent::insert(NOTES_TABLE)], NOTES_TABLE).unwrap();
        assert_eq!(plan, RefreshPlan::full());
    }

    #[test]
    fn test_burst_of_inserts_collapses_into_one_plan() {
        let events = vec![
            ChangeEvent::insert(NOTES_TABLE),
            ChangeEvent::insert(NOTES_TABLE),
            ChangeEvent::insert(NOTES_TABLE),
        ];
        assert_eq!(plan_refresh(&events, NOTES_TABLE), Some(RefreshPlan::full()));
    }

    #[test]
    fn test_update_payloads_keep_latest_version_per_row() {
        let events = vec![
            ChangeEvent::update(NOTES_TABLE, Some(record(1, 4))),
            ChangeEvent::update(NOTES_TABLE, Some(record(2, 1))),
            ChangeEvent::update(NOTES_TABLE, Some(record(1, 5))),
        ];
        let plan = plan_refresh(&events, NOTES_TABLE).unwrap();
        let downloads: Vec<(RecordId, i64)> = plan
            .patched_rows
            .iter()
            .map(|m| (m.id.clone(), m.downloads))
            .collect();
        assert_eq!(
            downloads,
            vec![(RecordId::Int(1), 5), (RecordId::Int(2), 1)]
        );
    }

    #[test]
    fn test_deletes_and_other_tables_are_ignored() {
        let events = vec![
            ChangeEvent {
                table: NOTES_TABLE.to_string(),
                kind: ChangeKind::Delete,
                record: None,
            },
            ChangeEvent::insert("requests"),
        ];
        assert_eq!(plan_refresh(&events, NOTES_TABLE), None);
    }
}
