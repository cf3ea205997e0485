//! Planner operations on a [`StudyPlan`].

use chrono::{Duration, NaiveDate};

use super::planner_model::{EntryStatus, ScheduleEntry, StudyPlan, HOURS_PER_DAY_CHOICES};
use crate::errors::{Error, Result, ValidationError};
use crate::utils::time_utils::{days_until, short_weekday};

impl StudyPlan {
    /// Adds a trimmed subject. Returns false for blanks and duplicates.
    pub fn add_subject(&mut self, subject: &str) -> bool {
        let subject = subject.trim();
        if subject.is_empty() || self.subjects.iter().any(|s| s == subject) {
            return false;
        }
        self.subjects.push(subject.to_string());
        true
    }

    pub fn remove_subject(&mut self, subject: &str) {
        self.subjects.retain(|s| s != subject);
    }

    pub fn set_hours_per_day(&mut self, hours: u32) -> Result<()> {
        if !HOURS_PER_DAY_CHOICES.contains(&hours) {
            return Err(ValidationError::InvalidInput(format!(
                "Hours per day must be one of {:?}",
                HOURS_PER_DAY_CHOICES
            ))
            .into());
        }
        self.hours_per_day = hours;
        Ok(())
    }

    /// Days left until the exam; 0 when no date is set or it has passed.
    pub fn days_until_exam(&self, today: NaiveDate) -> i64 {
        self.exam_date
            .map(|exam| days_until(today, exam))
            .unwrap_or(0)
    }

    /// Splits the days until the exam evenly across subjects, in order.
    ///
    /// Each subject gets `days / subjects` consecutive days and the last one
    /// also takes the remainder. Completion flags are kept, so days that keep
    /// their id stay ticked.
    pub fn generate_schedule(&mut self, today: NaiveDate) -> Result<()> {
        if self.exam_date.is_none() || self.subjects.is_empty() {
            return Err(Error::Planner(
                "Please set exam date and add at least one subject".to_string(),
            ));
        }
        let days_left = self.days_until_exam(today);
        if days_left <= 0 {
            return Err(Error::Planner("Exam date must be in the future".to_string()));
        }

        let subject_count = self.subjects.len() as i64;
        let days_per_subject = days_left / subject_count;
        let mut schedule = Vec::with_capacity(days_left as usize);
        let mut offset = 0;

        for (index, subject) in self.subjects.iter().enumerate() {
            let subject_days = if index as i64 == subject_count - 1 {
                days_left - offset
            } else {
                days_per_subject
            };
            for day in 0..subject_days {
                let date = today + Duration::days(offset + day);
                schedule.push(ScheduleEntry {
                    id: format!("{}-{}", subject, day),
                    date,
                    day: short_weekday(date).to_string(),
                    subject: subject.clone(),
                    hours: self.hours_per_day,
                    topic: format!("{} - Day {}", subject, day + 1),
                });
            }
            offset += subject_days;
        }

        self.schedule = Some(schedule);
        Ok(())
    }

    pub fn toggle_complete(&mut self, id: &str) {
        let done = self.completed.entry(id.to_string()).or_insert(false);
        *done = !*done;
    }

    pub fn is_complete(&self, id: &str) -> bool {
        self.completed.get(id).copied().unwrap_or(false)
    }

    /// Number of scheduled days ticked off.
    pub fn completed_count(&self) -> usize {
        self.schedule
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter(|entry| self.is_complete(&entry.id))
            .count()
    }

    /// Completed share of the schedule in whole percent.
    pub fn progress_percent(&self) -> u32 {
        let total = self.schedule.as_ref().map(Vec::len).unwrap_or(0);
        if total == 0 {
            return 0;
        }
        (self.completed_count() as f64 * 100.0 / total as f64).round() as u32
    }

    pub fn entry_status(&self, entry: &ScheduleEntry, today: NaiveDate) -> EntryStatus {
        if self.is_complete(&entry.id) {
            EntryStatus::Completed
        } else if entry.date == today {
            EntryStatus::Today
        } else if entry.date < today {
            EntryStatus::Missed
        } else {
            EntryStatus::Upcoming
        }
    }
}
