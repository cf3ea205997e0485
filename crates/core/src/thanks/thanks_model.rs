use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::materials::RecordId;
use crate::utils::time_utils::time_ago_label;

/// Name stored for notes sent anonymously.
pub const ANONYMOUS_STUDENT: &str = "Anonymous Student";

/// Recipient stored when no contributor was named.
pub const ALL_CONTRIBUTORS: &str = "All Contributors";

/// A thank-you message addressed to contributors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThankYouNote {
    pub id: RecordId,
    pub student_name: String,
    pub message: String,
    pub contributor_name: String,
    pub created_at: DateTime<Utc>,
}

impl ThankYouNote {
    pub fn time_ago(&self, now: DateTime<Utc>) -> String {
        time_ago_label(self.created_at, now)
    }
}

/// Form input for a thank-you note.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewThankYouNote {
    pub student_name: String,
    pub message: String,
    pub contributor_name: String,
    pub anonymous: bool,
}

/// Row sent to the table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ThankYouNoteRow {
    pub student_name: String,
    pub message: String,
    pub contributor_name: String,
    pub created_at: DateTime<Utc>,
}

impl NewThankYouNote {
    /// Resolves anonymous senders and unnamed recipients into the stored row.
    pub fn into_row(self, now: DateTime<Utc>) -> Result<ThankYouNoteRow> {
        let message = self.message.trim().to_string();
        if message.is_empty() {
            return Err(Error::missing_field("message"));
        }
        let student_name = if self.anonymous {
            ANONYMOUS_STUDENT.to_string()
        } else {
            let name = self.student_name.trim();
            if name.is_empty() {
                return Err(Error::missing_field("student_name"));
            }
            name.to_string()
        };
        let contributor_name = match self.contributor_name.trim() {
            "" => ALL_CONTRIBUTORS.to_string(),
            name => name.to_string(),
        };
        Ok(ThankYouNoteRow {
            student_name,
            message,
            contributor_name,
            created_at: now,
        })
    }
}

/// Notes addressed to `contributor`; `None` keeps everything.
pub fn filter_by_contributor<'a>(
    notes: &'a [ThankYouNote],
    contributor: Option<&str>,
) -> Vec<&'a ThankYouNote> {
    notes
        .iter()
        .filter(|n| contributor.map_or(true, |c| n.contributor_name == c))
        .collect()
}
