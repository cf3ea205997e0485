use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_REQUEST_GRADE;
use crate::errors::{Error, Result};
use crate::materials::{Grade, RecordId};
use crate::utils::serde_utils::null_as_default;

/// A student's request for material that is not on the site yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialRequest {
    pub id: RecordId,
    #[serde(default)]
    pub student_name: Option<String>,
    pub subject: String,
    pub grade: String,
    #[serde(default)]
    pub note_content: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub upvotes: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fulfilled: bool,
    pub created_at: DateTime<Utc>,
}

/// Input model for posting a request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMaterialRequest {
    pub student_name: String,
    pub subject: String,
    pub grade: String,
    pub note_content: String,
}

impl Default for NewMaterialRequest {
    fn default() -> Self {
        Self {
            student_name: String::new(),
            subject: String::new(),
            grade: DEFAULT_REQUEST_GRADE.to_string(),
            note_content: String::new(),
        }
    }
}

impl NewMaterialRequest {
    pub fn validated(mut self) -> Result<Self> {
        self.student_name = self.student_name.trim().to_string();
        self.subject = self.subject.trim().to_string();
        self.note_content = self.note_content.trim().to_string();

        for (field, value) in [
            ("student_name", &self.student_name),
            ("subject", &self.subject),
            ("note_content", &self.note_content),
        ] {
            if value.is_empty() {
                return Err(Error::missing_field(field));
            }
        }

        self.grade = if self.grade.trim().is_empty() {
            DEFAULT_REQUEST_GRADE.to_string()
        } else {
            self.grade.parse::<Grade>()?.as_str().to_string()
        };
        Ok(self)
    }
}

/// Locally held request list with optimistic updates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestBoard {
    pub requests: Vec<MaterialRequest>,
}

impl RequestBoard {
    pub fn new(requests: Vec<MaterialRequest>) -> Self {
        Self { requests }
    }

    /// Puts a freshly posted request at the top.
    pub fn prepend(&mut self, request: MaterialRequest) {
        self.requests.insert(0, request);
    }

    /// Bumps the local upvote count. Returns the request as it was before.
    pub fn upvote_locally(&mut self, id: &RecordId) -> Option<MaterialRequest> {
        let request = self.requests.iter_mut().find(|r| &r.id == id)?;
        let before = request.clone();
        request.upvotes += 1;
        Some(before)
    }

    pub fn open_requests(&self) -> impl Iterator<Item = &MaterialRequest> {
        self.requests.iter().filter(|r| !r.fulfilled)
    }
}
