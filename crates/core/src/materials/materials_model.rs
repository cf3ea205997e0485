//! Study material domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{ANONYMOUS_AUTHOR_PREFIX, ANONYMOUS_DISPLAY_NAME, GRADE_ORDER};
use crate::errors::{Error, Result, ValidationError};
use crate::utils::serde_utils::null_as_default;

/// Primary key of a remote row. The hosted table may use integer or text keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{}", id),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

impl From<RecordId> for Value {
    fn from(id: RecordId) -> Self {
        match id {
            RecordId::Int(id) => Value::from(id),
            RecordId::Text(id) => Value::from(id),
        }
    }
}

impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().parse::<i64>() {
            Ok(id) => RecordId::Int(id),
            Err(_) => RecordId::Text(s.trim().to_string()),
        })
    }
}

/// Grade levels offered by the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grade {
    Primary,
    JuniorSecondary,
    Grade10,
    OrdinaryLevel,
    AdvancedLevel,
}

impl Grade {
    pub const ALL: [Grade; 5] = [
        Grade::Primary,
        Grade::JuniorSecondary,
        Grade::Grade10,
        Grade::OrdinaryLevel,
        Grade::AdvancedLevel,
    ];

    pub fn as_str(&self) -> &'static str {
        GRADE_ORDER[self.rank()]
    }

    /// Position in display order.
    pub fn rank(&self) -> usize {
        match self {
            Grade::Primary => 0,
            Grade::JuniorSecondary => 1,
            Grade::Grade10 => 2,
            Grade::OrdinaryLevel => 3,
            Grade::AdvancedLevel => 4,
        }
    }
}

impl FromStr for Grade {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Grade::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ValidationError::InvalidInput(format!("Unknown grade '{}'", s)).into()
            })
    }
}

/// Display-order rank of a grade label; `None` for labels outside the fixed set.
pub fn grade_rank(label: &str) -> Option<usize> {
    GRADE_ORDER.iter().position(|g| *g == label)
}

/// Kinds of material that can be shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialType {
    Note,
    PastPaper,
    MarkingScheme,
    ModelPaper,
    Textbook,
    Revision,
}

impl MaterialType {
    pub const ALL: [MaterialType; 6] = [
        MaterialType::Note,
        MaterialType::PastPaper,
        MaterialType::MarkingScheme,
        MaterialType::ModelPaper,
        MaterialType::Textbook,
        MaterialType::Revision,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialType::Note => "Note",
            MaterialType::PastPaper => "Past Paper",
            MaterialType::MarkingScheme => "Marking Scheme",
            MaterialType::ModelPaper => "Model Paper",
            MaterialType::Textbook => "Textbook",
            MaterialType::Revision => "Revision",
        }
    }
}

impl FromStr for MaterialType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().replace(['-', '_'], " ");
        MaterialType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| {
                ValidationError::InvalidInput(format!("Unknown material type '{}'", s)).into()
            })
    }
}

/// A shared study material row from the `notes` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudyMaterial {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub grade: String,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(rename = "type", default)]
    pub material_type: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub downloads: i64,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_size: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl StudyMaterial {
    /// Type label, treating a missing type as a plain note.
    pub fn type_label(&self) -> &str {
        self.material_type
            .as_deref()
            .unwrap_or(MaterialType::Note.as_str())
    }

    pub fn author_display(&self) -> &str {
        author_display(self.author.as_deref())
    }

    pub fn is_anonymous(&self) -> bool {
        self.author
            .as_deref()
            .map(|a| a.starts_with(ANONYMOUS_AUTHOR_PREFIX))
            .unwrap_or(true)
    }
}

/// Public name for an author field; anonymous tags and blanks read "Anonymous".
pub fn author_display(author: Option<&str>) -> &str {
    match author {
        Some(a) if !a.is_empty() && !a.starts_with(ANONYMOUS_AUTHOR_PREFIX) => a,
        _ => ANONYMOUS_DISPLAY_NAME,
    }
}

/// Generates a short anonymous author tag such as `Anon#4F2A`.
pub fn anonymous_author_tag() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
    format!("{}{}", ANONYMOUS_AUTHOR_PREFIX, &id[..4])
}

/// Input model for publishing a material whose file is already hosted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewStudyMaterial {
    pub title: String,
    pub subject: String,
    pub grade: String,
    pub medium: String,
    #[serde(rename = "type")]
    pub material_type: String,
    pub author: String,
    pub year: Option<i32>,
    pub file_url: String,
    pub file_size: Option<String>,
}

impl NewStudyMaterial {
    /// Trims fields, checks the required ones and fills in an anonymous author.
    pub fn validated(mut self) -> Result<Self> {
        self.title = self.title.trim().to_string();
        self.subject = self.subject.trim().to_string();
        self.author = self.author.trim().to_string();
        self.file_url = self.file_url.trim().to_string();

        for (field, value) in [
            ("title", &self.title),
            ("subject", &self.subject),
            ("file_url", &self.file_url),
        ] {
            if value.is_empty() {
                return Err(Error::missing_field(field));
            }
        }

        self.grade = self.grade.parse::<Grade>()?.as_str().to_string();
        self.material_type = self
            .material_type
            .parse::<MaterialType>()?
            .as_str()
            .to_string();

        if self.author.is_empty() {
            self.author = anonymous_author_tag();
        }
        Ok(self)
    }
}

/// Aggregate counters shown on the landing page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTotals {
    pub total_downloads: i64,
    pub total_materials: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_row_with_nulls() {
        let row = json!({
            "id": 12,
            "title": "Biology Notes",
            "subject": "Biology",
            "grade": "Grade 10",
            "medium": "English",
            "type": null,
            "author": "Anon#1A2B",
            "year": null,
            "downloads": null,
            "file_url": "https://files.example/bio.pdf",
            "file_size": "1.2 MB",
            "created_at": "2024-03-01T10:00:00.123456+00:00"
        });

        let material: StudyMaterial = serde_json::from_value(row).unwrap();

        assert_eq!(material.id, RecordId::Int(12));
        assert_eq!(material.downloads, 0);
        assert_eq!(material.type_label(), "Note");
        assert_eq!(material.author_display(), "Anonymous");
        assert!(material.is_anonymous());
    }

    #[test]
    fn test_record_id_keeps_json_shape() {
        assert_eq!(Value::from(RecordId::Int(5)), json!(5));
        assert_eq!(Value::from("abc".parse::<RecordId>().unwrap()), json!("abc"));
        assert_eq!("42".parse::<RecordId>().unwrap(), RecordId::Int(42));
    }

    #[test]
    fn test_material_type_parse_accepts_cli_spellings() {
        assert_eq!(
            "past-paper".parse::<MaterialType>().unwrap(),
            MaterialType::PastPaper
        );
        assert_eq!(
            "Marking Scheme".parse::<MaterialType>().unwrap(),
            MaterialType::MarkingScheme
        );
        assert!("poster".parse::<MaterialType>().is_err());
    }

    #[test]
    fn test_new_material_validation_fills_anonymous_author() {
        let material = NewStudyMaterial {
            title: "  Algebra ".to_string(),
            subject: "Maths".to_string(),
            grade: "grade 10".to_string(),
            medium: "English".to_string(),
            material_type: "note".to_string(),
            author: " ".to_string(),
            year: Some(2023),
            file_url: "https://files.example/a.pdf".to_string(),
            file_size: None,
        }
        .validated()
        .unwrap();

        assert_eq!(material.title, "Algebra");
        assert_eq!(material.grade, "Grade 10");
        assert!(material.author.starts_with("Anon#"));
        assert_eq!(material.author.len(), 9);
    }

    #[test]
    fn test_new_material_requires_file_url() {
        let result = NewStudyMaterial {
            title: "Algebra".to_string(),
            subject: "Maths".to_string(),
            grade: "Grade 10".to_string(),
            medium: "English".to_string(),
            material_type: "Note".to_string(),
            author: "Kamal".to_string(),
            year: None,
            file_url: String::new(),
            file_size: None,
        }
        .validated();

        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::MissingField(f))) if f == "file_url"
        ));
    }

    #[test]
    fn test_grade_rank() {
        assert_eq!(grade_rank("Grade 1-5"), Some(0));
        assert_eq!(grade_rank("Grade 12-13 (A/L)"), Some(4));
        assert_eq!(grade_rank("University"), None);
    }
}
