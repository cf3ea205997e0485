//! Backend-agnostic query description.
//!
//! Services describe what they want from the hosted table with these types;
//! adapters render them into their own wire format.

use std::cmp::Ordering;

use serde_json::Value;

/// A row returned by the data collaborator (always a JSON object).
pub type Row = Value;

/// Selects every column.
pub const ALL_COLUMNS: &str = "*";

/// Predicate applied to a remote table.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Column equals value.
    Eq { column: String, value: Value },
    /// Case-insensitive substring match on a text column.
    ContainsCi { column: String, needle: String },
    /// Logical OR over the nested filters.
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn contains_ci(column: impl Into<String>, needle: impl Into<String>) -> Self {
        Filter::ContainsCi {
            column: column.into(),
            needle: needle.into(),
        }
    }

    /// Evaluates the predicate against a row the way the hosted table would.
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Filter::Eq { column, value } => row.get(column) == Some(value),
            Filter::ContainsCi { column, needle } => row
                .get(column)
                .and_then(Value::as_str)
                .map(|text| text.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(row)),
        }
    }
}

/// Single-column ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

impl Order {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }

    /// Compares two rows on the order column.
    ///
    /// NULL sorts after every value, so it comes last ascending and first
    /// descending, matching PostgreSQL defaults.
    pub fn compare(&self, a: &Row, b: &Row) -> Ordering {
        let ordering = compare_values(a.get(&self.column), b.get(&self.column));
        if self.ascending {
            ordering
        } else {
            ordering.reverse()
        }
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

/// A select against one table.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub table: String,
    pub columns: String,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
}

impl SelectQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: ALL_COLUMNS.to_string(),
            filters: Vec::new(),
            order: None,
        }
    }

    pub fn columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(Filter::eq(column, value))
    }

    /// Adds one OR group matching `needle` against any of `columns`.
    pub fn contains_any(self, columns: &[&str], needle: &str) -> Self {
        let any = columns
            .iter()
            .map(|column| Filter::contains_ci(*column, needle))
            .collect();
        self.filter(Filter::Or(any))
    }

    pub fn order_by(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    /// Column names requested, or `None` for all columns.
    pub fn projection(&self) -> Option<Vec<&str>> {
        if self.columns.trim() == ALL_COLUMNS {
            return None;
        }
        Some(
            self.columns
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .collect(),
        )
    }

    pub fn matches(&self, row: &Row) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contains_ci_matches_substring_ignoring_case() {
        let row = json!({ "title": "Biology Notes", "author": null });
        assert!(Filter::contains_ci("title", "bio").matches(&row));
        assert!(Filter::contains_ci("title", "NOTES").matches(&row));
        assert!(!Filter::contains_ci("author", "bio").matches(&row));
        assert!(!Filter::contains_ci("missing", "bio").matches(&row));
    }

    #[test]
    fn test_eq_compares_numbers_and_strings() {
        let row = json!({ "year": 2021, "grade": "Grade 10" });
        assert!(Filter::eq("year", 2021).matches(&row));
        assert!(!Filter::eq("year", "2021").matches(&row));
        assert!(Filter::eq("grade", "Grade 10").matches(&row));
    }

    #[test]
    fn test_order_puts_nulls_last_ascending_and_first_descending() {
        let a = json!({ "downloads": 3 });
        let b = json!({ "downloads": null });
        assert_eq!(Order::asc("downloads").compare(&a, &b), Ordering::Less);
        assert_eq!(Order::desc("downloads").compare(&a, &b), Ordering::Greater);
    }

    #[test]
    fn test_projection() {
        assert_eq!(SelectQuery::new("notes").projection(), None);
        assert_eq!(
            SelectQuery::new("notes")
                .columns("type, subject")
                .projection(),
            Some(vec!["type", "subject"])
        );
    }
}
