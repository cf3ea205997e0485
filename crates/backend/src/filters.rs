//! Renders [`SelectQuery`] values into PostgREST query parameters.
//!
//! Top-level filters become `column=op.value` pairs. An OR group becomes a
//! single `or=(...)` parameter whose members use `column.op.value`; values
//! inside a group are double-quoted when they contain characters reserved by
//! the list syntax.

use serde_json::Value;
use studyshare_core::query::{Filter, Order, SelectQuery};

const RESERVED: &[char] = &[',', '(', ')', '.', ':', '"', '\\', ' '];

/// Query parameters for a select, in a stable order.
pub fn select_params(query: &SelectQuery) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), compact_columns(&query.columns))];
    params.extend(filter_params(&query.filters));
    if let Some(order) = &query.order {
        params.push(("order".to_string(), render_order(order)));
    }
    params
}

/// Query parameters for a set of filters (used by updates too).
pub fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
    filters.iter().map(render_top_level).collect()
}

fn compact_columns(columns: &str) -> String {
    columns
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

fn render_order(order: &Order) -> String {
    let direction = if order.ascending { "asc" } else { "desc" };
    format!("{}.{}", order.column, direction)
}

fn render_top_level(filter: &Filter) -> (String, String) {
    match filter {
        Filter::Eq { column, value } => (column.clone(), render_eq(value, false)),
        Filter::ContainsCi { column, needle } => (column.clone(), render_ilike(needle, false)),
        Filter::Or(members) => ("or".to_string(), render_group(members)),
    }
}

fn render_group(members: &[Filter]) -> String {
    let parts: Vec<String> = members.iter().map(render_member).collect();
    format!("({})", parts.join(","))
}

fn render_member(filter: &Filter) -> String {
    match filter {
        Filter::Eq { column, value } => format!("{}.{}", column, render_eq(value, true)),
        Filter::ContainsCi { column, needle } => {
            format!("{}.{}", column, render_ilike(needle, true))
        }
        Filter::Or(members) => format!("or{}", render_group(members)),
    }
}

fn render_eq(value: &Value, in_group: bool) -> String {
    match value {
        Value::Null => "is.null".to_string(),
        Value::String(s) => format!("eq.{}", escape(s, in_group)),
        other => format!("eq.{}", other),
    }
}

fn render_ilike(needle: &str, in_group: bool) -> String {
    format!("ilike.{}", escape(&format!("*{}*", needle), in_group))
}

fn escape(value: &str, in_group: bool) -> String {
    if !in_group || !value.contains(RESERVED) {
        return value.to_string();
    }
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(params: &[(String, String)]) -> Vec<(&str, &str)> {
        params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn test_listing_query_renders_search_group_and_order() {
        let query = SelectQuery::new("notes")
            .contains_any(&["title", "subject"], "bio")
            .eq("grade", "Grade 10")
            .eq("year", 2021)
            .order_by(Order::desc("created_at"));

        assert_eq!(
            pairs(&select_params(&query)),
            vec![
                ("select", "*"),
                ("or", "(title.ilike.*bio*,subject.ilike.*bio*)"),
                ("grade", "eq.Grade 10"),
                ("year", "eq.2021"),
                ("order", "created_at.desc"),
            ]
        );
    }

    #[test]
    fn test_group_values_with_reserved_characters_are_quoted() {
        let query = SelectQuery::new("notes").contains_any(&["title"], "a, \"b\"");
        assert_eq!(
            select_params(&query)[1].1,
            r#"(title.ilike."*a, \"b\"*")"#
        );
    }

    #[test]
    fn test_columns_and_null_equality() {
        let query = SelectQuery::new("notes")
            .columns("type, subject")
            .eq("author", Value::Null);
        assert_eq!(
            pairs(&select_params(&query)),
            vec![("select", "type,subject"), ("author", "is.null")]
        );
    }

    #[test]
    fn test_nested_or_group() {
        let filter = Filter::Or(vec![
            Filter::eq("fulfilled", true),
            Filter::Or(vec![Filter::eq("upvotes", 0)]),
        ]);
        assert_eq!(
            filter_params(&[filter]),
            vec![(
                "or".to_string(),
                "(fulfilled.eq.true,or(upvotes.eq.0))".to_string()
            )]
        );
    }

    #[test]
    fn test_null_inside_group_renders_is_null() {
        let filter = Filter::Or(vec![
            Filter::eq("type", "Note"),
            Filter::eq("type", Value::Null),
        ]);
        assert_eq!(
            filter_params(&[filter]),
            vec![("or".to_string(), "(type.eq.Note,type.is.null)".to_string())]
        );
    }
}
