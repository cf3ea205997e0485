//! Translates listing filters into a select on the materials table.

use super::listing_model::{ListingFilters, SortKey};
use crate::constants::NOTES_TABLE;
use crate::errors::ValidationError;
use crate::query::{Order, SelectQuery};

/// Columns matched by the free-text search.
pub const SEARCH_COLUMNS: [&str; 4] = ["title", "subject", "grade", "author"];

/// Parses the year filter. An empty value means no constraint.
pub fn parse_year(value: &str) -> Result<Option<i32>, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<i32>()
        .map(Some)
        .map_err(|_| ValidationError::InvalidYear(value.to_string()))
}

pub fn sort_order(sort: SortKey) -> Order {
    match sort {
        SortKey::Newest => Order::desc("created_at"),
        SortKey::Oldest => Order::asc("created_at"),
        SortKey::MostDownloaded => Order::desc("downloads"),
        SortKey::Alphabetical => Order::asc("title"),
    }
}

/// Builds the listing select for the given filters.
///
/// Only filters that are actually set produce predicates. A year that is not a
/// number is rejected rather than sent as a predicate that can never match.
pub fn build_listing_query(filters: &ListingFilters) -> Result<SelectQuery, ValidationError> {
    let mut query = SelectQuery::new(NOTES_TABLE);

    let search = filters.search.trim();
    if !search.is_empty() {
        query = query.contains_any(&SEARCH_COLUMNS, search);
    }

    for (column, value) in [
        ("medium", &filters.medium),
        ("grade", &filters.grade),
        ("type", &filters.material_type),
    ] {
        if !value.is_empty() {
            query = query.eq(column, value.as_str());
        }
    }

    if let Some(year) = parse_year(&filters.year)? {
        query = query.eq("year", year);
    }

    if !filters.subject.is_empty() {
        query = query.eq("subject", filters.subject.as_str());
    }

    Ok(query.order_by(sort_order(filters.sort)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Filter, MemoryDataClient, DataClient};
    use serde_json::json;

    #[test]
    fn test_default_filters_emit_only_ordering() {
        let query = build_listing_query(&ListingFilters::default()).unwrap();
        assert_eq!(query.table, "notes");
        assert_eq!(query.columns, "*");
        assert!(query.filters.is_empty());
        assert_eq!(query.order, Some(Order::desc("created_at")));
    }

    #[test]
    fn test_each_set_filter_emits_exactly_one_predicate() {
        let filters = ListingFilters {
            medium: "Tamil".to_string(),
            grade: "Grade 10".to_string(),
            material_type: "Past Paper".to_string(),
            year: "2021".to_string(),
            subject: "Physics".to_string(),
            ..Default::default()
        };

        let query = build_listing_query(&filters).unwrap();

        assert_eq!(
            query.filters,
            vec![
                Filter::eq("medium", "Tamil"),
                Filter::eq("grade", "Grade 10"),
                Filter::eq("type", "Past Paper"),
                Filter::eq("year", 2021),
                Filter::eq("subject", "Physics"),
            ]
        );
    }

    #[test]
    fn test_single_filter_omits_the_others() {
        let filters = ListingFilters {
            grade: "Grade 6-9".to_string(),
            ..Default::default()
        };
        let query = build_listing_query(&filters).unwrap();
        assert_eq!(query.filters, vec![Filter::eq("grade", "Grade 6-9")]);
    }

    #[test]
    fn test_search_is_one_or_group_over_four_columns() {
        let filters = ListingFilters {
            search: " bio ".to_string(),
            ..Default::default()
        };
        let query = build_listing_query(&filters).unwrap();
        assert_eq!(
            query.filters,
            vec![Filter::Or(vec![
                Filter::contains_ci("title", "bio"),
                Filter::contains_ci("subject", "bio"),
                Filter::contains_ci("grade", "bio"),
                Filter::contains_ci("author", "bio"),
            ])]
        );
    }

    #[test]
    fn test_year_parses_to_integer_constraint() {
        assert_eq!(parse_year("2021"), Ok(Some(2021)));
        assert_eq!(parse_year(" 2019 "), Ok(Some(2019)));
        assert_eq!(parse_year(""), Ok(None));
    }

    #[test]
    fn test_non_numeric_year_is_rejected() {
        let filters = ListingFilters {
            year: "abc".to_string(),
            ..Default::default()
        };
        assert_eq!(
            build_listing_query(&filters),
            Err(ValidationError::InvalidYear("abc".to_string()))
        );
    }

    #[test]
    fn test_sort_keys_map_to_single_ordering() {
        assert_eq!(sort_order(SortKey::Oldest), Order::asc("created_at"));
        assert_eq!(sort_order(SortKey::MostDownloaded), Order::desc("downloads"));
        assert_eq!(sort_order(SortKey::Alphabetical), Order::asc("title"));
    }

    #[tokio::test]
    async fn test_search_matches_title_or_author_only_when_present() {
        let client = MemoryDataClient::new();
        client
            .seed(
                NOTES_TABLE,
                vec![
                    json!({ "id": 1, "title": "Biology Notes", "subject": "Science", "grade": "Grade 10", "author": "Nimal" }),
                    json!({ "id": 2, "title": "Term Test", "subject": "Science", "grade": "Grade 10", "author": "Biological Kid" }),
                    json!({ "id": 3, "title": "Algebra", "subject": "Maths", "grade": "Grade 10", "author": "Saman" }),
                ],
            )
            .unwrap();
        let filters = ListingFilters {
            search: "bio".to_string(),
            ..Default::default()
        };

        let query = build_listing_query(&filters).unwrap();
        let rows = client.select(&query).await.unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r["id"].clone()).collect();

        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&json!(1)));
        assert!(ids.contains(&json!(2)));
    }
}
