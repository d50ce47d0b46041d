//! Pagination and list-query types for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Sort direction for list queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn is_descending(self) -> bool {
        matches!(self, SortDir::Desc)
    }
}

/// Query parameters shared by all list endpoints:
/// substring search, sort key/direction, and pagination.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Substring filter applied to the entity's display field
    pub search_term: Option<String>,
    /// 1-indexed page number
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (capped at the maximum)
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    /// Sort key; each endpoint documents its accepted values
    pub sort_by: Option<String>,
    /// Sort direction
    #[serde(default)]
    pub sort_dir: SortDir,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl ListQuery {
    /// Zero-indexed page for the database paginator
    pub fn page_index(&self) -> u64 {
        self.page.saturating_sub(1)
    }

    /// Get limit capped at maximum
    pub fn limit(&self) -> u64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Lower-cased sort key, if any
    pub fn sort_key(&self) -> Option<String> {
        self.sort_by.as_ref().map(|s| s.to_lowercase())
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search_term: None,
            page: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: None,
            sort_dir: SortDir::Asc,
        }
    }
}

/// Paginated response wrapper (reusable for all list responses)
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Create new paginated response
    pub fn new(data: Vec<T>, page: u64, page_size: u64, total: u64) -> Self {
        let total_pages = if page_size > 0 {
            total.div_ceil(page_size)
        } else {
            0
        };

        Self {
            data,
            meta: PaginationMeta {
                page,
                page_size,
                total,
                total_pages,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_is_capped() {
        let query = ListQuery {
            page_size: 10_000,
            ..Default::default()
        };
        assert_eq!(query.limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_limit_has_floor() {
        let query = ListQuery {
            page_size: 0,
            ..Default::default()
        };
        assert_eq!(query.limit(), 1);
    }

    #[test]
    fn test_page_index_is_zero_based() {
        let query = ListQuery {
            page: 3,
            ..Default::default()
        };
        assert_eq!(query.page_index(), 2);

        let first = ListQuery::default();
        assert_eq!(first.page_index(), 0);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let paginated = Paginated::new(vec![1, 2, 3], 1, 10, 21);
        assert_eq!(paginated.meta.total_pages, 3);
    }

    #[test]
    fn test_camel_case_query_fields() {
        let query: ListQuery = serde_json::from_str(
            r#"{"searchTerm": "acme", "page": 2, "pageSize": 5, "sortBy": "Name", "sortDir": "desc"}"#,
        )
        .unwrap();
        assert_eq!(query.search_term.as_deref(), Some("acme"));
        assert_eq!(query.page, 2);
        assert_eq!(query.page_size, 5);
        assert_eq!(query.sort_key().as_deref(), Some("name"));
        assert!(query.sort_dir.is_descending());
    }
}
