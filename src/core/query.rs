//! Query parameters and pagination utilities

use serde::{Deserialize, Serialize};

/// Query parameters accepted by every read endpoint
///
/// # Example
/// ```rust,ignore
/// // In handler:
/// pub async fn list_records(
///     Query(params): Query<ExpansionParams>,
/// ) -> Json<PaginatedResponse<Value>> {
///     // params.fields() defaults to ""
///     // params.limit() defaults to 20
/// }
///
/// // Usage:
/// GET /subjects?fields=name,code
/// GET /subjects?fields=name,grades.grade&expand=grades
/// GET /grades?expand=sections.homeroom_teacher&page=2&limit=10
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExpansionParams {
    /// Comma-separated scalar fields, dotted for expanded relations, or `all`
    pub fields: Option<String>,

    /// Comma-separated relations to inline, dotted for deeper levels
    pub expand: Option<String>,

    /// Page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    20
}

impl Default for ExpansionParams {
    fn default() -> Self {
        Self {
            fields: None,
            expand: None,
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl ExpansionParams {
    pub fn fields(&self) -> &str {
        self.fields.as_deref().unwrap_or_default()
    }

    pub fn expand(&self) -> &str {
        self.expand.as_deref().unwrap_or_default()
    }

    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Get limit, ensuring it doesn't exceed the maximum
    pub fn limit(&self) -> usize {
        self.limit.clamp(1, 100) // Maximum 100 per page, minimum 1
    }

    /// Number of records to skip for the current page
    pub fn offset(&self) -> usize {
        (self.page() - 1).saturating_mul(self.limit())
    }
}

/// Paginated response structure
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    /// The paginated data
    pub data: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let limit = limit.max(1);
        let page = page.max(1);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };
        let start = (page - 1).saturating_mul(limit);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: start.saturating_add(limit) < total,
            has_prev: page > 1,
        }
    }
}
