/// Pagination support for queries
///
/// Standard pagination model used by the query engine and the routed
/// upstream operations, so both feeds answer with the same shape.
use serde::{Deserialize, Serialize};

/// Pagination parameters for queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationParams {
    pub page: u32,
    pub per_page: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 25,
        }
    }
}

impl PaginationParams {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Zero-based offset of the first item on this page
    pub fn offset(&self) -> usize {
        ((self.page - 1) * self.per_page) as usize
    }
}

/// Paginated result wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total_items: u64, params: &PaginationParams) -> Self {
        let total_pages = ((total_items as f64) / (params.per_page as f64)).ceil() as u32;

        Self {
            items,
            total_items,
            page: params.page,
            per_page: params.per_page,
            total_pages,
        }
    }

    /// Page out a fully materialized, already ordered result set.
    pub fn paginate(all: Vec<T>, params: &PaginationParams) -> Self {
        let total_items = all.len() as u64;
        let items = all
            .into_iter()
            .skip(params.offset())
            .take(params.per_page as usize)
            .collect();
        Self::new(items, total_items, params)
    }
}
