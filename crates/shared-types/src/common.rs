use serde::{Deserialize, Serialize};

/// Default number of rows per page in the record list.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: usize = 100;

/// Paginated response wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata. `page` is zero-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PaginationMeta {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: usize, page_size: usize, total: usize) -> Self {
        let total_pages = if page_size > 0 {
            total.div_ceil(page_size)
        } else {
            1
        };
        Self {
            data: items,
            meta: PaginationMeta {
                page,
                page_size,
                total,
                total_pages,
                has_next: page + 1 < total_pages,
                has_prev: page > 0,
            },
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

/// Clamp a requested page size into `1..=MAX_PAGE_SIZE`.
pub fn normalize_page_size(page_size: Option<usize>) -> usize {
    page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Generic message payload for endpoints with nothing else to return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MessageResponse {
    pub message: String,
}
