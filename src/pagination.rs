//! Page descriptor for list responses.
//!
//! Turns a requested page and page size into an offset/limit pair and the
//! metadata returned alongside a listing.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// The configured default page size must be positive
    #[error("paginator limit default must be greater than zero")]
    InvalidDefault,
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Meta {
    pub total_count: usize,
    pub page: usize,
    pub per_page: usize,
    pub page_count: usize,
}

impl Meta {
    /// Build the descriptor for `page` of size `per_page` over `total` rows.
    ///
    /// A `per_page` of zero or less uses `default_per_page`. The page is
    /// clamped to the last page, then to at least 1.
    pub fn new(
        page: i64,
        per_page: i64,
        total: usize,
        default_per_page: usize,
    ) -> Result<Self, PaginationError> {
        let per_page = match usize::try_from(per_page) {
            Ok(n) if n > 0 => n,
            _ if default_per_page == 0 => return Err(PaginationError::InvalidDefault),
            _ => default_per_page,
        };

        let page_count = total.div_ceil(per_page);
        let page = usize::try_from(page).unwrap_or(0).min(page_count).max(1);

        Ok(Self {
            total_count: total,
            page,
            per_page,
            page_count,
        })
    }

    pub fn offset(&self) -> usize {
        (self.page - 1) * self.per_page
    }

    pub fn limit(&self) -> usize {
        self.per_page
    }
}
