//! Pagination and result page types.
//!
//! [`PaginationParams`] turns a 1-based page number and a page size into a
//! skip offset, and wraps a fetched slice plus the total match count into a
//! [`Page`].

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 50;

/// One page of results together with the totals of the whole match set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub total_records: u64,
    pub total_pages: u64,
    pub records: Vec<T>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    pub page: usize,
    pub limit: usize,
}

impl PaginationParams {
    /// Both values must be at least 1.
    pub fn new(page: usize, limit: usize) -> Self {
        Self { page, limit }
    }

    pub fn offset(&self) -> usize {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit)
    }

    /// `ceil(total_records / limit)`.
    pub fn total_pages(&self, total_records: u64) -> u64 {
        total_records.div_ceil(self.limit.max(1) as u64)
    }

    pub fn page_of<T>(&self, records: Vec<T>, total_records: u64) -> Page<T> {
        Page {
            total_records,
            total_pages: self.total_pages(total_records),
            records,
        }
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self { page: DEFAULT_PAGE, limit: DEFAULT_LIMIT }
    }
}
