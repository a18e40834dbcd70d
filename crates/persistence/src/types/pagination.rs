//! Offset/limit pagination for search requests.

use serde::{Deserialize, Serialize};

/// Page size used when a request does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Largest page size the gateway forwards to the backend.
pub const MAX_PAGE_SIZE: usize = 1000;

/// Largest offset accepted; deeper pages are rejected, never clamped.
pub const MAX_OFFSET: usize = 10_000;

/// An offset/limit pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Number of hits to skip.
    pub offset: usize,
    /// Maximum number of hits to return.
    pub limit: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Creates a pagination window.
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// Number of pages needed for `total` hits. Zero when `limit` is zero.
    pub fn total_pages(&self, total: i64) -> i64 {
        if self.limit == 0 || total <= 0 {
            return 0;
        }
        let limit = self.limit as i64;
        (total + limit - 1) / limit
    }

    /// One-based page number of this window. Zero when `limit` is zero.
    pub fn current_page(&self) -> i64 {
        if self.limit == 0 {
            return 0;
        }
        (self.offset / self.limit) as i64 + 1
    }
}
