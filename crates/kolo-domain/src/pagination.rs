//! Pagination for history queries.

use serde::{Deserialize, Serialize};

/// Fixed page size for transaction-history listings.
pub const PAGE_SIZE: u32 = 10;

/// One-based page index. Restartable: the same index always addresses the
/// same window for an unchanged result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: default_page() }
    }
}

impl PageRequest {
    /// Clamp the page index to ≥ 1.
    pub fn clamped(self) -> Self {
        Self {
            page: self.page.max(1),
        }
    }

    /// Row offset for this page. Widened before multiplying so an
    /// arbitrarily large client-supplied page index cannot overflow.
    pub fn offset(self) -> u64 {
        (self.clamped().page - 1) as u64 * PAGE_SIZE as u64
    }
}
