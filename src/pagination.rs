//! Client-side pagination of an in-memory result set.
//!
//! Works on any `QueryResult`, whether it came from the mock backend or
//! from an uploaded CSV file.

use crate::db::{QueryResult, Row};

/// Rows per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// The display-ready slice of a result for one page. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaginatedView<'a> {
    pub rows: &'a [Row],
    pub columns: &'a [String],
    pub total_items: usize,
    pub total_pages: usize,
    pub current_page: usize,
}

impl PaginatedView<'_> {
    /// True when a previous page exists.
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// True when a next page exists.
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Status text shown under the results table.
    pub fn status_line(&self) -> String {
        format!(
            "Page {} of {} (showing {} of {} items)",
            self.current_page,
            self.total_pages,
            self.rows.len(),
            self.total_items
        )
    }
}

/// Number of pages needed for `total_items`. Zero items means zero pages.
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}

/// Derives the view for `page` (1-based).
///
/// Out-of-range pages yield an empty slice rather than an error, and the
/// page number is reported back unchanged. A zero page size yields an empty
/// view with zero pages.
pub fn paginate(result: &QueryResult, page: usize, page_size: usize) -> PaginatedView<'_> {
    let total_items = result.rows.len();
    let start = page.saturating_sub(1).saturating_mul(page_size).min(total_items);
    let end = start.saturating_add(page_size).min(total_items);

    PaginatedView {
        rows: &result.rows[start..end],
        columns: &result.columns,
        total_items,
        total_pages: total_pages(total_items, page_size),
        current_page: page,
    }
}

/// Page cursor with the navigation rules of the results panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
}

impl Pager {
    /// Creates a pager on page 1. A zero page size falls back to the default.
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: if page_size == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                page_size
            },
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Back to page 1; called whenever the underlying result changes.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Moves back one page, never below 1.
    pub fn previous(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Moves forward one page unless already on the last page.
    ///
    /// Returns false when the move was refused.
    pub fn next(&mut self, total_items: usize) -> bool {
        if self.page < total_pages(total_items, self.page_size) {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// The view of `result` at the current page.
    pub fn view<'a>(&self, result: &'a QueryResult) -> PaginatedView<'a> {
        paginate(result, self.page, self.page_size)
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
