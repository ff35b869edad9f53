//! Page-window tracking.
//!
//! [`Pagination`] owns the current page, the page size and the total row
//! count, and derives the page count from them. Out-of-range pages are
//! silently clamped; a clamp is a normal adjustment, never an error.
//!
//! Every page or size change that differs from the prior state emits
//! [`Pagination::page_changed`] with `(page, page_size)`; that signal is
//! the sole notification path out of the tracker.

use horizon_trellis_core::{Property, Signal};

/// An immutable snapshot of the page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    /// 1-based current page.
    pub current: u64,
    /// Rows per page.
    pub page_size: u64,
    /// Total row count across all pages.
    pub total: u64,
}

/// Tracks the page window of one table view.
pub struct Pagination {
    current: Property<u64>,
    page_size: Property<u64>,
    total: Property<u64>,
    /// Emitted with `(page, page_size)` on every effective change.
    pub page_changed: Signal<(u64, u64)>,
}

impl Pagination {
    /// A tracker at page 1 with the given page size and no rows.
    pub fn new(page_size: u64) -> Self {
        Self {
            current: Property::new(1),
            page_size: Property::new(page_size.max(1)),
            total: Property::new(0),
            page_changed: Signal::new(),
        }
    }

    /// The 1-based current page.
    pub fn current(&self) -> u64 {
        self.current.get()
    }

    /// Rows per page.
    pub fn page_size(&self) -> u64 {
        self.page_size.get()
    }

    /// Total row count.
    pub fn total(&self) -> u64 {
        self.total.get()
    }

    /// Number of pages: `ceil(total / page_size)`, floored at 1 so clamping
    /// never produces page 0.
    pub fn total_pages(&self) -> u64 {
        self.total.get().div_ceil(self.page_size.get()).max(1)
    }

    /// A copy of the full window.
    pub fn snapshot(&self) -> PageState {
        PageState {
            current: self.current.get(),
            page_size: self.page_size.get(),
            total: self.total.get(),
        }
    }

    /// Move to a page, clamped into `[1, total_pages]`.
    ///
    /// Returns `true` (and notifies) only when the clamped value differs
    /// from the current page.
    pub fn set_page(&self, page: u64) -> bool {
        let clamped = page.clamp(1, self.total_pages());
        if self.current.set(clamped) {
            self.emit();
            true
        } else {
            false
        }
    }

    /// Change the page size (floored at 1), re-clamping the current page so
    /// it never exceeds the new page count.
    ///
    /// Returns `true` (and notifies once) when the size or the page moved.
    pub fn set_page_size(&self, page_size: u64) -> bool {
        let size_changed = self.page_size.set(page_size.max(1));
        let page_changed = self.current.set(self.current.get().min(self.total_pages()));
        if size_changed || page_changed {
            self.emit();
            true
        } else {
            false
        }
    }

    /// Update the total row count, clamping the current page down to the
    /// last valid page (page 1 when the total is 0).
    ///
    /// Notifies only when the current page actually moved.
    pub fn set_total(&self, total: u64) {
        self.total.set(total);
        if self.current.set(self.current.get().min(self.total_pages())) {
            self.emit();
        }
    }

    /// Move one page back; no-op at the first page.
    pub fn prev(&self) -> bool {
        self.set_page(self.current.get().saturating_sub(1))
    }

    /// Move one page forward; no-op at the last page.
    pub fn next(&self) -> bool {
        self.set_page(self.current.get() + 1)
    }

    fn emit(&self) {
        self.page_changed
            .emit((self.current.get(), self.page_size.get()));
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(10)
    }
}

impl std::fmt::Debug for Pagination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.snapshot();
        f.debug_struct("Pagination")
            .field("current", &state.current)
            .field("page_size", &state.page_size)
            .field("total", &state.total)
            .finish()
    }
}
