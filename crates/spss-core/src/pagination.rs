//! Page state for the dashboard table

/// Rows per page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Current page and page size; pages are 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    current_page: usize,
    page_size: usize,
}

impl Paginator {
    /// Start on page 1; a zero size falls back to the default
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size },
        }
    }

    /// Current page
    #[inline]
    #[must_use]
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Rows per page
    #[inline]
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages for `total` rows, never less than 1
    #[must_use]
    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    /// Jump to `page`; values below 1 become 1
    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }

    /// Back to page 1
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Pull the current page back inside `1..=total_pages(total)`
    pub fn clamp(&mut self, total: usize) -> usize {
        self.current_page = self.current_page.clamp(1, self.total_pages(total));
        self.current_page
    }

    /// Rows of the current page
    #[must_use]
    pub fn paginate<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.current_page - 1).saturating_mul(self.page_size).min(items.len());
        let end = start.saturating_add(self.page_size).min(items.len());
        &items[start..end]
    }

    /// Zero-based position of the first row of the current page
    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.current_page - 1) * self.page_size
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_pages() {
        let rows: Vec<u32> = (1..=23).collect();
        let mut p = Paginator::default();
        assert_eq!(p.paginate(&rows), &rows[0..10]);
        p.set_page(3);
        assert_eq!(p.paginate(&rows), &[21, 22, 23]);
        p.set_page(4);
        assert!(p.paginate(&rows).is_empty());
    }

    #[test]
    fn total_pages_is_at_least_one() {
        let p = Paginator::new(10);
        assert_eq!(p.total_pages(0), 1);
        assert_eq!(p.total_pages(10), 1);
        assert_eq!(p.total_pages(11), 2);
    }

    #[test]
    fn clamp_and_reset() {
        let mut p = Paginator::new(5);
        p.set_page(9);
        assert_eq!(p.clamp(12), 3);
        p.reset();
        assert_eq!(p.current_page(), 1);
        p.set_page(0);
        assert_eq!(p.current_page(), 1);
        assert_eq!(Paginator::new(0).page_size(), DEFAULT_PAGE_SIZE);
    }
}
