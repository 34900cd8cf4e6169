use serde::Serialize;

use crate::models::PaginationBlock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub items_per_page: u32,
}

impl Pagination {
    pub fn new(items_per_page: u32) -> Self {
        Pagination {
            current_page: 1,
            total_pages: 1,
            total_items: 0,
            items_per_page: items_per_page.max(1),
        }
    }

    /// `ceil(total_items / items_per_page)`, at least one page.
    pub fn pages_for(total_items: u64, items_per_page: u32) -> u32 {
        let per_page = u64::from(items_per_page.max(1));
        let pages = total_items.div_ceil(per_page).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Moves to `page`, clamped into range. Returns whether the page changed.
    pub fn set_page(&mut self, page: u32) -> bool {
        let page = self.clamp(page);
        if page == self.current_page {
            false
        } else {
            self.current_page = page;
            true
        }
    }

    pub fn clamp(&self, page: u32) -> u32 {
        page.clamp(1, self.total_pages.max(1))
    }

    /// Adopts what the server said about the page just loaded.
    ///
    /// An explicit pagination block wins. Without one, the legacy `total`
    /// count is divided by the page size. Without either, all we know is
    /// that `requested_page` exists and holds `page_len` items.
    pub fn update_from_server(
        &mut self,
        block: Option<&PaginationBlock>,
        total: Option<u64>,
        page_len: usize,
        requested_page: u32,
    ) {
        if let Some(block) = block {
            if block.items_per_page > 0 {
                self.items_per_page = block.items_per_page;
            }
            self.total_items = block.total_items;
            self.total_pages = if block.total_pages > 0 {
                block.total_pages
            } else {
                Self::pages_for(block.total_items, self.items_per_page)
            };
            self.current_page = block.current_page.clamp(1, self.total_pages);
            return;
        }

        let requested_page = requested_page.max(1);
        match total {
            Some(total) => {
                self.total_items = total;
                self.total_pages = Self::pages_for(total, self.items_per_page);
            }
            None => {
                let before = u64::from(requested_page - 1) * u64::from(self.items_per_page);
                self.total_items = before + page_len as u64;
                self.total_pages = requested_page;
            }
        }
        self.current_page = requested_page.min(self.total_pages);
    }

    /// Back to the first page; totals are kept until the next response.
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_for() {
        assert_eq!(Pagination::pages_for(45, 20), 3);
        assert_eq!(Pagination::pages_for(40, 20), 2);
        assert_eq!(Pagination::pages_for(0, 20), 1);
        assert_eq!(Pagination::pages_for(5, 0), 5);
    }

    #[test]
    fn test_server_block_is_authoritative() {
        let mut pagination = Pagination::new(20);
        let block = PaginationBlock {
            current_page: 2,
            total_pages: 4,
            total_items: 70,
            items_per_page: 25,
        };
        pagination.update_from_server(Some(&block), Some(999), 25, 7);

        assert_eq!(pagination.current_page, 2);
        assert_eq!(pagination.total_pages, 4);
        assert_eq!(pagination.total_items, 70);
        assert_eq!(pagination.items_per_page, 25);
    }

    #[test]
    fn test_legacy_total_is_divided_by_page_size() {
        let mut pagination = Pagination::new(20);
        pagination.update_from_server(None, Some(45), 20, 2);

        assert_eq!(pagination.total_pages, 3);
        assert_eq!(pagination.total_items, 45);
        assert_eq!(pagination.current_page, 2);
    }

    #[test]
    fn test_without_any_totals() {
        let mut pagination = Pagination::new(20);
        pagination.update_from_server(None, None, 7, 3);

        assert_eq!(pagination.current_page, 3);
        assert_eq!(pagination.total_pages, 3);
        assert_eq!(pagination.total_items, 47);
    }

    #[test]
    fn test_set_page_clamps() {
        let mut pagination = Pagination::new(20);
        pagination.update_from_server(None, Some(45), 20, 1);

        assert!(pagination.set_page(3));
        assert!(!pagination.has_next());
        assert!(!pagination.set_page(10));
        assert_eq!(pagination.current_page, 3);
        assert!(pagination.set_page(0));
        assert_eq!(pagination.current_page, 1);
        assert!(!pagination.has_prev());
    }

    #[test]
    fn test_reset_returns_to_first_page() {
        let mut pagination = Pagination::new(20);
        pagination.update_from_server(None, Some(100), 20, 4);
        pagination.reset();
        assert_eq!(pagination.current_page, 1);
        assert_eq!(pagination.total_pages, 5);
    }
}
