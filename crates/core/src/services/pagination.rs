/// Page window over the transaction list.
///
/// `page_index` is 0-based here; the backend counts pages from 1, see
/// [`page_number`](Self::page_number).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_index: u64,
    page_size: u64,
    total_count: u64,
}

impl Pagination {
    /// A page size of 0 is treated as 1.
    pub fn new(page_size: u64) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
            total_count: 0,
        }
    }

    #[must_use]
    pub fn page_index(&self) -> u64 {
        self.page_index
    }

    #[must_use]
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// 1-based page number for the request.
    #[must_use]
    pub fn page_number(&self) -> u64 {
        self.page_index.saturating_add(1)
    }

    /// `ceil(total_count / page_size)`; 0 when there is nothing to show.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.total_count.div_ceil(self.page_size)
    }

    pub fn set_page(&mut self, page_index: u64, page_size: u64) {
        self.page_index = page_index;
        self.page_size = page_size.max(1);
    }

    /// Back to the first page, keeping the page size.
    pub fn reset(&mut self) {
        self.page_index = 0;
    }

    pub fn set_total_count(&mut self, total_count: u64) {
        self.total_count = total_count;
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page_index > 0
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page_number() < self.total_pages()
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(10)
    }
}
