//! Offset/limit pagination over the list endpoint.

/// Default page size, matching the API's own default.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    offset: u64,
    limit: u64,
    count: u64,
    next: Option<String>,
    previous: Option<String>,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PaginationState {
    /// A zero limit is bumped to 1 so page arithmetic never divides by zero.
    pub fn new(limit: u64) -> Self {
        Self {
            offset: 0,
            limit: limit.max(1),
            count: 0,
            next: None,
            previous: None,
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn next(&self) -> Option<&str> {
        self.next.as_deref()
    }

    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    pub fn has_results(&self) -> bool {
        self.count > 0
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Moves forward one page. Does nothing when the server reported no next page.
    pub fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.offset += self.limit;
        true
    }

    /// Moves back one page, never before offset 0. Does nothing when the
    /// server reported no previous page.
    pub fn previous_page(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.offset = self.offset.saturating_sub(self.limit);
        true
    }

    pub fn reset_offset(&mut self) {
        self.offset = 0;
    }

    /// Changes the page size and returns to the first page.
    pub fn set_limit(&mut self, limit: u64) {
        self.limit = limit.max(1);
        self.offset = 0;
    }

    /// Records the totals and links of a freshly fetched page. Empty link
    /// strings count as absent.
    pub fn apply_page(&mut self, count: u64, next: Option<String>, previous: Option<String>) {
        self.count = count;
        self.next = next.filter(|link| !link.is_empty());
        self.previous = previous.filter(|link| !link.is_empty());
    }

    pub fn current_page(&self) -> u64 {
        if !self.has_results() {
            return 1;
        }
        self.offset / self.limit + 1
    }

    pub fn total_pages(&self) -> u64 {
        if !self.has_results() {
            return 1;
        }
        self.count.div_ceil(self.limit)
    }

    /// First and last 1-based item numbers on this page, if any.
    pub fn display_range(&self) -> Option<(u64, u64)> {
        if !self.has_results() || self.offset >= self.count {
            return None;
        }
        let first = self.offset + 1;
        let last = (self.offset + self.limit).min(self.count);
        Some((first, last))
    }

    /// e.g. "141-151 of 151", or "0 of 0" with nothing to show.
    pub fn range_label(&self) -> String {
        match self.display_range() {
            Some((first, last)) => format!("{}-{} of {}", first, last, self.count),
            None => format!("0 of {}", self.count),
        }
    }

    pub fn summary(&self) -> String {
        format!("Showing {}", self.range_label())
    }

    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.current_page(), self.total_pages())
    }
}
