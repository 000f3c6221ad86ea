use super::{PageRequest, DEFAULT_PAGE_SIZE};

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Self {
        PageRequest { page, page_size }
    }

    /// Build a request from raw query-string values. Anything missing or not a
    /// non-negative integer falls back to page 1 and `default_page_size`.
    pub fn from_query(page: Option<&str>, page_size: Option<&str>, default_page_size: usize) -> Self {
        let parse = |raw: Option<&str>| raw.and_then(|raw| raw.trim().parse::<usize>().ok());
        PageRequest {
            page: parse(page).unwrap_or(1),
            page_size: parse(page_size).unwrap_or(default_page_size),
        }
    }

    /// Index of the first row on this page, or `None` when the page cannot hold rows.
    pub fn offset(&self) -> Option<usize> {
        if self.page == 0 || self.page_size == 0 {
            return None;
        }
        (self.page - 1).checked_mul(self.page_size)
    }

    pub fn window<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        match self.offset() {
            Some(start) if start < rows.len() => {
                let end = start.saturating_add(self.page_size).min(rows.len());
                &rows[start..end]
            }
            _ => &[],
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
