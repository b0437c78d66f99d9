use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_SIZE: u64 = 10;
const MAX_PAGE_SIZE: u64 = 100;

/// Query parameters accepted by all paginated list endpoints.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(rename = "page-number")]
    pub page_number: Option<u64>,
    #[serde(rename = "page-size")]
    pub page_size: Option<u64>,
}

impl PageParams {
    pub fn page_number(&self) -> u64 {
        self.page_number.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Number of documents to skip before this page starts.
    pub fn skip(&self) -> u64 {
        (self.page_number() - 1) * self.page_size()
    }
}

/// Standard pagination envelope.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub previous_page: Option<u64>,
    pub next_page: Option<u64>,
    pub has_previous: bool,
    pub has_next: bool,
    pub total_items: u64,
    pub pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_items: u64, params: &PageParams) -> Self {
        let page_number = params.page_number();
        let page_size = params.page_size();
        let pages = total_items.div_ceil(page_size);

        let has_previous = page_number > 1;
        let has_next = page_number < pages;

        Page {
            items,
            previous_page: has_previous.then(|| page_number - 1),
            next_page: has_next.then(|| page_number + 1),
            has_previous,
            has_next,
            total_items,
            pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(number: u64, size: u64) -> PageParams {
        PageParams {
            page_number: Some(number),
            page_size: Some(size),
        }
    }

    #[test]
    fn test_defaults() {
        let p = PageParams {
            page_number: None,
            page_size: None,
        };
        assert_eq!(p.page_number(), 1);
        assert_eq!(p.page_size(), 10);
        assert_eq!(p.skip(), 0);
    }

    #[test]
    fn test_page_size_capped() {
        let p = params(1, 5000);
        assert_eq!(p.page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_middle_page_envelope() {
        let page = Page::new(vec![1, 2, 3], 25, &params(2, 10));
        assert_eq!(page.pages, 3);
        assert_eq!(page.previous_page, Some(1));
        assert_eq!(page.next_page, Some(3));
        assert!(page.has_previous);
        assert!(page.has_next);
        assert_eq!(page.total_items, 25);
    }

    #[test]
    fn test_first_and_last_page() {
        let first: Page<i32> = Page::new(vec![], 25, &params(1, 10));
        assert!(!first.has_previous);
        assert_eq!(first.previous_page, None);
        assert_eq!(first.next_page, Some(2));

        let last: Page<i32> = Page::new(vec![], 25, &params(3, 10));
        assert!(last.has_previous);
        assert!(!last.has_next);
        assert_eq!(last.next_page, None);
    }

    #[test]
    fn test_empty_collection() {
        let page: Page<i32> = Page::new(vec![], 0, &params(1, 10));
        assert_eq!(page.pages, 0);
        assert!(!page.has_previous);
        assert!(!page.has_next);
    }

    #[test]
    fn test_skip_math() {
        assert_eq!(params(1, 20).skip(), 0);
        assert_eq!(params(3, 20).skip(), 40);
    }
}
