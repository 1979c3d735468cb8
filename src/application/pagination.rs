//! Page-number pagination helpers.

use std::num::NonZeroU32;

use serde::Serialize;
use thiserror::Error;

/// Number of items returned per page by the public listing.
pub const PAGE_SIZE: u32 = 20;

/// A validated, one-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNumber(NonZeroU32);

impl PageNumber {
    pub const FIRST: PageNumber = PageNumber(NonZeroU32::MIN);

    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    /// Parse a raw `page` query value. A missing or blank value means page one.
    pub fn parse(raw: Option<&str>) -> Result<Self, PaginationError> {
        let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
            return Ok(Self::FIRST);
        };

        raw.parse::<u32>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| PaginationError::InvalidPage(raw.to_string()))
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    pub fn window(self, page_size: u32) -> PageWindow {
        PageWindow {
            offset: u64::from(self.get() - 1) * u64::from(page_size),
            limit: page_size,
        }
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

/// Offset/limit pair handed to repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u32,
}

/// One page of results plus the total number of matching rows.
#[derive(Debug, Clone, Serialize)]
pub struct NumberedPage<T> {
    pub count: u64,
    pub page: u32,
    pub page_size: u32,
    pub results: Vec<T>,
}

impl<T> NumberedPage<T> {
    pub fn new(count: u64, page: PageNumber, page_size: u32, results: Vec<T>) -> Self {
        Self {
            count,
            page: page.get(),
            page_size,
            results,
        }
    }

    pub fn num_pages(&self) -> u32 {
        if self.count == 0 || self.page_size == 0 {
            return 0;
        }
        let pages = self.count.div_ceil(u64::from(self.page_size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn next_page(&self) -> Option<u32> {
        (self.page < self.num_pages()).then(|| self.page + 1)
    }

    /// The page before this one, clamped to the last real page when the
    /// requested page lies past the end.
    pub fn previous_page(&self) -> Option<u32> {
        if self.page <= 1 {
            return None;
        }
        let candidate = (self.page - 1).min(self.num_pages());
        (candidate >= 1).then_some(candidate)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> NumberedPage<U> {
        NumberedPage {
            count: self.count,
            page: self.page,
            page_size: self.page_size,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("invalid page `{0}`: expected a positive integer")]
    InvalidPage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(count: u64, number: u32) -> NumberedPage<()> {
        NumberedPage::new(
            count,
            PageNumber::new(number).expect("non-zero"),
            PAGE_SIZE,
            Vec::new(),
        )
    }

    #[test]
    fn parse_defaults_to_first_page() {
        assert_eq!(PageNumber::parse(None), Ok(PageNumber::FIRST));
        assert_eq!(PageNumber::parse(Some("  ")), Ok(PageNumber::FIRST));
        assert_eq!(PageNumber::parse(Some("3")).map(PageNumber::get), Ok(3));
    }

    #[test]
    fn parse_rejects_non_positive_and_garbage() {
        for raw in ["0", "-1", "abc", "1.5"] {
            assert_eq!(
                PageNumber::parse(Some(raw)),
                Err(PaginationError::InvalidPage(raw.to_string())),
                "{raw}"
            );
        }
    }

    #[test]
    fn window_offsets_by_page_size() {
        let window = PageNumber::new(3).expect("non-zero").window(PAGE_SIZE);
        assert_eq!(window, PageWindow { offset: 40, limit: 20 });
    }

    #[test]
    fn huge_page_numbers_do_not_overflow() {
        let window = PageNumber::new(u32::MAX).expect("non-zero").window(PAGE_SIZE);
        assert_eq!(window.offset, u64::from(u32::MAX - 1) * 20);
    }

    #[test]
    fn links_in_the_middle() {
        let current = page(45, 2);
        assert_eq!(current.num_pages(), 3);
        assert_eq!(current.next_page(), Some(3));
        assert_eq!(current.previous_page(), Some(1));
    }

    #[test]
    fn first_and_last_pages_have_one_sided_links() {
        assert_eq!(page(45, 1).previous_page(), None);
        assert_eq!(page(45, 3).next_page(), None);
        assert_eq!(page(40, 2).next_page(), None);
    }

    #[test]
    fn out_of_range_page_points_back_to_last_page() {
        let beyond = page(45, 999_999);
        assert_eq!(beyond.next_page(), None);
        assert_eq!(beyond.previous_page(), Some(3));
    }

    #[test]
    fn empty_result_set_has_no_links() {
        let empty = page(0, 4);
        assert_eq!(empty.num_pages(), 0);
        assert_eq!(empty.next_page(), None);
        assert_eq!(empty.previous_page(), None);
    }
}
