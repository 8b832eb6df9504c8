// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pagination and sort request/response shapes.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// One `(field, direction)` entry of a sort request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub field: String,
    pub direction: Direction,
}

impl SortOrder {
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Parse a `field[,asc|desc]` query value. Direction defaults to ascending.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut parts = raw.splitn(2, ',');
        let field = parts.next().unwrap_or("").trim();
        if field.is_empty() {
            return Err(AppError::BadRequest(format!(
                "Invalid 'sort' parameter: {raw:?}"
            )));
        }

        let direction = match parts.next().map(|d| d.trim().to_ascii_lowercase()) {
            None => Direction::Asc,
            Some(d) if d == "asc" => Direction::Asc,
            Some(d) if d == "desc" => Direction::Desc,
            Some(d) => {
                return Err(AppError::BadRequest(format!(
                    "Invalid sort direction {d:?}: expected 'asc' or 'desc'"
                )))
            }
        };

        Ok(Self::new(field, direction))
    }
}

/// A normalized page request. `page` is zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Vec<SortOrder>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: Vec::new(),
        }
    }
}

impl PageRequest {
    /// Build a request, clamping the size into `1..=MAX_PAGE_SIZE`.
    pub fn new(page: Option<u32>, size: Option<u32>, sort: Vec<SortOrder>) -> Self {
        Self {
            page: page.unwrap_or(0),
            size: size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            sort,
        }
    }

    pub fn with_sort(mut self, sort: Vec<SortOrder>) -> Self {
        self.sort = sort;
        self
    }

    /// Index of the first element of this page, or `None` on overflow.
    pub fn offset(&self) -> Option<usize> {
        (self.page as usize).checked_mul(self.size as usize)
    }
}

/// A page of results plus the envelope the frontend paginates with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub empty: bool,
    pub first: bool,
    pub last: bool,
    /// Zero-based page index
    pub number: u32,
    pub number_of_elements: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Slice an already filtered and ordered result set into the requested page.
    pub fn from_ordered(items: Vec<T>, request: &PageRequest) -> Result<Self> {
        let total_elements = items.len() as u64;
        let start = request.offset().ok_or_else(|| {
            AppError::BadRequest("Page number causes overflow".to_string())
        })?;

        let content: Vec<T> = items
            .into_iter()
            .skip(start)
            .take(request.size as usize)
            .collect();

        Ok(Self::assemble(content, request, total_elements))
    }

    fn assemble(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let size = request.size.max(1);
        let total_pages = total_elements.div_ceil(size as u64) as u32;

        Self {
            empty: content.is_empty(),
            first: request.page == 0,
            last: request.page.saturating_add(1) >= total_pages,
            number: request.page,
            number_of_elements: content.len() as u32,
            size,
            total_elements,
            total_pages,
            content,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            empty: self.empty,
            first: self.first,
            last: self.last,
            number: self.number,
            number_of_elements: self.number_of_elements,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_is_clamped() {
        assert_eq!(PageRequest::new(None, Some(10_000), vec![]).size, MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(None, Some(0), vec![]).size, 1);
        assert_eq!(PageRequest::new(None, None, vec![]).size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_parse_sort_order() {
        assert_eq!(
            SortOrder::parse("category,desc").unwrap(),
            SortOrder::new("category", Direction::Desc)
        );
        assert_eq!(
            SortOrder::parse("timestamp").unwrap(),
            SortOrder::new("timestamp", Direction::Asc)
        );
        assert!(matches!(
            SortOrder::parse("timestamp,sideways"),
            Err(AppError::BadRequest(_))
        ));
        assert!(SortOrder::parse(",asc").is_err());
    }

    #[test]
    fn test_page_envelope_middle_and_last() {
        let items: Vec<u32> = (0..45).collect();

        let middle = Page::from_ordered(items.clone(), &PageRequest::new(Some(1), Some(20), vec![]))
            .unwrap();
        assert_eq!(middle.content.first(), Some(&20));
        assert_eq!(middle.number_of_elements, 20);
        assert_eq!(middle.total_elements, 45);
        assert_eq!(middle.total_pages, 3);
        assert!(!middle.first);
        assert!(!middle.last);

        let last = Page::from_ordered(items, &PageRequest::new(Some(2), Some(20), vec![])).unwrap();
        assert_eq!(last.content, vec![40, 41, 42, 43, 44]);
        assert!(last.last);
        assert!(!last.empty);
    }

    #[test]
    fn test_empty_result_is_first_and_last() {
        let page = Page::<u32>::from_ordered(vec![], &PageRequest::default()).unwrap();
        assert!(page.empty);
        assert!(page.first);
        assert!(page.last);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let page = Page::from_ordered(vec![1, 2, 3], &PageRequest::new(Some(5), Some(2), vec![]))
            .unwrap();
        assert!(page.empty);
        assert!(page.last);
        assert_eq!(page.total_elements, 3);
    }
}
