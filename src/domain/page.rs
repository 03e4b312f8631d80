use crate::error::{Result, StorefrontError};
use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A validated, 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    size: usize,
}

impl PageRequest {
    pub fn new(page: i64) -> Result<Self> {
        Self::with_size(page, DEFAULT_PAGE_SIZE)
    }

    pub fn with_size(page: i64, size: usize) -> Result<Self> {
        if page < 1 {
            return Err(StorefrontError::invalid_argument(
                "page",
                format!("pages start at 1, got {page}"),
            ));
        }
        if size == 0 {
            return Err(StorefrontError::invalid_argument(
                "page_size",
                "must be at least 1",
            ));
        }
        Ok(Self {
            page: page as usize,
            size,
        })
    }

    /// Number of items preceding this page.
    pub fn skip(&self) -> usize {
        (self.page - 1).saturating_mul(self.size)
    }

    /// Builds the page envelope once the store has produced the slice and the
    /// total number of items.
    pub fn wrap<T>(&self, items: Vec<T>, total_count: usize) -> Page<T> {
        Page {
            items,
            total_count,
            has_next: self.skip().saturating_add(self.size) < total_count,
            current_page: self.page,
            page_size: self.size,
        }
    }

    /// Slices an already ordered collection.
    pub fn apply<T>(&self, all: Vec<T>) -> Page<T> {
        let total = all.len();
        let items = all.into_iter().skip(self.skip()).take(self.size).collect();
        self.wrap(items, total)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub has_next: bool,
    pub current_page: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            has_next: self.has_next,
            current_page: self.current_page,
            page_size: self.page_size,
        }
    }
}
