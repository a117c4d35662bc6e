//! Page-number pagination primitives shared by Postboard feed endpoints.
//!
//! The feed is addressed by 1-indexed page numbers with a fixed page size.
//! A [`PageRequest`] computes the `[offset, offset + limit)` window that a
//! store adapter should read, and a [`Page`] pairs the window with the total
//! number of records so clients can render page counts.
//!
//! Requests beyond the end of the collection are not errors: they resolve to
//! an empty window.
//!
//! # Examples
//! ```
//! use pagination::{PageNumber, PageRequest, PageSize};
//!
//! let request = PageRequest::new(PageNumber::from_requested(Some(2)), PageSize::default());
//! assert_eq!(request.offset(), 2);
//! assert_eq!(request.window(&[5, 4, 3, 2, 1]), &[3, 2]);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of posts shown on a single feed page.
pub const DEFAULT_PAGE_SIZE: u32 = 2;

/// Validation errors raised when constructing pagination values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// Page numbers are 1-indexed.
    #[error("page number must be at least 1")]
    ZeroPageNumber,
    /// A page must hold at least one record.
    #[error("page size must be at least 1")]
    ZeroPageSize,
}

/// A 1-indexed page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageNumber(u32);

impl PageNumber {
    /// The first page.
    pub const FIRST: Self = Self(1);

    /// Validate an explicit page number.
    ///
    /// # Errors
    /// Returns [`PaginationError::ZeroPageNumber`] for `0`.
    pub const fn new(value: u32) -> Result<Self, PaginationError> {
        if value == 0 {
            return Err(PaginationError::ZeroPageNumber);
        }
        Ok(Self(value))
    }

    /// Resolve a caller-supplied page number, treating absent or zero values
    /// as the first page.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageNumber;
    ///
    /// assert_eq!(PageNumber::from_requested(None), PageNumber::FIRST);
    /// assert_eq!(PageNumber::from_requested(Some(0)), PageNumber::FIRST);
    /// assert_eq!(PageNumber::from_requested(Some(3)).get(), 3);
    /// ```
    #[must_use]
    pub fn from_requested(value: Option<u32>) -> Self {
        value.and_then(|raw| Self::new(raw).ok()).unwrap_or(Self::FIRST)
    }

    /// The raw 1-indexed value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl TryFrom<u32> for PageNumber {
    type Error = PaginationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageNumber> for u32 {
    fn from(value: PageNumber) -> Self {
        value.0
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of records per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageSize(u32);

impl PageSize {
    /// Validate a page size.
    ///
    /// # Errors
    /// Returns [`PaginationError::ZeroPageSize`] for `0`.
    pub const fn new(value: u32) -> Result<Self, PaginationError> {
        if value == 0 {
            return Err(PaginationError::ZeroPageSize);
        }
        Ok(Self(value))
    }

    /// The raw size.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(DEFAULT_PAGE_SIZE)
    }
}

impl TryFrom<u32> for PageSize {
    type Error = PaginationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageSize> for u32 {
    fn from(value: PageSize) -> Self {
        value.0
    }
}

/// A request for one page of an ordered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageRequest {
    number: PageNumber,
    size: PageSize,
}

impl PageRequest {
    /// Pair a page number with a page size.
    #[must_use]
    pub const fn new(number: PageNumber, size: PageSize) -> Self {
        Self { number, size }
    }

    /// Requested page number.
    #[must_use]
    pub const fn number(&self) -> PageNumber {
        self.number
    }

    /// Requested page size.
    #[must_use]
    pub const fn size(&self) -> PageSize {
        self.size
    }

    /// Records to skip before the window starts: `(number - 1) * size`.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.number.get() as u64 - 1) * self.size.get() as u64
    }

    /// Maximum number of records in the window.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.size.get() as u64
    }

    /// Slice the window out of an already ordered collection.
    ///
    /// Windows past the end of `items` are empty.
    #[must_use]
    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let len = items.len();
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX).min(len);
        let limit = usize::try_from(self.limit()).unwrap_or(usize::MAX);
        let end = start.saturating_add(limit).min(len);
        items.get(start..end).unwrap_or_default()
    }
}

/// One page of records plus the size of the whole collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    total: u64,
}

impl<T> Page<T> {
    /// Build a page from its window and the total record count.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    /// Records in this window.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Total records in the collection, independent of the window.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Split the page into its window and total.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, u64) {
        (self.items, self.total)
    }

    /// Number of pages needed to show `total` records at `size` per page.
    #[must_use]
    pub const fn total_pages(&self, size: PageSize) -> u64 {
        self.total.div_ceil(size.get() as u64)
    }

    /// Transform each record while keeping the total.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}
