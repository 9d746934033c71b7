//! Offset pagination over ordered slices.
//!
//! [`paginate`] is pure: it never mutates its input and always returns the
//! same window for the same arguments.

use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`PageRequest`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequestError {
    /// Page numbers start at 1.
    #[error("page must be at least 1")]
    ZeroPage,
    /// A page must hold at least one item.
    #[error("limit must be at least 1")]
    ZeroLimit,
}

/// A 1-based page number and page size, both at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: NonZeroU32,
    limit: NonZeroU32,
}

impl PageRequest {
    /// Create a page request.
    ///
    /// # Errors
    ///
    /// Returns an error if `page` or `limit` is zero.
    pub fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        let page = NonZeroU32::new(page).ok_or(PageRequestError::ZeroPage)?;
        let limit = NonZeroU32::new(limit).ok_or(PageRequestError::ZeroLimit)?;
        Ok(Self { page, limit })
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page.get()
    }

    /// The page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit.get()
    }
}

/// Totals reported alongside a page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub total_pages: usize,
}

/// One window of an ordered collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: PaginationInfo,
}

impl<T> Page<T> {
    /// Transform every item in the window, keeping the totals.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// Slice `items` to the window described by `request`.
///
/// A page past the end yields an empty window with the totals still filled
/// in; it is not an error.
#[must_use]
pub fn paginate<T: Clone>(items: &[T], request: PageRequest) -> Page<T> {
    let total = items.len();
    let limit = request.limit() as usize;
    let start = (request.page() as usize - 1).saturating_mul(limit);

    let data = if start >= total {
        Vec::new()
    } else {
        let end = start.saturating_add(limit).min(total);
        items.get(start..end).map(<[T]>::to_vec).unwrap_or_default()
    };

    Page {
        data,
        pagination: PaginationInfo {
            total,
            page: request.page(),
            limit: request.limit(),
            total_pages: total.div_ceil(limit),
        },
    }
}
