//! Offset cursor pagination.
//!
//! A [`PageCursor`] is the number of rows to skip, carried between requests
//! as the base-10 `page_token` query parameter. The cursor is not stable
//! under concurrent inserts or deletes: rows can be skipped or repeated.

use std::fmt;

use crate::error::AppError;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on a single page.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Clamps a requested page size to `1..=MAX_PAGE_SIZE`.
#[must_use]
pub const fn clamp_limit(limit: u32) -> u32 {
    if limit == 0 {
        1
    } else if limit > MAX_PAGE_SIZE {
        MAX_PAGE_SIZE
    } else {
        limit
    }
}

/// Number of rows to skip before the page starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageCursor(u64);

impl PageCursor {
    /// Cursor of the first page.
    pub const START: Self = Self(0);

    /// Creates a cursor at the given offset.
    #[must_use]
    pub const fn at(offset: u64) -> Self {
        Self(offset)
    }

    /// Parses an opaque `page_token`. A missing or empty token is the first
    /// page.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidRequest`] if the token is not a
    /// non-negative integer.
    pub fn parse(token: Option<&str>) -> Result<Self, AppError> {
        match token.map(str::trim) {
            None | Some("") => Ok(Self::START),
            Some(raw) => raw
                .parse()
                .map(Self)
                .map_err(|_| AppError::InvalidRequest(format!("invalid page token `{raw}`"))),
        }
    }

    /// Returns the row offset.
    #[must_use]
    pub const fn offset(self) -> u64 {
        self.0
    }

    /// Cursor of the page following a page of `limit` rows.
    #[must_use]
    pub const fn advance(self, limit: u32) -> Self {
        Self(self.0.saturating_add(limit as u64))
    }
}

impl fmt::Display for PageCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One page of records plus the cursor of the next page, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Records on this page, in listing order.
    pub items: Vec<T>,
    /// Cursor of the next page; `None` when this page was short.
    pub next_cursor: Option<PageCursor>,
}

impl<T> Page<T> {
    /// Builds a page from the rows fetched at `cursor`. A next cursor is
    /// produced only if exactly `limit` rows came back.
    #[must_use]
    pub fn from_rows(items: Vec<T>, cursor: PageCursor, limit: u32) -> Self {
        let next_cursor = (items.len() == limit as usize).then(|| cursor.advance(limit));
        Self { items, next_cursor }
    }
}
