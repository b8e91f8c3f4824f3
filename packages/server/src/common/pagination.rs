//! Offset pagination types.
//!
//! Listing endpoints take a 1-based `page` and a `limit` and report the total
//! match count so clients can render page controls. Out-of-range arguments are
//! rejected instead of silently clamped.
//!
//! # Usage
//!
//! ```rust,ignore
//! let validated = PageArgs { page: Some(2), limit: Some(20) }.validate()?;
//! let page = store.list_by_actor(actor, &filter, &validated).await?;
//! let info = PageInfo::from_page(&page);
//! ```

use juniper::GraphQLObject;
use thiserror::Error;

pub const DEFAULT_PAGE: i32 = 1;
pub const DEFAULT_LIMIT: i32 = 10;
pub const MAX_LIMIT: i32 = 100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page must be at least 1, got {0}")]
    PageOutOfRange(i32),

    #[error("limit must be between 1 and {max}, got {got}", max = MAX_LIMIT)]
    LimitOutOfRange { got: i32 },
}

/// Raw pagination arguments as received from a caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageArgs {
    pub page: Option<i32>,
    pub limit: Option<i32>,
}

impl PageArgs {
    pub fn new(page: Option<i32>, limit: Option<i32>) -> Self {
        Self { page, limit }
    }

    /// Apply defaults (page 1, limit 10) and check bounds.
    pub fn validate(&self) -> Result<ValidatedPageArgs, PaginationError> {
        let page = self.page.unwrap_or(DEFAULT_PAGE);
        if page < 1 {
            return Err(PaginationError::PageOutOfRange(page));
        }

        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(PaginationError::LimitOutOfRange { got: limit });
        }

        Ok(ValidatedPageArgs {
            page: page as u32,
            limit: limit as u32,
        })
    }
}

/// Pagination arguments with defaults applied and bounds checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedPageArgs {
    pub page: u32,
    pub limit: u32,
}

impl ValidatedPageArgs {
    /// SQL OFFSET for this page.
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }

    /// SQL LIMIT for this page.
    pub fn sql_limit(&self) -> i64 {
        self.limit as i64
    }
}

impl Default for ValidatedPageArgs {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE as u32,
            limit: DEFAULT_LIMIT as u32,
        }
    }
}

/// One page of results plus the total number of matches.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, args: &ValidatedPageArgs) -> Self {
        Self {
            items,
            total,
            page: args.page,
            limit: args.limit,
        }
    }

    /// Number of pages needed to show every match.
    pub fn pages(&self) -> i64 {
        if self.total <= 0 {
            return 0;
        }
        let limit = self.limit.max(1) as i64;
        (self.total + limit - 1) / limit
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Pagination metadata exposed over GraphQL.
#[derive(Debug, Clone, GraphQLObject)]
#[graphql(description = "Offset pagination metadata")]
pub struct PageInfo {
    pub page: i32,
    pub limit: i32,
    pub total: i32,
    pub pages: i32,
}

impl PageInfo {
    pub fn from_page<T>(page: &Page<T>) -> Self {
        Self {
            page: page.page as i32,
            limit: page.limit as i32,
            total: i32::try_from(page.total).unwrap_or(i32::MAX),
            pages: i32::try_from(page.pages()).unwrap_or(i32::MAX),
        }
    }
}
