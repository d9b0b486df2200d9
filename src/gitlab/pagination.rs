//! Pagination metadata and the page walk for GitLab collection endpoints.
//!
//! GitLab reports offset pagination through `X-Page`, `X-Per-Page`,
//! `X-Total`, `X-Total-Pages`, `X-Next-Page`, and `X-Prev-Page` headers. An
//! absent or empty `X-Next-Page` marks the final page. [`collect_pages`]
//! walks a collection strictly in page order and concatenates the results
//! without reordering or deduplicating them.

use std::future::Future;

use http::HeaderMap;

use super::error::GitLabError;

/// Number of records requested per page, constrained to GitLab's 1–100 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerPage(u8);

impl PerPage {
    /// Largest page size GitLab accepts.
    pub const MAX: Self = Self(100);

    /// Validates a requested page size.
    ///
    /// # Errors
    ///
    /// Returns [`GitLabError::Validation`] when the value is outside 1–100.
    pub fn new(value: i64) -> Result<Self, GitLabError> {
        u8::try_from(value)
            .ok()
            .filter(|size| (1..=100).contains(size))
            .map(Self)
            .ok_or_else(|| {
                GitLabError::validation(format!("perPage must be between 1 and 100, got {value}"))
            })
    }

    /// Returns the page size.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for PerPage {
    fn default() -> Self {
        Self::MAX
    }
}

/// Current page state for paginated results.
///
/// # Example
///
/// ```
/// use mr_comments::gitlab::pagination::PageInfo;
///
/// let info = PageInfo::new(2, 50)
///     .with_total_pages(Some(5))
///     .with_next_page(Some(3));
/// assert_eq!(info.current_page(), 2);
/// assert!(!info.is_last_page());
/// assert_eq!(info.next_page(), Some(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// Current page number (1-based).
    current_page: u32,
    /// Items per page.
    per_page: u8,
    /// Total number of pages if known.
    total_pages: Option<u32>,
    /// Total number of records if known.
    total: Option<u64>,
    /// Next page number when more pages exist.
    next_page: Option<u32>,
}

impl PageInfo {
    /// Creates a new page info instance with unknown totals and no next page.
    #[must_use]
    pub const fn new(current_page: u32, per_page: u8) -> Self {
        Self {
            current_page,
            per_page,
            total_pages: None,
            total: None,
            next_page: None,
        }
    }

    /// Reads GitLab pagination headers.
    ///
    /// `requested_page` and `requested_per_page` fill in when the server
    /// omits `X-Page` or `X-Per-Page`.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, requested_page: u32, requested_per_page: u8) -> Self {
        Self {
            current_page: header_number(headers, "x-page").unwrap_or(requested_page),
            per_page: header_number(headers, "x-per-page").unwrap_or(requested_per_page),
            total_pages: header_number(headers, "x-total-pages"),
            total: header_number(headers, "x-total"),
            next_page: header_number(headers, "x-next-page").filter(|page| *page > 0),
        }
    }

    /// Sets the total number of pages.
    #[must_use]
    pub const fn with_total_pages(mut self, total_pages: Option<u32>) -> Self {
        self.total_pages = total_pages;
        self
    }

    /// Sets the next page pointer.
    #[must_use]
    pub const fn with_next_page(mut self, next_page: Option<u32>) -> Self {
        self.next_page = next_page;
        self
    }

    /// Returns the current page number (1-based).
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Returns the number of items per page.
    #[must_use]
    pub const fn per_page(&self) -> u8 {
        self.per_page
    }

    /// Returns the total number of pages if known.
    #[must_use]
    pub const fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    /// Returns the total number of records if known.
    #[must_use]
    pub const fn total(&self) -> Option<u64> {
        self.total
    }

    /// Returns the next page number, if any.
    #[must_use]
    pub const fn next_page(&self) -> Option<u32> {
        self.next_page
    }

    /// Returns true if this is the last page.
    #[must_use]
    pub const fn is_last_page(&self) -> bool {
        self.next_page.is_none()
    }
}

/// One page of a collection together with its pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Records on this page, in server order.
    pub items: Vec<T>,
    /// Pagination headers for this page.
    pub info: PageInfo,
}

/// Walks every page of a collection, starting at page 1.
///
/// `fetch_page` is called with each page number in turn; the next call is
/// only made after the previous page's metadata has been read. Results are
/// concatenated in encounter order.
///
/// # Errors
///
/// Propagates the first error returned by `fetch_page` unchanged, and
/// returns [`GitLabError::Api`] when the server's next-page pointer does not
/// advance.
pub async fn collect_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, GitLabError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>, GitLabError>>,
{
    let mut results = Vec::new();
    let mut page = 1_u32;

    loop {
        let Page { items, info } = fetch_page(page).await?;
        results.extend(items);

        let Some(next_page) = info.next_page() else {
            return Ok(results);
        };

        if next_page <= page {
            return Err(GitLabError::Api {
                status: 200,
                message: format!("pagination did not advance: page {page} points to {next_page}"),
            });
        }

        tracing::debug!(
            current_page = page,
            next_page,
            total_pages = info.total_pages(),
            "fetching next page"
        );
        page = next_page;
    }
}

fn header_number<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse().ok())
}
