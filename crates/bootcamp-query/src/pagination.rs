use serde::Serialize;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 25;

/// A neighbouring page, as echoed back to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRef {
    pub page: u64,
    pub limit: u64,
}

/// Links to the pages around the current one. Absent links are omitted
/// when serialized, so a single-page result renders as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageRef>,
}

/// Offset window for one page. Windows built by [`PageWindow::from_params`]
/// have both fields at least 1; hand-built zero values saturate instead of
/// underflowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageWindow {
    /// Build a window from raw `page`/`limit` parameters.
    ///
    /// Missing, non-integer, zero and negative values fall back to
    /// [`DEFAULT_PAGE`] and [`DEFAULT_LIMIT`]. Surrounding whitespace is
    /// ignored; trailing garbage (`"2abc"`) is not accepted.
    pub fn from_params(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: parse_positive(page).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(limit).unwrap_or(DEFAULT_LIMIT),
        }
    }

    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    pub fn end_index(&self) -> u64 {
        self.page.saturating_mul(self.limit)
    }

    pub fn pagination(&self, total: u64) -> Pagination {
        let next = (self.end_index() < total).then(|| PageRef {
            page: self.page.saturating_add(1),
            limit: self.limit,
        });
        let prev = (self.skip() > 0).then(|| PageRef {
            page: self.page.saturating_sub(1),
            limit: self.limit,
        });
        Pagination { next, prev }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageResult {
    pub skip: u64,
    pub limit: u64,
    pub pagination: Pagination,
}

pub fn compute_pagination(page: Option<&str>, limit: Option<&str>, total: u64) -> PageResult {
    let window = PageWindow::from_params(page, limit);
    PageResult {
        skip: window.skip(),
        limit: window.limit,
        pagination: window.pagination(total),
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n >= 1)
        .map(|n| n as u64)
}
