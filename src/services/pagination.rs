//! Offset pagination arithmetic.
//!
//! Pages are 1-based; a page maps to the inclusive zero-based row range
//! `[(page - 1) * limit, page * limit - 1]`. Rows inserted or deleted between
//! two page fetches can shift across the page boundary, so a row may be
//! skipped or repeated. That is accepted for this API.

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Inclusive zero-based row offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub from: i64,
    pub to: i64,
}

impl PageRange {
    pub fn offset(&self) -> i64 {
        self.from
    }

    /// Number of rows requested, `to - from + 1`.
    pub fn limit(&self) -> i64 {
        self.to - self.from + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub has_more: bool,
    pub next_page: Option<i64>,
}

/// A page request with `page >= 1` and `limit` in `[1, MAX_LIMIT]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    limit: i64,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn range(&self) -> PageRange {
        range(self.page, self.limit)
    }

    pub fn page_info(&self, total: i64) -> PageInfo {
        page_info(self.page, self.limit, total)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

/// Parses a page-ish query value, falling back to `default` when it is absent
/// or not an integer. Integers outside `i64` saturate. Clamping is left to
/// [`PageRequest::new`].
pub fn parse_or_default(raw: Option<&str>, default: i64) -> i64 {
    let Some(value) = raw.map(str::trim) else {
        return default;
    };
    if let Ok(n) = value.parse::<i64>() {
        return n;
    }

    let (negative, digits) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        if negative {
            i64::MIN
        } else {
            i64::MAX
        }
    } else {
        default
    }
}

pub fn range(page: i64, limit: i64) -> PageRange {
    let from = page.saturating_sub(1).saturating_mul(limit);
    PageRange {
        from,
        to: from.saturating_add(limit - 1),
    }
}

pub fn page_info(page: i64, limit: i64, total: i64) -> PageInfo {
    let has_more = page.saturating_mul(limit) < total;
    PageInfo {
        has_more,
        next_page: has_more.then(|| page + 1),
    }
}
