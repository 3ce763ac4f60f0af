//! Pagination utilities for service layer
//!
//! Page requests are zero-based and clamp their size; listings return the
//! requested window together with the total number of matches.

use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    /// 0-based page index
    pub page_index: u64,
    /// items per page
    pub page_size: u64,
}

impl PageRequest {
    pub fn new(page_index: u64, page_size: u64) -> Self {
        Self { page_index, page_size }
    }

    /// Build from optional query values, filling defaults.
    pub fn from_query(page_index: Option<u64>, page_size: Option<u64>) -> Self {
        Self::new(page_index.unwrap_or(0), page_size.unwrap_or(DEFAULT_PAGE_SIZE))
    }

    /// Clamp the page size into `1..=MAX_PAGE_SIZE`.
    pub fn normalize(self) -> Self {
        Self { page_index: self.page_index, page_size: self.page_size.clamp(1, MAX_PAGE_SIZE) }
    }

    pub fn offset(self) -> u64 {
        let p = self.normalize();
        p.page_index.saturating_mul(p.page_size)
    }

    /// Whether the page starts before the end of `total_count` matches.
    /// An offset that overflows `u64` or the database's `i64` never does.
    pub fn starts_within(self, total_count: u64) -> bool {
        let p = self.normalize();
        match p.page_index.checked_mul(p.page_size) {
            Some(offset) => offset < total_count && i64::try_from(offset).is_ok(),
            None => false,
        }
    }

    /// Cut one page out of an already filtered and ordered result set.
    pub fn window<T>(self, rows: Vec<T>) -> Paged<T> {
        let p = self.normalize();
        let total_count = rows.len() as u64;
        let offset = usize::try_from(p.offset()).unwrap_or(usize::MAX);
        let items = rows.into_iter().skip(offset).take(p.page_size as usize).collect();
        Paged { items, total_count, page_index: p.page_index, page_size: p.page_size }
    }
}

impl Default for PageRequest {
    fn default() -> Self { Self::new(0, DEFAULT_PAGE_SIZE) }
}

/// One page of results plus the count of all matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page_index: u64,
    pub page_size: u64,
}

impl<T> Paged<T> {
    /// No rows on this page, `total_count` still reported.
    pub fn empty(page: PageRequest, total_count: u64) -> Self {
        let p = page.normalize();
        Self { items: Vec::new(), total_count, page_index: p.page_index, page_size: p.page_size }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_index: self.page_index,
            page_size: self.page_size,
        }
    }
}

/// Trimmed, lower-cased text filter; blank values mean "no filter".
pub fn text_filter(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_lowercase)
}

/// Case-insensitive substring match against a needle from [`text_filter`].
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// `%needle%` with LIKE metacharacters escaped by a backslash.
pub fn like_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

/// `LOWER(expr) LIKE '%needle%'` for a lower-cased needle.
pub fn lower_contains(expr: impl Into<SimpleExpr>, needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(expr)).like(LikeExpr::new(like_pattern(needle)).escape('\\'))
}
