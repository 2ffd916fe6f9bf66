use axum::http::header::{CONTENT_RANGE, HeaderMap, HeaderValue};

use crate::models::FilterOptions;
use crate::settings::SearchSettings;

/// Largest offset or limit a database will bind as a signed 64-bit integer.
pub const MAX_WINDOW: u64 = i64::MAX.unsigned_abs();

/// Window of result rows.
///
/// A `limit` of zero means unpaginated: no LIMIT/OFFSET is emitted. Both
/// bounds are clamped to [`MAX_WINDOW`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u64,
    pub limit: u64,
}

impl Page {
    pub const UNPAGINATED: Self = Self { offset: 0, limit: 0 };

    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self {
            offset: if offset > MAX_WINDOW { MAX_WINDOW } else { offset },
            limit: if limit > MAX_WINDOW { MAX_WINDOW } else { limit },
        }
    }

    #[must_use]
    pub const fn is_paginated(&self) -> bool {
        self.limit > 0
    }
}

/// Parse an inclusive `[start, end]` range.
#[must_use]
pub fn parse_range(range_str: Option<&str>) -> Option<(u64, u64)> {
    let range = serde_json::from_str::<[u64; 2]>(range_str?).ok()?;
    (range[0] <= range[1]).then_some((range[0], range[1]))
}

/// Resolve the requested page, falling back to the configured page size.
///
/// `page`/`per_page` wins over `range`; sizes are capped at
/// `settings.max_page_size`.
#[must_use]
pub fn parse_pagination(params: &FilterOptions, settings: &SearchSettings) -> Page {
    let max = settings.max_page_size.max(1);

    if let (Some(page), Some(per_page)) = (params.page, params.per_page) {
        // Standard REST pagination (1-based page numbers)
        let per_page = per_page.clamp(1, max);
        return Page::new(page.saturating_sub(1).saturating_mul(per_page), per_page);
    }

    if let Some((start, end)) = parse_range(params.range.as_deref()) {
        // React Admin pagination
        let limit = (end - start).saturating_add(1).min(max);
        return Page::new(start, limit);
    }

    Page::new(0, settings.default_page_size.clamp(1, max))
}

/// Sanitize resource name by removing control characters for HTTP headers
fn sanitize_resource_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control())
        .collect()
}

/// Build the `Content-Range` header for one page of results.
///
/// The range is inclusive, e.g. `contacts 0-24/120`. A page starting at or
/// past the total is unsatisfiable and renders as `contacts */120`.
#[must_use]
pub fn calculate_content_range(page: Page, total_count: u64, resource_name: &str) -> HeaderMap {
    let safe_name = sanitize_resource_name(resource_name);
    let content_range = if page.offset >= total_count {
        format!("{safe_name} */{total_count}")
    } else {
        let last = if page.is_paginated() {
            page.offset.saturating_add(page.limit).min(total_count)
        } else {
            total_count
        };
        format!("{safe_name} {}-{}/{total_count}", page.offset, last - 1)
    };

    let mut headers = HeaderMap::new();
    let value = HeaderValue::from_str(&content_range).unwrap_or_else(|_| {
        HeaderValue::from_static("items */0")
    });
    headers.insert(CONTENT_RANGE, value);
    headers
}
