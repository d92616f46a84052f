//! Paged vs. full listings.
//!
//! A list request either carries pagination parameters or it does not. When
//! neither `page` nor `limit` is supplied the caller gets the whole collection
//! ([`Listing::Full`]); otherwise a bounded [`Page`] with totals computed from
//! the full matching set ([`Listing::Paged`]).

use serde::{de, Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};
use utoipa::IntoParams;

use crate::model::ValidationError;

/// Limit used when the caller sends `page` without `limit`.
pub const DEFAULT_LIMIT: u64 = 25;
pub const MAX_LIMIT: u64 = 1000;

/// Raw `page`/`limit` query parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Zero-based page index.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<i64>,
    /// Maximum number of items per page.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<i64>,
}

/// Reads an optional query value; `?page=` (empty or blank) counts as absent.
///
/// # Errors
/// Fails when a non-empty value does not parse as `T`.
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

impl PageParams {
    #[must_use]
    pub const fn new(page: i64, limit: i64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// `true` when the caller supplied no pagination at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.page.is_none() && self.limit.is_none()
    }

    /// Resolves the parameters into page bounds, or `None` for the unpaginated branch.
    ///
    /// # Errors
    /// Returns `ValidationError` for a negative page or a limit outside `1..=MAX_LIMIT`.
    pub fn bounds(&self) -> Result<Option<PageBounds>, ValidationError> {
        if self.is_empty() {
            return Ok(None);
        }
        let page = self.page.unwrap_or(0);
        #[allow(clippy::cast_possible_wrap)]
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT as i64);
        PageBounds::new(page, limit).map(Some)
    }
}

/// Validated page index and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    page: u64,
    limit: u64,
}

impl PageBounds {
    /// # Errors
    /// Returns `ValidationError` when `page < 0`, `limit <= 0` or `limit > MAX_LIMIT`.
    pub fn new(page: i64, limit: i64) -> Result<Self, ValidationError> {
        let page = u64::try_from(page)
            .map_err(|_| ValidationError::new("page must be greater than or equal to 0"))?;
        let limit = u64::try_from(limit)
            .ok()
            .filter(|limit| *limit > 0)
            .ok_or_else(|| ValidationError::new("limit must be greater than 0"))?;
        if limit > MAX_LIMIT {
            return Err(ValidationError::new(format!(
                "limit must be less than or equal to {MAX_LIMIT}"
            )));
        }
        Ok(Self { page, limit })
    }

    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// `page * limit`, saturating so a huge page index simply lands past the end.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page.saturating_mul(self.limit)
    }
}

/// `ceil(total / limit)`, zero for an empty collection.
#[must_use]
pub const fn total_pages(total_elements: u64, limit: u64) -> u64 {
    if total_elements == 0 || limit == 0 {
        0
    } else {
        total_elements.div_ceil(limit)
    }
}

/// A bounded slice of a collection plus totals for the whole collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub limit: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    /// Builds a page from a slice already cut by the store and the total count it reported.
    #[must_use]
    pub fn from_parts(content: Vec<T>, total_elements: u64, bounds: PageBounds) -> Self {
        let total_pages = total_pages(total_elements, bounds.limit);
        Self {
            content,
            page: bounds.page,
            limit: bounds.limit,
            total_elements,
            total_pages,
            first: bounds.page == 0,
            last: bounds.page.saturating_add(1) >= total_pages,
        }
    }

    /// Cuts `[offset, offset + limit)` out of the full collection, clipped to its bounds.
    #[must_use]
    pub fn from_collection(items: Vec<T>, bounds: PageBounds) -> Self {
        let total_elements = items.len() as u64;
        let offset = usize::try_from(bounds.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(bounds.limit).unwrap_or(usize::MAX);
        let content = items.into_iter().skip(offset).take(limit).collect();
        Self::from_parts(content, total_elements, bounds)
    }
}

/// Either a page with metadata or the full collection, chosen by whether the
/// caller supplied pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Paged(Page<T>),
    Full(Vec<T>),
}

impl<T> Listing<T> {
    /// Shapes an in-memory collection according to `bounds`.
    #[must_use]
    pub fn from_collection(items: Vec<T>, bounds: Option<PageBounds>) -> Self {
        match bounds {
            Some(bounds) => Self::Paged(Page::from_collection(items, bounds)),
            None => Self::Full(items),
        }
    }

    /// Items in this listing (the page content for paged listings).
    #[must_use]
    pub fn items(&self) -> &[T] {
        match self {
            Self::Paged(page) => &page.content,
            Self::Full(items) => items,
        }
    }

    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Paged(page) => page.content,
            Self::Full(items) => items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(page: i64, limit: i64) -> PageBounds {
        match PageBounds::new(page, limit) {
            Ok(bounds) => bounds,
            Err(err) => panic!("invalid bounds: {err}"),
        }
    }

    fn query(uri: &str) -> Result<PageParams, String> {
        let uri: axum::http::Uri = uri.parse().map_err(|err| format!("{err}"))?;
        axum::extract::Query::<PageParams>::try_from_uri(&uri)
            .map(|axum::extract::Query(params)| params)
            .map_err(|err| err.body_text())
    }

    #[test]
    fn blank_query_values_count_as_absent() {
        for uri in ["/ops?page=&limit=", "/ops?page=", "/ops?limit=", "/ops?page=%20", "/ops"] {
            assert_eq!(query(uri), Ok(PageParams::default()), "{uri}");
        }
        assert_eq!(
            query("/ops?page=&limit=5"),
            Ok(PageParams {
                page: None,
                limit: Some(5)
            })
        );
        assert!(query("/ops?page=abc").is_err());
    }

    #[test]
    fn empty_params_select_full_branch() {
        assert_eq!(PageParams::default().bounds(), Ok(None));
        let listing = Listing::from_collection(vec![1, 2, 3], None);
        assert_eq!(listing, Listing::Full(vec![1, 2, 3]));
    }

    #[test]
    fn missing_partner_parameter_defaults() {
        let only_limit = PageParams {
            page: None,
            limit: Some(5),
        };
        assert_eq!(only_limit.bounds(), Ok(Some(bounds(0, 5))));

        let only_page = PageParams {
            page: Some(2),
            limit: None,
        };
        assert_eq!(
            only_page.bounds().ok().flatten().map(|b| b.limit()),
            Some(DEFAULT_LIMIT)
        );
    }

    #[test]
    fn invalid_params_are_rejected() {
        assert!(PageParams::new(-1, 10).bounds().is_err());
        assert!(PageParams::new(0, 0).bounds().is_err());
        assert!(PageParams::new(0, -3).bounds().is_err());
        assert!(PageParams::new(0, 1001).bounds().is_err());
    }

    #[test]
    fn page_sizes_follow_min_formula() {
        // min(L, max(0, N - p*L)) items and ceil(N/L) pages.
        for n in 0_u64..12 {
            let items: Vec<u64> = (0..n).collect();
            for limit in 1_u64..5 {
                for page in 0_u64..6 {
                    let b = bounds(page as i64, limit as i64);
                    let result = Page::from_collection(items.clone(), b);
                    let expected = limit.min(n.saturating_sub(page * limit));
                    assert_eq!(result.content.len() as u64, expected, "n={n} l={limit} p={page}");
                    assert_eq!(result.total_pages, n.div_ceil(limit));
                    assert_eq!(result.total_elements, n);
                }
            }
        }
    }

    #[test]
    fn page_beyond_last_is_empty() {
        let page = Page::from_collection(vec!["a", "b", "c"], bounds(7, 2));
        assert!(page.content.is_empty());
        assert_eq!(page.total_pages, 2);
        assert!(page.last);
        assert!(!page.first);
    }

    #[test]
    fn page_slices_in_order() {
        let page = Page::from_collection(vec![1, 2, 3, 4, 5], bounds(1, 2));
        assert_eq!(page.content, vec![3, 4]);
        assert!(!page.last);
    }

    #[test]
    fn empty_collection_has_zero_pages() {
        let page: Page<u8> = Page::from_collection(Vec::new(), bounds(0, 10));
        assert_eq!(page.total_pages, 0);
        assert!(page.first);
        assert!(page.last);
    }

    #[test]
    fn huge_page_index_does_not_overflow() {
        let b = bounds(i64::MAX, 1000);
        assert_eq!(b.offset(), u64::MAX);
        let page = Page::from_collection(vec![1, 2], b);
        assert!(page.content.is_empty());
    }

    #[test]
    fn paged_listing_serializes_with_metadata() {
        let listing = Listing::from_collection(vec![1, 2, 3], Some(bounds(0, 2)));
        let json = serde_json::to_value(&listing).unwrap_or_default();
        assert_eq!(json["total_elements"], 3);
        assert_eq!(json["total_pages"], 2);
        assert_eq!(json["content"], serde_json::json!([1, 2]));

        let full = serde_json::to_value(Listing::from_collection(vec![1, 2, 3], None))
            .unwrap_or_default();
        assert_eq!(full, serde_json::json!([1, 2, 3]));
    }
}
