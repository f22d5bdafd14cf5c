//! Sort and pagination parameters for list endpoints.
//!
//! A [`SortSpec`] is an ordered `field -> direction` mapping. It accepts any
//! field name; callers check it against the entity's whitelist with
//! [`SortSpec::ensure_allowed`] before it reaches a query.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default page size when the client does not send one.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Largest page size any list endpoint will serve.
pub const MAX_PAGE_SIZE: i64 = 100;

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(CoreError::Validation(format!(
                "Unknown sort direction '{other}', expected 'asc' or 'desc'"
            ))),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("asc"),
            SortDirection::Desc => f.write_str("desc"),
        }
    }
}

/// Ordered mapping from field name to sort direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortSpec(IndexMap<String, SortDirection>);

impl SortSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. A repeated field keeps its first position and takes
    /// the new direction.
    pub fn push(&mut self, field: impl Into<String>, direction: SortDirection) {
        self.0.insert(field.into(), direction);
    }

    /// Parse the `sort` query parameter.
    ///
    /// Format: comma-separated `field[:asc|:desc]`, or `-field` for
    /// descending. Empty segments are skipped.
    ///
    /// ```
    /// use venuebook_core::pagination::{SortDirection, SortSpec};
    ///
    /// let spec = SortSpec::parse("start_time:desc,-id,name").unwrap();
    /// let fields: Vec<_> = spec.iter().collect();
    /// assert_eq!(fields, vec![
    ///     ("start_time", SortDirection::Desc),
    ///     ("id", SortDirection::Desc),
    ///     ("name", SortDirection::Asc),
    /// ]);
    /// ```
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let mut spec = SortSpec::new();
        for segment in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (field, direction) = match segment.split_once(':') {
                Some((field, dir)) => (field.trim(), dir.trim().parse()?),
                None => match segment.strip_prefix('-') {
                    Some(field) => (field.trim(), SortDirection::Desc),
                    None => (segment, SortDirection::Asc),
                },
            };
            if field.is_empty() {
                return Err(CoreError::Validation(format!(
                    "Sort segment '{segment}' has no field name"
                )));
            }
            spec.push(field, direction);
        }
        Ok(spec)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SortDirection)> {
        self.0.iter().map(|(field, dir)| (field.as_str(), *dir))
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Reject any field that is not in `allowed`.
    pub fn ensure_allowed(&self, allowed: &[&str]) -> Result<(), CoreError> {
        match self.0.keys().find(|field| !allowed.contains(&field.as_str())) {
            Some(field) => Err(CoreError::Validation(format!(
                "Cannot sort by '{field}'. Allowed fields: {}",
                allowed.join(", ")
            ))),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Raw `?page=&size=` values as sent by the client. Page numbers are 1-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// A resolved page window ready to bind as `LIMIT` / `OFFSET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub size: i64,
    pub limit: i64,
    pub offset: i64,
}

impl PaginationParams {
    /// Apply defaults and clamp to `1..=MAX_PAGE_SIZE`.
    pub fn resolve(&self) -> PageWindow {
        let page = self.page.unwrap_or(1).max(1);
        let size = self.size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        PageWindow {
            page,
            size,
            limit: size,
            offset: (page - 1).saturating_mul(size),
        }
    }
}

/// Sort specification and page window for a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortAndPaginationParams {
    pub sort: SortSpec,
    pub pagination_params: PaginationParams,
}

/// One page of results plus the total number of matching rows.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub size: i64,
    pub total: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, window: PageWindow, total: i64) -> Self {
        Self {
            items,
            page: window.page,
            size: window.size,
            total,
        }
    }
}
