//! Optional start/end bounds turned into a range predicate.
//!
//! The persistence layer treats a `None` filter as "no predicate on this
//! column". Bounds are never compared against each other, so an inverted
//! range is accepted and simply matches nothing.

use serde::{Deserialize, Serialize};

/// Inclusive range predicate. At least one bound is set when produced by
/// [`build_range`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeFilter<T> {
    #[serde(rename = "greaterOrEqual", skip_serializing_if = "Option::is_none")]
    pub gte: Option<T>,
    #[serde(rename = "lessOrEqual", skip_serializing_if = "Option::is_none")]
    pub lte: Option<T>,
}

/// Build a range filter from optional bounds.
///
/// # Examples
///
/// ```
/// use venuebook_core::date_range::{build_range, RangeFilter};
///
/// assert_eq!(build_range::<i32>(None, None), None);
/// assert_eq!(build_range(Some(1), None), Some(RangeFilter { gte: Some(1), lte: None }));
/// ```
pub fn build_range<T>(start: Option<T>, end: Option<T>) -> Option<RangeFilter<T>> {
    match (start, end) {
        (None, None) => None,
        (gte, lte) => Some(RangeFilter { gte, lte }),
    }
}
