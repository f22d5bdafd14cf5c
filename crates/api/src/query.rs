//! Query parameter types shared by list endpoints.

use serde::Deserialize;
use validator::Validate;
use venuebook_core::date_range::build_range;
use venuebook_core::error::CoreError;
use venuebook_core::pagination::{PaginationParams, SortAndPaginationParams, SortSpec};
use venuebook_core::status::BookingStatus;
use venuebook_core::types::{DbId, Timestamp};
use venuebook_db::models::booking::BookingFilter;

/// `?sort=&page=&size=` as accepted by every paginated listing.
///
/// `sort` is a comma list of `field[:asc|desc]` (or `-field`), checked
/// against the listing's whitelist in [`to_params`](Self::to_params).
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListQuery {
    pub sort: Option<String>,
    #[validate(range(min = 1))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100))]
    pub size: Option<i64>,
}

impl ListQuery {
    pub fn to_params(&self, allowed_sort: &[&str]) -> Result<SortAndPaginationParams, CoreError> {
        sort_and_page(self.sort.as_deref(), self.page, self.size, allowed_sort)
    }
}

fn sort_and_page(
    sort: Option<&str>,
    page: Option<i64>,
    size: Option<i64>,
    allowed_sort: &[&str],
) -> Result<SortAndPaginationParams, CoreError> {
    let sort = match sort {
        Some(raw) => SortSpec::parse(raw)?,
        None => SortSpec::new(),
    };
    sort.ensure_allowed(allowed_sort)?;

    Ok(SortAndPaginationParams {
        sort,
        pagination_params: PaginationParams { page, size },
    })
}

/// Query parameters for `GET /bookings`.
///
/// `from` / `to` bound `start_time` inclusively; either may be omitted.
/// The query-string decoder cannot flatten, so the [`ListQuery`] fields are
/// repeated here.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct BookingListQuery {
    pub sort: Option<String>,
    #[validate(range(min = 1))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100))]
    pub size: Option<i64>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub status: Option<BookingStatus>,
    pub venue_id: Option<DbId>,
    pub space_id: Option<DbId>,
}

impl BookingListQuery {
    pub fn to_params(&self, allowed_sort: &[&str]) -> Result<SortAndPaginationParams, CoreError> {
        sort_and_page(self.sort.as_deref(), self.page, self.size, allowed_sort)
    }

    /// Build the repository filter. `owner_id` scopes the listing to one
    /// user's bookings; `None` lists everything.
    pub fn filter(&self, owner_id: Option<DbId>) -> BookingFilter {
        BookingFilter {
            owner_id,
            venue_id: self.venue_id,
            space_id: self.space_id,
            status: self.status,
            start_range: build_range(self.from, self.to),
        }
    }
}
