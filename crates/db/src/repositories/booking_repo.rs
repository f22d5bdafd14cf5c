//! Repository for the `bookings` table and the booking summary read path.

use sqlx::{PgPool, Postgres, QueryBuilder};
use venuebook_core::pagination::{PageWindow, SortAndPaginationParams};
use venuebook_core::status::BookingStatus;
use venuebook_core::types::{DbId, Timestamp};

use crate::models::booking::{
    Booking, BookingFilter, BookingSummaryRow, CreateBooking, SUMMARY_COLUMNS, SUMMARY_FROM,
};
use crate::query::{order_by_clause, push_range, Conditions};

/// Column list for `bookings` queries.
const COLUMNS: &str = "\
    id, space_id, user_id, guest_name, guest_phone, start_time, end_time, \
    status, note, created_at, updated_at";

/// Sortable fields exposed to clients and the columns they map to.
const SORT_COLUMNS: &[(&str, &str)] = &[
    ("id", "b.id"),
    ("start_time", "b.start_time"),
    ("end_time", "b.end_time"),
    ("status", "b.status"),
    ("created_at", "b.created_at"),
];

/// One page of summary rows plus the unpaged match count.
#[derive(Debug)]
pub struct SummaryPage {
    pub rows: Vec<BookingSummaryRow>,
    pub window: PageWindow,
    pub total: i64,
}

/// Provides CRUD operations and summary queries for bookings.
pub struct BookingRepo;

impl BookingRepo {
    /// Field names accepted in the `sort` parameter of booking listings.
    pub const SORT_FIELDS: &'static [&'static str] =
        &["id", "start_time", "end_time", "status", "created_at"];

    /// Exclusion constraint that keeps active bookings of a space disjoint.
    pub const OVERLAP_CONSTRAINT: &'static str = "ex_bookings_space_time";

    pub async fn create(pool: &PgPool, input: &CreateBooking) -> Result<Booking, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookings \
                (space_id, user_id, guest_name, guest_phone, start_time, end_time, status, note) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(input.space_id)
            .bind(input.user_id)
            .bind(&input.guest_name)
            .bind(&input.guest_phone)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.status.as_str())
            .bind(&input.note)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch the joined row for a single booking summary.
    pub async fn find_summary(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<BookingSummaryRow>, sqlx::Error> {
        let query = format!("SELECT {SUMMARY_COLUMNS} {SUMMARY_FROM} WHERE b.id = $1");
        sqlx::query_as::<_, BookingSummaryRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List summary rows matching `filter`, sorted and paginated.
    ///
    /// Sort fields must already be checked against [`Self::SORT_FIELDS`].
    /// Without a sort, the newest bookings come first.
    pub async fn list_summaries(
        pool: &PgPool,
        filter: &BookingFilter,
        params: &SortAndPaginationParams,
    ) -> Result<SummaryPage, sqlx::Error> {
        let window = params.pagination_params.resolve();

        let mut count = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) {SUMMARY_FROM}"));
        push_filter(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {SUMMARY_COLUMNS} {SUMMARY_FROM}"));
        push_filter(&mut qb, filter);
        qb.push(order_by_clause(
            &params.sort,
            SORT_COLUMNS,
            "b.start_time DESC",
            ("id", "b.id"),
        ));
        qb.push(" LIMIT ")
            .push_bind(window.limit)
            .push(" OFFSET ")
            .push_bind(window.offset);

        let rows = qb
            .build_query_as::<BookingSummaryRow>()
            .fetch_all(pool)
            .await?;

        Ok(SummaryPage {
            rows,
            window,
            total,
        })
    }

    /// Whether a non-cancelled booking on `space_id` overlaps `[start, end)`.
    ///
    /// A cheap pre-check; [`Self::OVERLAP_CONSTRAINT`] still rejects an insert
    /// that races past it.
    pub async fn has_overlap(
        pool: &PgPool,
        space_id: DbId,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS ( \
                SELECT 1 FROM bookings \
                WHERE space_id = $1 \
                  AND status <> $4 \
                  AND start_time < $3 \
                  AND end_time > $2 \
             )",
        )
        .bind(space_id)
        .bind(start)
        .bind(end)
        .bind(BookingStatus::Cancelled.as_str())
        .fetch_one(pool)
        .await
    }

    /// Cancel a booking that is not cancelled yet. Returns `None` when the
    /// booking does not exist or was already cancelled, so concurrent
    /// cancels resolve to exactly one winner.
    pub async fn cancel(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings SET status = $2, updated_at = NOW() \
             WHERE id = $1 AND status <> $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(BookingStatus::Cancelled.as_str())
            .fetch_optional(pool)
            .await
    }
}

/// Whether `err` is the exclusion violation raised when an insert overlaps an
/// active booking of the same space.
pub fn is_overlap_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23P01")
                && db_err.constraint() == Some(BookingRepo::OVERLAP_CONSTRAINT)
        }
        _ => false,
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &BookingFilter) {
    let mut conditions = Conditions::new();

    if let Some(owner_id) = filter.owner_id {
        conditions.next(qb);
        qb.push("b.user_id = ").push_bind(owner_id);
    }
    if let Some(venue_id) = filter.venue_id {
        conditions.next(qb);
        qb.push("s.venue_id = ").push_bind(venue_id);
    }
    if let Some(space_id) = filter.space_id {
        conditions.next(qb);
        qb.push("b.space_id = ").push_bind(space_id);
    }
    if let Some(status) = filter.status {
        conditions.next(qb);
        qb.push("b.status = ").push_bind(status.as_str());
    }
    if let Some(range) = &filter.start_range {
        push_range(qb, &mut conditions, "b.start_time", range);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use venuebook_core::date_range::build_range;

    use super::*;

    #[test]
    fn empty_filter_adds_no_where_clause() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 FROM bookings b");
        push_filter(&mut qb, &BookingFilter::default());
        assert_eq!(qb.sql(), "SELECT 1 FROM bookings b");
    }

    #[test]
    fn filters_are_joined_with_and() {
        let start = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        let filter = BookingFilter {
            owner_id: Some(5),
            status: Some(BookingStatus::Confirmed),
            start_range: build_range(Some(start), None),
            ..BookingFilter::default()
        };

        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 FROM bookings b");
        push_filter(&mut qb, &filter);
        assert_eq!(
            qb.sql(),
            "SELECT 1 FROM bookings b WHERE b.user_id = $1 AND b.status = $2 \
             AND b.start_time >= $3"
        );
    }

    #[test]
    fn only_database_errors_are_overlap_violations() {
        assert!(!is_overlap_violation(&sqlx::Error::RowNotFound));
        assert!(!is_overlap_violation(&sqlx::Error::PoolTimedOut));
    }

    #[test]
    fn sort_fields_match_sort_columns() {
        let mapped: Vec<_> = SORT_COLUMNS.iter().map(|(field, _)| *field).collect();
        assert_eq!(mapped, BookingRepo::SORT_FIELDS);
    }
}
