//! Repository for the `venues` table.

use sqlx::{PgPool, Postgres, QueryBuilder};
use venuebook_core::pagination::{Paginated, SortAndPaginationParams};
use venuebook_core::types::DbId;

use crate::models::venue::{CreateVenue, Venue, VenueSummary, VenueSummaryRow};
use crate::query::order_by_clause;

/// Column list for `venues` queries.
const COLUMNS: &str = "id, manager_id, name, address, phone, created_at, updated_at";

/// Sortable fields exposed to clients and the columns they map to.
const SORT_COLUMNS: &[(&str, &str)] = &[
    ("id", "v.id"),
    ("name", "v.name"),
    ("created_at", "v.created_at"),
];

/// Provides CRUD operations for venues.
pub struct VenueRepo;

impl VenueRepo {
    /// Field names accepted in the `sort` parameter of venue listings.
    pub const SORT_FIELDS: &'static [&'static str] = &["id", "name", "created_at"];

    pub async fn create(pool: &PgPool, input: &CreateVenue) -> Result<Venue, sqlx::Error> {
        let query = format!(
            "INSERT INTO venues (manager_id, name, address, phone) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Venue>(&query)
            .bind(input.manager_id)
            .bind(&input.name)
            .bind(&input.address)
            .bind(&input.phone)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Venue>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM venues WHERE id = $1");
        sqlx::query_as::<_, Venue>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List venues with their managers, sorted and paginated.
    pub async fn list(
        pool: &PgPool,
        params: &SortAndPaginationParams,
    ) -> Result<Paginated<VenueSummary>, sqlx::Error> {
        let window = params.pagination_params.resolve();

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM venues")
            .fetch_one(pool)
            .await?;

        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT v.id, v.manager_id, v.name, v.address, v.phone, \
                    v.created_at, v.updated_at, u.name AS manager_name \
             FROM venues v \
             JOIN users u ON u.id = v.manager_id",
        );
        qb.push(order_by_clause(
            &params.sort,
            SORT_COLUMNS,
            "v.name ASC",
            ("id", "v.id"),
        ));
        qb.push(" LIMIT ")
            .push_bind(window.limit)
            .push(" OFFSET ")
            .push_bind(window.offset);

        let rows = qb
            .build_query_as::<VenueSummaryRow>()
            .fetch_all(pool)
            .await?;

        Ok(Paginated::new(
            rows.into_iter().map(VenueSummary::from).collect(),
            window,
            total,
        ))
    }
}
