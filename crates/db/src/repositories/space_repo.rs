//! Repository for the `spaces` table.

use sqlx::PgPool;
use venuebook_core::types::DbId;

use crate::models::space::{CreateSpace, Space};

/// Column list for `spaces` queries.
const COLUMNS: &str = "id, venue_id, name, capacity, description, created_at, updated_at";

/// Provides CRUD operations for spaces.
pub struct SpaceRepo;

impl SpaceRepo {
    pub async fn create(pool: &PgPool, input: &CreateSpace) -> Result<Space, sqlx::Error> {
        let query = format!(
            "INSERT INTO spaces (venue_id, name, capacity, description) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Space>(&query)
            .bind(input.venue_id)
            .bind(&input.name)
            .bind(input.capacity)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Space>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM spaces WHERE id = $1");
        sqlx::query_as::<_, Space>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All spaces of a venue, by name.
    pub async fn list_by_venue(pool: &PgPool, venue_id: DbId) -> Result<Vec<Space>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM spaces WHERE venue_id = $1 ORDER BY name, id");
        sqlx::query_as::<_, Space>(&query)
            .bind(venue_id)
            .fetch_all(pool)
            .await
    }
}
