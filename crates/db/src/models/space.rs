//! Space (bookable room/court/desk inside a venue) model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use venuebook_core::types::{DbId, Timestamp};

use super::venue::Venue;

/// A row from the `spaces` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Space {
    pub id: DbId,
    pub venue_id: DbId,
    pub name: String,
    pub capacity: i32,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a space.
#[derive(Debug, Clone)]
pub struct CreateSpace {
    pub venue_id: DbId,
    pub name: String,
    pub capacity: i32,
    pub description: Option<String>,
}

/// A space with its owning venue nested under `venue`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpaceWithVenue {
    #[serde(flatten)]
    pub space: Space,
    pub venue: Venue,
}
