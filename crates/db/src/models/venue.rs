//! Venue entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use venuebook_core::types::{DbId, Timestamp};

use super::user::OwnerLite;

/// A row from the `venues` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Venue {
    pub id: DbId,
    pub manager_id: DbId,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a venue.
#[derive(Debug, Clone)]
pub struct CreateVenue {
    pub manager_id: DbId,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
}

/// A venue with its manager reduced to [`OwnerLite`].
#[derive(Debug, Clone, Serialize)]
pub struct VenueSummary {
    #[serde(flatten)]
    pub venue: Venue,
    pub manager: OwnerLite,
}

/// Flat `venues JOIN users` row backing [`VenueSummary`].
#[derive(Debug, Clone, FromRow)]
pub struct VenueSummaryRow {
    pub id: DbId,
    pub manager_id: DbId,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub manager_name: String,
}

impl From<VenueSummaryRow> for VenueSummary {
    fn from(row: VenueSummaryRow) -> Self {
        Self {
            manager: OwnerLite {
                id: row.manager_id,
                name: row.manager_name,
            },
            venue: Venue {
                id: row.id,
                manager_id: row.manager_id,
                name: row.name,
                address: row.address,
                phone: row.phone,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}
