//! Booking entity model, DTOs, and the booking summary projection.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use venuebook_core::date_range::RangeFilter;
use venuebook_core::error::CoreError;
use venuebook_core::status::BookingStatus;
use venuebook_core::types::{DbId, Timestamp};

use super::space::{Space, SpaceWithVenue};
use super::user::OwnerLite;
use super::venue::Venue;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `bookings` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Booking {
    pub id: DbId,
    pub space_id: DbId,
    /// `None` for walk-in guest bookings.
    pub user_id: Option<DbId>,
    pub guest_name: Option<String>,
    pub guest_phone: Option<String>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub status: String,
    pub note: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a booking.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub space_id: DbId,
    pub user_id: Option<DbId>,
    pub guest_name: Option<String>,
    pub guest_phone: Option<String>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub status: BookingStatus,
    pub note: Option<String>,
}

/// Filters for booking list queries. `None` fields add no predicate.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub owner_id: Option<DbId>,
    pub venue_id: Option<DbId>,
    pub space_id: Option<DbId>,
    pub status: Option<BookingStatus>,
    /// Applied to `start_time`.
    pub start_range: Option<RangeFilter<Timestamp>>,
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// A booking with its owner, space, and venue resolved.
///
/// `user` is absent for guest bookings. `space` and `space.venue` are always
/// present; a booking that cannot resolve them is an integrity error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingSummary {
    #[serde(flatten)]
    pub booking: Booking,
    pub user: Option<OwnerLite>,
    pub space: SpaceWithVenue,
}

impl BookingSummary {
    pub fn project(
        booking: Booking,
        space: Option<Space>,
        venue: Option<Venue>,
        owner: Option<OwnerLite>,
    ) -> Result<Self, CoreError> {
        let space = space.ok_or_else(|| {
            CoreError::Integrity(format!(
                "booking {} references missing space {}",
                booking.id, booking.space_id
            ))
        })?;
        if space.id != booking.space_id {
            return Err(CoreError::Integrity(format!(
                "booking {} resolved to space {} instead of {}",
                booking.id, space.id, booking.space_id
            )));
        }

        let venue = venue.ok_or_else(|| {
            CoreError::Integrity(format!(
                "space {} references missing venue {}",
                space.id, space.venue_id
            ))
        })?;
        if venue.id != space.venue_id {
            return Err(CoreError::Integrity(format!(
                "space {} resolved to venue {} instead of {}",
                space.id, venue.id, space.venue_id
            )));
        }

        Ok(Self {
            booking,
            user: owner,
            space: SpaceWithVenue { space, venue },
        })
    }

    /// Venue manager, used for access checks.
    pub fn manager_id(&self) -> DbId {
        self.space.venue.manager_id
    }
}

/// Column list for [`BookingSummaryRow`] queries. Expects the aliases
/// `b` (bookings), `s` (spaces), `v` (venues), `u` (users).
pub const SUMMARY_COLUMNS: &str = "\
    b.id, b.space_id, b.user_id, b.guest_name, b.guest_phone, \
    b.start_time, b.end_time, b.status, b.note, b.created_at, b.updated_at, \
    s.id AS s_id, s.venue_id AS s_venue_id, s.name AS s_name, \
    s.capacity AS s_capacity, s.description AS s_description, \
    s.created_at AS s_created_at, s.updated_at AS s_updated_at, \
    v.id AS v_id, v.manager_id AS v_manager_id, v.name AS v_name, \
    v.address AS v_address, v.phone AS v_phone, \
    v.created_at AS v_created_at, v.updated_at AS v_updated_at, \
    u.id AS u_id, u.name AS u_name";

/// `FROM` clause matching [`SUMMARY_COLUMNS`]. Joins are outer so that a
/// dangling reference reaches [`BookingSummary::project`] instead of
/// silently dropping the row.
pub const SUMMARY_FROM: &str = "\
    FROM bookings b \
    LEFT JOIN spaces s ON s.id = b.space_id \
    LEFT JOIN venues v ON v.id = s.venue_id \
    LEFT JOIN users u ON u.id = b.user_id";

/// Flat outer-join row behind [`BookingSummary`].
#[derive(Debug, Clone, FromRow)]
pub struct BookingSummaryRow {
    pub id: DbId,
    pub space_id: DbId,
    pub user_id: Option<DbId>,
    pub guest_name: Option<String>,
    pub guest_phone: Option<String>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub status: String,
    pub note: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,

    pub s_id: Option<DbId>,
    pub s_venue_id: Option<DbId>,
    pub s_name: Option<String>,
    pub s_capacity: Option<i32>,
    pub s_description: Option<String>,
    pub s_created_at: Option<Timestamp>,
    pub s_updated_at: Option<Timestamp>,

    pub v_id: Option<DbId>,
    pub v_manager_id: Option<DbId>,
    pub v_name: Option<String>,
    pub v_address: Option<String>,
    pub v_phone: Option<String>,
    pub v_created_at: Option<Timestamp>,
    pub v_updated_at: Option<Timestamp>,

    pub u_id: Option<DbId>,
    pub u_name: Option<String>,
}

impl BookingSummaryRow {
    /// Split the joined row and project it.
    pub fn into_summary(self) -> Result<BookingSummary, CoreError> {
        let space = match (
            self.s_id,
            self.s_venue_id,
            self.s_name,
            self.s_capacity,
            self.s_created_at,
            self.s_updated_at,
        ) {
            (Some(id), Some(venue_id), Some(name), Some(capacity), Some(created_at), Some(updated_at)) => {
                Some(Space {
                    id,
                    venue_id,
                    name,
                    capacity,
                    description: self.s_description,
                    created_at,
                    updated_at,
                })
            }
            _ => None,
        };

        let venue = match (
            self.v_id,
            self.v_manager_id,
            self.v_name,
            self.v_address,
            self.v_created_at,
            self.v_updated_at,
        ) {
            (Some(id), Some(manager_id), Some(name), Some(address), Some(created_at), Some(updated_at)) => {
                Some(Venue {
                    id,
                    manager_id,
                    name,
                    address,
                    phone: self.v_phone,
                    created_at,
                    updated_at,
                })
            }
            _ => None,
        };

        let owner = match (self.u_id, self.u_name) {
            (Some(id), Some(name)) => Some(OwnerLite { id, name }),
            _ => None,
        };

        let booking = Booking {
            id: self.id,
            space_id: self.space_id,
            user_id: self.user_id,
            guest_name: self.guest_name,
            guest_phone: self.guest_phone,
            start_time: self.start_time,
            end_time: self.end_time,
            status: self.status,
            note: self.note,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };

        BookingSummary::project(booking, space, venue, owner)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap()
    }

    fn booking(user_id: Option<DbId>) -> Booking {
        Booking {
            id: 10,
            space_id: 3,
            user_id,
            guest_name: user_id.is_none().then(|| "Walk-in".to_string()),
            guest_phone: None,
            start_time: now(),
            end_time: now() + Duration::hours(2),
            status: "confirmed".to_string(),
            note: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn space() -> Space {
        Space {
            id: 3,
            venue_id: 7,
            name: "Court A".to_string(),
            capacity: 4,
            description: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn venue() -> Venue {
        Venue {
            id: 7,
            manager_id: 2,
            name: "Riverside Sports Hall".to_string(),
            address: "12 Nguyen Hue, District 1".to_string(),
            phone: Some("+84283822000".to_string()),
            created_at: now(),
            updated_at: now(),
        }
    }

    fn owner() -> OwnerLite {
        OwnerLite {
            id: 5,
            name: "John Doe".to_string(),
        }
    }

    #[test]
    fn project_composes_nested_records() {
        let summary =
            BookingSummary::project(booking(Some(5)), Some(space()), Some(venue()), Some(owner()))
                .unwrap();
        assert_eq!(summary.user, Some(owner()));
        assert_eq!(summary.space.space.id, 3);
        assert_eq!(summary.space.venue.id, 7);
        assert_eq!(summary.manager_id(), 2);
    }

    #[test]
    fn guest_booking_has_no_user() {
        let summary =
            BookingSummary::project(booking(None), Some(space()), Some(venue()), None).unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json["user"].is_null());
        assert_eq!(json["guest_name"], "Walk-in");
    }

    #[test]
    fn missing_space_is_integrity_error() {
        let result = BookingSummary::project(booking(Some(5)), None, Some(venue()), Some(owner()));
        assert_matches!(result, Err(CoreError::Integrity(msg)) if msg.contains("space 3"));
    }

    #[test]
    fn missing_venue_is_integrity_error() {
        let result = BookingSummary::project(booking(Some(5)), Some(space()), None, Some(owner()));
        assert_matches!(result, Err(CoreError::Integrity(msg)) if msg.contains("venue 7"));
    }

    #[test]
    fn mismatched_relations_are_integrity_errors() {
        let mut other_space = space();
        other_space.id = 99;
        assert_matches!(
            BookingSummary::project(booking(None), Some(other_space), Some(venue()), None),
            Err(CoreError::Integrity(_))
        );

        let mut other_venue = venue();
        other_venue.id = 99;
        assert_matches!(
            BookingSummary::project(booking(None), Some(space()), Some(other_venue), None),
            Err(CoreError::Integrity(_))
        );
    }

    #[test]
    fn serialized_shape_nests_space_and_venue() {
        let summary =
            BookingSummary::project(booking(Some(5)), Some(space()), Some(venue()), Some(owner()))
                .unwrap();
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["id"], 10);
        assert_eq!(json["user"], serde_json::json!({ "id": 5, "name": "John Doe" }));
        assert_eq!(json["space"]["name"], "Court A");
        assert_eq!(json["space"]["venue"]["name"], "Riverside Sports Hall");
    }

    fn joined_row() -> BookingSummaryRow {
        let b = booking(Some(5));
        let s = space();
        let v = venue();
        BookingSummaryRow {
            id: b.id,
            space_id: b.space_id,
            user_id: b.user_id,
            guest_name: b.guest_name,
            guest_phone: b.guest_phone,
            start_time: b.start_time,
            end_time: b.end_time,
            status: b.status,
            note: b.note,
            created_at: b.created_at,
            updated_at: b.updated_at,
            s_id: Some(s.id),
            s_venue_id: Some(s.venue_id),
            s_name: Some(s.name),
            s_capacity: Some(s.capacity),
            s_description: s.description,
            s_created_at: Some(s.created_at),
            s_updated_at: Some(s.updated_at),
            v_id: Some(v.id),
            v_manager_id: Some(v.manager_id),
            v_name: Some(v.name),
            v_address: Some(v.address),
            v_phone: v.phone,
            v_created_at: Some(v.created_at),
            v_updated_at: Some(v.updated_at),
            u_id: Some(5),
            u_name: Some("John Doe".to_string()),
        }
    }

    #[test]
    fn joined_row_projects() {
        let summary = joined_row().into_summary().unwrap();
        assert_eq!(summary.space, SpaceWithVenue { space: space(), venue: venue() });
        assert_eq!(summary.user, Some(owner()));
    }

    #[test]
    fn joined_row_with_dangling_space_fails() {
        let mut row = joined_row();
        row.s_id = None;
        row.v_id = None;
        assert_matches!(row.into_summary(), Err(CoreError::Integrity(_)));
    }

    #[test]
    fn joined_row_with_dangling_venue_fails() {
        let mut row = joined_row();
        row.v_id = None;
        assert_matches!(row.into_summary(), Err(CoreError::Integrity(_)));
    }
}
