//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `users.role` in
//! `20260101000001_create_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_CUSTOMER: &str = "customer";

/// Whether the role may manage venues, spaces, and walk-in bookings.
pub fn can_manage_venues(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_MANAGER
}
