//! User entity model, DTOs, and the owner-lite projection.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use venuebook_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`OwnerLite`] or [`UserProfile`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: String,
    pub registration_type: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Minimal `{ id, name }` view of a user or manager.
///
/// Used wherever a user is embedded in another resource (booking owner,
/// venue manager) so that contact details and credentials never leak into
/// list and summary views.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct OwnerLite {
    /// Example: `5`.
    pub id: DbId,
    /// Example: `"John Doe"`.
    pub name: String,
}

impl OwnerLite {
    pub fn project(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
        }
    }
}

impl From<&User> for OwnerLite {
    fn from(user: &User) -> Self {
        Self::project(user)
    }
}

/// The caller's own account, returned by registration.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub registration_type: String,
    pub created_at: Timestamp,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role,
            registration_type: user.registration_type,
            created_at: user.created_at,
        }
    }
}

/// DTO for inserting a user. The phone is stored as given; callers
/// normalize it first.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: String,
}
