//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod booking_repo;
pub mod mail_log_repo;
pub mod space_repo;
pub mod user_repo;
pub mod venue_repo;

pub use booking_repo::{is_overlap_violation, BookingRepo};
pub use mail_log_repo::MailLogRepo;
pub use space_repo::SpaceRepo;
pub use user_repo::UserRepo;
pub use venue_repo::VenueRepo;
