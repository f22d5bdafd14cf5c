//! Row structs, create DTOs, and read projections.
//!
//! Row structs derive `FromRow`. Projections (`OwnerLite`, `BookingSummary`,
//! `VenueSummary`) are built per request and never written back.

pub mod booking;
pub mod mail_log;
pub mod space;
pub mod user;
pub mod venue;
