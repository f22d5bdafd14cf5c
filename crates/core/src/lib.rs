//! Domain primitives shared by the persistence, mail, and HTTP crates.
//!
//! Everything here is synchronous and free of I/O.

pub mod date_range;
pub mod error;
pub mod pagination;
pub mod phone;
pub mod roles;
pub mod status;
pub mod types;
pub mod validation;
