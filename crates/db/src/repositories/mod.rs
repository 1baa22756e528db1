//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod alert_repo;
pub mod contact_repo;

pub use alert_repo::AlertRepo;
pub use contact_repo::ContactRepo;
