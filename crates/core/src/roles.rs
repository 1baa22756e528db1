//! Well-known role name constants carried in access-token claims.

/// Administrator of the SafeStep panel (alert management across all users).
pub const ROLE_ADMIN: &str = "admin";

/// Regular account holder who raises alerts and manages contacts.
pub const ROLE_USER: &str = "user";
