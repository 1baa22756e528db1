//! Outbound email for SafeStep alerts.
//!
//! - [`delivery::email`] -- SMTP transport wrapper ([`EmailDelivery`]).
//! - [`messages`] -- builders for the emergency notification sent to each
//!   contact and the confirmation sent back to the alerting user.

pub mod delivery;
pub mod messages;

pub use delivery::email::{EmailConfig, EmailDelivery, EmailError, OutgoingEmail};
