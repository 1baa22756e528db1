//! Production implementations of the dispatch collaborators.
//!
//! - [`pg`] -- Postgres-backed alert store and contact directory.
//! - [`email`] -- SMTP-backed notification and confirmation senders.

pub mod email;
pub mod pg;

pub use email::{EmailConfirmationSender, EmailNotificationSender};
pub use pg::{PgAlertStore, PgContactDirectory};
