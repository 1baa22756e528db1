//! Emergency alert dispatch.
//!
//! - [`dispatcher::AlertDispatcher`] validates a request, records the alert,
//!   and fans notifications out in background tasks.
//! - [`lifecycle::AlertLifecycleManager`] moves active alerts to a terminal
//!   status.
//! - [`store::AlertStore`], [`directory::ContactDirectory`], and the
//!   [`sender`] traits are the seams to persistence and email; production
//!   implementations live in [`adapters`].

pub mod adapters;
pub mod directory;
pub mod dispatcher;
pub mod error;
pub mod lifecycle;
pub mod sender;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use directory::{ContactDirectory, InMemoryContactDirectory};
pub use dispatcher::AlertDispatcher;
pub use error::{AlertError, StoreError};
pub use lifecycle::{AlertLifecycleManager, ResolveRequest};
pub use sender::{ConfirmationSender, DeliveryFailure, NotificationSender};
pub use store::{AlertStore, InMemoryAlertStore, ResolveOutcome};
