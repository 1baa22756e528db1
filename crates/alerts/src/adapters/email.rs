//! Email-backed senders.
//!
//! Both senders take an optional [`EmailDelivery`]; without one every send
//! fails with [`DeliveryFailure::NotConfigured`]. Each attempt is bounded by
//! the configured timeout.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use safestep_core::alert::Location;
use safestep_core::contact::{ActiveContact, AlertOwner};
use safestep_core::types::DbId;
use safestep_notify::{messages, EmailDelivery, OutgoingEmail};

use crate::sender::{ConfirmationSender, DeliveryFailure, NotificationSender};

/// Default upper bound on one delivery attempt.
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(30);

async fn deliver_within(
    delivery: Option<&EmailDelivery>,
    email: &OutgoingEmail,
    timeout: Duration,
) -> Result<(), DeliveryFailure> {
    let delivery = delivery.ok_or(DeliveryFailure::NotConfigured)?;
    match tokio::time::timeout(timeout, delivery.deliver(email)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(DeliveryFailure::Rejected(e.to_string())),
        Err(_) => Err(DeliveryFailure::TimedOut(timeout)),
    }
}

/// Sends the emergency email to each contact.
#[derive(Clone)]
pub struct EmailNotificationSender {
    delivery: Option<Arc<EmailDelivery>>,
    timeout: Duration,
}

impl EmailNotificationSender {
    pub fn new(delivery: Option<Arc<EmailDelivery>>, timeout: Duration) -> Self {
        Self { delivery, timeout }
    }
}

#[async_trait]
impl NotificationSender for EmailNotificationSender {
    async fn send(
        &self,
        contact: &ActiveContact,
        sender_name: &str,
        location: &Location,
        alert_id: DbId,
    ) -> Result<(), DeliveryFailure> {
        let email = messages::emergency_notification(
            &contact.email,
            &contact.name,
            sender_name,
            location,
            alert_id,
        );
        deliver_within(self.delivery.as_deref(), &email, self.timeout).await
    }
}

/// Sends the confirmation email back to the alert's owner.
#[derive(Clone)]
pub struct EmailConfirmationSender {
    delivery: Option<Arc<EmailDelivery>>,
    timeout: Duration,
}

impl EmailConfirmationSender {
    pub fn new(delivery: Option<Arc<EmailDelivery>>, timeout: Duration) -> Self {
        Self { delivery, timeout }
    }
}

#[async_trait]
impl ConfirmationSender for EmailConfirmationSender {
    async fn send(
        &self,
        owner: &AlertOwner,
        location: &Location,
        alert_id: DbId,
        contact_count: usize,
    ) -> Result<(), DeliveryFailure> {
        let email = messages::alert_confirmation(
            &owner.email,
            &owner.name,
            location,
            alert_id,
            contact_count,
            Utc::now(),
        );
        deliver_within(self.delivery.as_deref(), &email, self.timeout).await
    }
}
