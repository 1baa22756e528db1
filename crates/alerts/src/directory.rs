//! Read-only access to each user's trusted contacts.

use std::collections::HashMap;

use async_trait::async_trait;
use safestep_core::contact::ActiveContact;
use safestep_core::types::DbId;
use tokio::sync::RwLock;

use crate::error::StoreError;

#[async_trait]
pub trait ContactDirectory: Send + Sync {
    /// The owner's contacts that are currently eligible for alerts, in a
    /// stable order.
    async fn list_active(&self, owner_id: DbId) -> Result<Vec<ActiveContact>, StoreError>;
}

/// Contact directory held in memory, keyed by owner.
#[derive(Debug, Default)]
pub struct InMemoryContactDirectory {
    contacts: RwLock<HashMap<DbId, Vec<ActiveContact>>>,
}

impl InMemoryContactDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the owner's active contacts.
    pub async fn set(&self, owner_id: DbId, contacts: Vec<ActiveContact>) {
        self.contacts.write().await.insert(owner_id, contacts);
    }
}

#[async_trait]
impl ContactDirectory for InMemoryContactDirectory {
    async fn list_active(&self, owner_id: DbId) -> Result<Vec<ActiveContact>, StoreError> {
        Ok(self
            .contacts
            .read()
            .await
            .get(&owner_id)
            .cloned()
            .unwrap_or_default())
    }
}
