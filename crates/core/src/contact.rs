//! Parties involved in an alert: the owner who raises it and the contacts
//! who receive it.

use serde::Serialize;

use crate::types::DbId;

/// An active emergency contact eligible to be notified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveContact {
    pub id: DbId,
    pub name: String,
    pub email: String,
}

impl ActiveContact {
    pub fn new(id: DbId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }
}

/// The user raising an alert, as identified by their session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertOwner {
    pub id: DbId,
    pub name: String,
    pub email: String,
}
