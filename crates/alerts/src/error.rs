use safestep_core::error::CoreError;
use safestep_core::status::AlertStatus;

/// Failure of a persistence collaborator (alert store or contact directory).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("No emergency contacts found. Please add contacts first.")]
    NoContacts,

    /// The alert already left `active`; `status` is where it is now.
    #[error("Alert is already resolved")]
    InvalidTransition { status: AlertStatus },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<sqlx::Error> for AlertError {
    fn from(err: sqlx::Error) -> Self {
        Self::Store(StoreError::Database(err))
    }
}
