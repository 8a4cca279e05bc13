//! Registry error types

use thiserror::Error;
use vesika_core::LedgerError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Artist already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Artist not registered: {0}")]
    NotRegistered(String),

    #[error("Artist not approved: {0}")]
    NotApproved(String),

    #[error("Request does not exist: {0}")]
    RequestNotFound(u64),

    #[error("Request not pending: {0}")]
    RequestNotPending(u64),

    #[error("Request not approved: {0}")]
    RequestNotApproved(u64),

    #[error("Token already deployed for request {0}")]
    AlreadyDeployed(u64),

    #[error("Registry is paused")]
    Paused,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
