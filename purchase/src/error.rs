//! Sale error types

use thiserror::Error;
use vesika_core::LedgerError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaleError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Sale is not active")]
    SaleInactive,

    #[error("Below minimum purchase: {value} < {minimum}")]
    BelowMinimum { value: String, minimum: String },

    #[error("Above maximum purchase: {value} > {maximum}")]
    AboveMaximum { value: String, maximum: String },

    #[error("Insufficient inventory: requested {requested}, available {available}")]
    InsufficientInventory { requested: String, available: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub type Result<T> = std::result::Result<T, SaleError>;
