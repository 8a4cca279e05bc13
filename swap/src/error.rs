//! Swap error types

use thiserror::Error;
use vesika_core::{LedgerError, TokenId};

/// Pool and router errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Slippage exceeded: output {actual} below minimum {minimum}")]
    SlippageExceeded { minimum: String, actual: String },

    #[error("Pool inactive: {0}")]
    PoolInactive(TokenId),

    #[error("No pool or token at address: {0}")]
    AddressZero(String),

    #[error("Pool already exists: {0}")]
    PoolExists(TokenId),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub type Result<T> = std::result::Result<T, SwapError>;
