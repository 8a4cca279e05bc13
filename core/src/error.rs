//! Ledger error types

use thiserror::Error;

use crate::state::TokenId;

/// Balance ledger and access errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient balance of {token}: requested {requested}, available {available}")]
    InsufficientBalance {
        token: TokenId,
        requested: String,
        available: String,
    },

    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    #[error("Max supply exceeded for {0}")]
    MaxSupplyExceeded(TokenId),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Arithmetic overflow")]
    Overflow,
}

pub type Result<T> = std::result::Result<T, LedgerError>;
