//! Staking error types

use thiserror::Error;
use vesika_core::LedgerError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StakingError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Already staking: {0}")]
    AlreadyStaking(String),

    #[error("No active stake: {0}")]
    NoActiveStake(String),

    #[error("Minimum lock period is 30 days: requested {requested}s, minimum {minimum}s")]
    BelowMinimumLock { requested: u64, minimum: u64 },

    #[error("Maximum lock period is 365 days: requested {requested}s, maximum {maximum}s")]
    AboveMaximumLock { requested: u64, maximum: u64 },

    #[error("Lock period not finished: unlocks at {unlock_at}, now {now}")]
    LockNotExpired { unlock_at: u64, now: u64 },

    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: String, available: String },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub type Result<T> = std::result::Result<T, StakingError>;
