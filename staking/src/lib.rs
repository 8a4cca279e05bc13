//! VesikaArt Staking Module
//!
//! Time-locked VSK positions:
//! - One active position per account
//! - Tiered APY (5% / 7% / 10% / 15%) by lock duration
//! - Rewards accrue linearly and are minted on claim
//! - Staked VSK counts 1.5x towards voting power

pub mod error;
pub mod ledger;
pub mod tier;
pub mod voting;

pub use error::{Result, StakingError};
pub use ledger::{StakeLedger, StakePosition};
pub use tier::{LockTier, TierInfo};
pub use voting::{voting_power, VotingPower};

/// Staking configuration constants
pub mod config {
    use vesika_core::constants::SECONDS_PER_DAY;

    /// Shortest accepted lock (30 days)
    pub const MIN_LOCK_PERIOD: u64 = 30 * SECONDS_PER_DAY;

    /// Longest accepted lock (365 days)
    pub const MAX_LOCK_PERIOD: u64 = 365 * SECONDS_PER_DAY;

    /// Voting weight of staked VSK, in percent
    pub const STAKED_VOTING_MULTIPLIER_PERCENT: u64 = 150;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staking_constants() {
        assert_eq!(config::MIN_LOCK_PERIOD, 2_592_000);
        assert_eq!(config::MAX_LOCK_PERIOD, 31_536_000);
    }
}
