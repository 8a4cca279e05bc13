//! Lock tiers and their reward rates

use serde::{Deserialize, Serialize};
use vesika_core::constants::SECONDS_PER_DAY;

use crate::config::{MAX_LOCK_PERIOD, MIN_LOCK_PERIOD};
use crate::error::{Result, StakingError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum LockTier {
    Month,    // 30 days, 5%
    Quarter,  // 90 days, 7%
    HalfYear, // 180 days, 10%
    Year,     // 365 days, 15%
}

impl LockTier {
    /// Tier for a lock duration: the nearest tier at or below it.
    pub fn from_lock_period(lock_period: u64) -> Result<Self> {
        if lock_period < MIN_LOCK_PERIOD {
            return Err(StakingError::BelowMinimumLock {
                requested: lock_period,
                minimum: MIN_LOCK_PERIOD,
            });
        }
        if lock_period > MAX_LOCK_PERIOD {
            return Err(StakingError::AboveMaximumLock {
                requested: lock_period,
                maximum: MAX_LOCK_PERIOD,
            });
        }
        Ok(match lock_period {
            x if x >= 365 * SECONDS_PER_DAY => LockTier::Year,
            x if x >= 180 * SECONDS_PER_DAY => LockTier::HalfYear,
            x if x >= 90 * SECONDS_PER_DAY => LockTier::Quarter,
            _ => LockTier::Month,
        })
    }

    pub fn lock_period(&self) -> u64 {
        match self {
            LockTier::Month => 30 * SECONDS_PER_DAY,
            LockTier::Quarter => 90 * SECONDS_PER_DAY,
            LockTier::HalfYear => 180 * SECONDS_PER_DAY,
            LockTier::Year => 365 * SECONDS_PER_DAY,
        }
    }

    /// Annual rate in basis points
    pub fn apy_bps(&self) -> u64 {
        match self {
            LockTier::Month => 500,
            LockTier::Quarter => 700,
            LockTier::HalfYear => 1_000,
            LockTier::Year => 1_500,
        }
    }

    pub fn all() -> [LockTier; 4] {
        [
            LockTier::Month,
            LockTier::Quarter,
            LockTier::HalfYear,
            LockTier::Year,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierInfo {
    pub tier: LockTier,
    pub lock_days: u64,
    pub apy_bps: u64,
}

impl TierInfo {
    pub fn for_tier(tier: LockTier) -> Self {
        TierInfo {
            tier,
            lock_days: tier.lock_period() / SECONDS_PER_DAY,
            apy_bps: tier.apy_bps(),
        }
    }

    pub fn all() -> Vec<Self> {
        LockTier::all().into_iter().map(Self::for_tier).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_tiers() {
        for tier in LockTier::all() {
            assert_eq!(LockTier::from_lock_period(tier.lock_period()).unwrap(), tier);
        }
    }

    #[test]
    fn test_between_tiers_rounds_down() {
        let days = |d: u64| d * SECONDS_PER_DAY;
        assert_eq!(LockTier::from_lock_period(days(89)).unwrap(), LockTier::Month);
        assert_eq!(LockTier::from_lock_period(days(120)).unwrap(), LockTier::Quarter);
        assert_eq!(LockTier::from_lock_period(days(364)).unwrap(), LockTier::HalfYear);
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            LockTier::from_lock_period(29 * SECONDS_PER_DAY),
            Err(StakingError::BelowMinimumLock { .. })
        ));
        assert!(matches!(
            LockTier::from_lock_period(366 * SECONDS_PER_DAY),
            Err(StakingError::AboveMaximumLock { .. })
        ));
    }

    #[test]
    fn test_tier_table() {
        let table = TierInfo::all();
        assert_eq!(table.len(), 4);
        assert_eq!(table[0].lock_days, 30);
        assert_eq!(table[0].apy_bps, 500);
        assert_eq!(table[3].lock_days, 365);
        assert_eq!(table[3].apy_bps, 1_500);
    }
}
