//! Stake positions and reward accrual
//!
//! Principal moves into the staking custody address on `stake` and back on
//! `unstake`. Rewards are never stored: they are derived from the position
//! and the time since the last claim, and minted as new VSK when claimed.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vesika_core::constants::{BASIS_POINTS, SECONDS_PER_YEAR};
use vesika_core::{mul_div, Address, Ledger, TokenId, TransferPolicy};

use crate::error::{Result, StakingError};
use crate::tier::LockTier;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakePosition {
    pub amount: U256,
    /// Stake start; lock expiry is measured from here
    pub timestamp: u64,
    pub lock_period: u64,
    /// Reward accrual baseline
    pub last_claim: u64,
    pub is_active: bool,
}

impl StakePosition {
    pub fn unlock_time(&self) -> u64 {
        self.timestamp.saturating_add(self.lock_period)
    }

    pub fn tier(&self) -> Result<LockTier> {
        LockTier::from_lock_period(self.lock_period)
    }

    /// `amount * apy * elapsed / (10_000 * year)`, floored
    pub fn reward_at(&self, now: u64) -> Result<U256> {
        if !self.is_active {
            return Ok(U256::zero());
        }
        let elapsed = now.saturating_sub(self.last_claim);
        let rate_time = U256::from(self.tier()?.apy_bps()) * U256::from(elapsed);
        let denominator = U256::from(BASIS_POINTS) * U256::from(SECONDS_PER_YEAR);

        mul_div(self.amount, rate_time, denominator)
            .ok_or_else(|| StakingError::InvalidInput("reward overflow".to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeLedger {
    custody: Address,
    positions: BTreeMap<Address, StakePosition>,
    total_staked: U256,
}

impl StakeLedger {
    pub fn new(custody: &str) -> Self {
        Self {
            custody: custody.to_string(),
            positions: BTreeMap::new(),
            total_staked: U256::zero(),
        }
    }

    /// Address holding staked principal
    pub fn custody(&self) -> &str {
        &self.custody
    }

    pub fn total_staked(&self) -> U256 {
        self.total_staked
    }

    pub fn get_stake(&self, account: &str) -> Option<&StakePosition> {
        self.positions.get(account)
    }

    pub fn active_stake(&self, account: &str) -> Option<&StakePosition> {
        self.positions.get(account).filter(|p| p.is_active)
    }

    /// Lock `amount` VSK from `account` for `lock_period` seconds
    pub fn stake(
        &mut self,
        ledger: &mut Ledger,
        policy: &dyn TransferPolicy,
        account: &str,
        amount: U256,
        lock_period: u64,
        now: u64,
    ) -> Result<()> {
        if self.active_stake(account).is_some() {
            return Err(StakingError::AlreadyStaking(account.to_string()));
        }
        LockTier::from_lock_period(lock_period)?;
        if amount.is_zero() {
            return Err(StakingError::InvalidInput(
                "stake amount must be positive".to_string(),
            ));
        }
        let available = ledger.balance_of(&TokenId::Main, account);
        if available < amount {
            return Err(StakingError::InsufficientBalance {
                requested: amount.to_string(),
                available: available.to_string(),
            });
        }
        let total_staked = self
            .total_staked
            .checked_add(amount)
            .ok_or_else(|| StakingError::InvalidInput("stake overflow".to_string()))?;

        ledger.transfer(policy, &TokenId::Main, account, &self.custody, amount)?;

        self.positions.insert(
            account.to_string(),
            StakePosition {
                amount,
                timestamp: now,
                lock_period,
                last_claim: now,
                is_active: true,
            },
        );
        self.total_staked = total_staked;

        log::info!("{} staked {} for {}s", account, amount, lock_period);
        Ok(())
    }

    /// Reward accrued since the last claim; zero without an active stake
    pub fn calculate_reward(&self, account: &str, now: u64) -> Result<U256> {
        match self.active_stake(account) {
            Some(position) => position.reward_at(now),
            None => Ok(U256::zero()),
        }
    }

    /// Mint the accrued reward to `account` and restart accrual at `now`
    pub fn claim_rewards(&mut self, ledger: &mut Ledger, account: &str, now: u64) -> Result<U256> {
        let position = self
            .active_stake(account)
            .ok_or_else(|| StakingError::NoActiveStake(account.to_string()))?;
        let reward = position.reward_at(now)?;

        if !reward.is_zero() {
            ledger.mint(&TokenId::Main, account, reward)?;
        }
        if let Some(position) = self.positions.get_mut(account) {
            position.last_claim = now.max(position.last_claim);
        }

        log::info!("{} claimed {} reward", account, reward);
        Ok(reward)
    }

    /// Return principal once the lock has expired. Unclaimed reward is forfeited.
    pub fn unstake(
        &mut self,
        ledger: &mut Ledger,
        policy: &dyn TransferPolicy,
        account: &str,
        now: u64,
    ) -> Result<U256> {
        let position = self
            .active_stake(account)
            .ok_or_else(|| StakingError::NoActiveStake(account.to_string()))?;
        let unlock_at = position.unlock_time();
        if now < unlock_at {
            return Err(StakingError::LockNotExpired { unlock_at, now });
        }
        let amount = position.amount;

        ledger.transfer(policy, &TokenId::Main, &self.custody, account, amount)?;

        if let Some(position) = self.positions.get_mut(account) {
            position.is_active = false;
        }
        self.total_staked = self.total_staked.saturating_sub(amount);

        log::info!("{} unstaked {}", account, amount);
        Ok(amount)
    }
}
