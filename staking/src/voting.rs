//! Governance voting power

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use vesika_core::{Address, Ledger, TokenId};

use crate::config::STAKED_VOTING_MULTIPLIER_PERCENT;
use crate::ledger::StakeLedger;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingPower {
    pub account: Address,
    pub balance: U256,
    pub staked: U256,
    pub power: U256,
}

/// `balance + staked * 1.5`; read-only
pub fn voting_power(ledger: &Ledger, stakes: &StakeLedger, account: &str) -> VotingPower {
    let balance = ledger.balance_of(&TokenId::Main, account);
    let staked = stakes
        .active_stake(account)
        .map(|position| position.amount)
        .unwrap_or_default();
    let weighted = staked.saturating_mul(U256::from(STAKED_VOTING_MULTIPLIER_PERCENT)) / 100;

    VotingPower {
        account: account.to_string(),
        balance,
        staked,
        power: balance.saturating_add(weighted),
    }
}

impl StakeLedger {
    pub fn get_voting_power(&self, ledger: &Ledger, account: &str) -> U256 {
        voting_power(ledger, self, account).power
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesika_core::constants::SECONDS_PER_DAY;
    use vesika_core::{tokens, AllowAll};

    #[test]
    fn test_voting_power_without_stake() {
        let mut ledger = Ledger::default();
        ledger.mint(&TokenId::Main, "addr1", tokens(1_000)).unwrap();
        let stakes = StakeLedger::new("staking");

        assert_eq!(stakes.get_voting_power(&ledger, "addr1"), tokens(1_000));
    }

    #[test]
    fn test_voting_power_with_stake() {
        let mut ledger = Ledger::default();
        ledger.mint(&TokenId::Main, "addr1", tokens(1_000)).unwrap();
        let mut stakes = StakeLedger::new("staking");
        stakes
            .stake(&mut ledger, &AllowAll, "addr1", tokens(100), 30 * SECONDS_PER_DAY, 0)
            .unwrap();

        let power = voting_power(&ledger, &stakes, "addr1");
        assert_eq!(power.balance, tokens(900));
        assert_eq!(power.staked, tokens(100));
        assert_eq!(power.power, tokens(1_050));
    }
}
