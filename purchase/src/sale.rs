//! Primary sale state and operations

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use vesika_core::{
    Address, CapabilityChecker, Ledger, LedgerError, Role, TokenId, TransferPolicy,
};

use crate::error::{Result, SaleError};
use crate::pricing::PriceCalculator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleStatus {
    Active,
    Inactive,
}

/// Snapshot returned by [`PrimarySale::sale_info`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleInfo {
    pub rate: U256,
    pub min_buy: U256,
    pub max_buy: U256,
    pub sold: U256,
    pub raised: U256,
    pub available: U256,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimarySale {
    custody: Address,
    rate: U256,
    min_buy: U256,
    max_buy: U256,
    sold: U256,
    raised: U256,
    available: U256,
    paused: bool,
}

impl PrimarySale {
    /// Sale with no inventory; it becomes active once inventory is added
    pub fn new(custody: &str, rate: U256, min_buy: U256, max_buy: U256) -> Result<Self> {
        if rate.is_zero() {
            return Err(SaleError::InvalidInput("rate must be positive".to_string()));
        }
        if min_buy > max_buy {
            return Err(SaleError::InvalidInput("min buy exceeds max buy".to_string()));
        }
        Ok(Self {
            custody: custody.to_string(),
            rate,
            min_buy,
            max_buy,
            sold: U256::zero(),
            raised: U256::zero(),
            available: U256::zero(),
            paused: false,
        })
    }

    /// Address receiving purchase payments
    pub fn custody(&self) -> &str {
        &self.custody
    }

    pub fn status(&self) -> SaleStatus {
        if !self.paused && !self.available.is_zero() {
            SaleStatus::Active
        } else {
            SaleStatus::Inactive
        }
    }

    pub fn sale_info(&self) -> SaleInfo {
        SaleInfo {
            rate: self.rate,
            min_buy: self.min_buy,
            max_buy: self.max_buy,
            sold: self.sold,
            raised: self.raised,
            available: self.available,
        }
    }

    pub fn calculate_vsk(&self, value: U256) -> Result<U256> {
        Ok(PriceCalculator::calculate_purchase(value, self.rate)?.vsk_amount)
    }

    /// Buy VSK with `value` native currency, returning the VSK minted
    pub fn buy_vesika(
        &mut self,
        ledger: &mut Ledger,
        policy: &dyn TransferPolicy,
        buyer: &str,
        value: U256,
    ) -> Result<U256> {
        if self.paused {
            return Err(SaleError::SaleInactive);
        }
        if value < self.min_buy || value.is_zero() {
            return Err(SaleError::BelowMinimum {
                value: value.to_string(),
                minimum: self.min_buy.to_string(),
            });
        }
        if value > self.max_buy {
            return Err(SaleError::AboveMaximum {
                value: value.to_string(),
                maximum: self.max_buy.to_string(),
            });
        }

        let vsk = self.calculate_vsk(value)?;
        if vsk.is_zero() {
            return Err(SaleError::InvalidInput("purchase buys no VSK".to_string()));
        }
        if vsk > self.available {
            return Err(SaleError::InsufficientInventory {
                requested: vsk.to_string(),
                available: self.available.to_string(),
            });
        }
        let overflow = || SaleError::InvalidInput("sale totals overflow".to_string());
        let sold = self.sold.checked_add(vsk).ok_or_else(overflow)?;
        let raised = self.raised.checked_add(value).ok_or_else(overflow)?;

        if let Some(cap) = ledger.max_supply(&TokenId::Main) {
            let supply = ledger.total_supply(&TokenId::Main);
            if supply.checked_add(vsk).map_or(true, |total| total > cap) {
                return Err(LedgerError::MaxSupplyExceeded(TokenId::Main).into());
            }
        }

        ledger.transfer(policy, &TokenId::Native, buyer, &self.custody, value)?;
        ledger.mint(&TokenId::Main, buyer, vsk)?;

        self.sold = sold;
        self.raised = raised;
        self.available -= vsk;

        log::info!("{} bought {} VSK for {}", buyer, vsk, value);
        Ok(vsk)
    }

    pub fn update_rate(&mut self, caps: &dyn CapabilityChecker, caller: &str, new_rate: U256) -> Result<()> {
        require_admin(caps, caller)?;
        if new_rate.is_zero() {
            return Err(SaleError::InvalidInput("rate must be positive".to_string()));
        }
        log::info!("sale rate {} -> {}", self.rate, new_rate);
        self.rate = new_rate;
        Ok(())
    }

    pub fn add_inventory(&mut self, caps: &dyn CapabilityChecker, caller: &str, amount: U256) -> Result<()> {
        require_admin(caps, caller)?;
        self.available = self
            .available
            .checked_add(amount)
            .ok_or_else(|| SaleError::InvalidInput("inventory overflow".to_string()))?;
        log::info!("sale inventory +{} (now {})", amount, self.available);
        Ok(())
    }

    pub fn set_inventory(&mut self, caps: &dyn CapabilityChecker, caller: &str, amount: U256) -> Result<()> {
        require_admin(caps, caller)?;
        self.available = amount;
        log::info!("sale inventory set to {}", amount);
        Ok(())
    }

    pub fn update_limits(
        &mut self,
        caps: &dyn CapabilityChecker,
        caller: &str,
        min_buy: U256,
        max_buy: U256,
    ) -> Result<()> {
        require_admin(caps, caller)?;
        if min_buy > max_buy {
            return Err(SaleError::InvalidInput("min buy exceeds max buy".to_string()));
        }
        self.min_buy = min_buy;
        self.max_buy = max_buy;
        log::info!("sale limits set to [{}, {}]", min_buy, max_buy);
        Ok(())
    }

    pub fn pause(&mut self, caps: &dyn CapabilityChecker, caller: &str) -> Result<()> {
        require_admin(caps, caller)?;
        self.paused = true;
        log::warn!("sale paused by {}", caller);
        Ok(())
    }

    pub fn unpause(&mut self, caps: &dyn CapabilityChecker, caller: &str) -> Result<()> {
        require_admin(caps, caller)?;
        self.paused = false;
        log::info!("sale unpaused by {}", caller);
        Ok(())
    }

    /// Move collected native currency out of sale custody
    pub fn withdraw_raised(
        &self,
        ledger: &mut Ledger,
        policy: &dyn TransferPolicy,
        caps: &dyn CapabilityChecker,
        caller: &str,
        to: &str,
        amount: U256,
    ) -> Result<()> {
        require_admin(caps, caller)?;
        ledger.transfer(policy, &TokenId::Native, &self.custody, to, amount)?;
        log::info!("{} withdrew {} raised to {}", caller, amount, to);
        Ok(())
    }
}

fn require_admin(caps: &dyn CapabilityChecker, caller: &str) -> Result<()> {
    caps.require_any(caller, &[Role::Admin])
        .map_err(|_| SaleError::Unauthorized(format!("{} is not a sale admin", caller)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesika_core::{parse_units, tokens, AllowAll, Roles};

    fn sale() -> PrimarySale {
        PrimarySale::new(
            "sale",
            tokens(1_000),
            parse_units("0.01").unwrap(),
            tokens(10),
        )
        .unwrap()
    }

    #[test]
    fn test_new_sale_is_inactive_until_stocked() {
        let roles = Roles::with_admin("owner");
        let mut sale = sale();
        assert_eq!(sale.status(), SaleStatus::Inactive);

        sale.add_inventory(&roles, "owner", tokens(10_000)).unwrap();
        assert_eq!(sale.status(), SaleStatus::Active);

        sale.pause(&roles, "owner").unwrap();
        assert_eq!(sale.status(), SaleStatus::Inactive);
    }

    #[test]
    fn test_admin_only() {
        let roles = Roles::with_admin("owner");
        let mut sale = sale();
        assert!(matches!(
            sale.update_rate(&roles, "user", tokens(5)),
            Err(SaleError::Unauthorized(_))
        ));
        assert!(matches!(
            sale.add_inventory(&roles, "user", tokens(5)),
            Err(SaleError::Unauthorized(_))
        ));
        assert!(sale.update_rate(&roles, "owner", U256::zero()).is_err());
        sale.update_rate(&roles, "owner", tokens(2_000)).unwrap();
        assert_eq!(sale.sale_info().rate, tokens(2_000));
    }

    #[test]
    fn test_buy_below_minimum() {
        let roles = Roles::with_admin("owner");
        let mut ledger = Ledger::default();
        ledger.mint(&TokenId::Native, "buyer", tokens(1)).unwrap();
        let mut sale = sale();
        sale.add_inventory(&roles, "owner", tokens(10_000)).unwrap();

        let err = sale
            .buy_vesika(&mut ledger, &AllowAll, "buyer", parse_units("0.005").unwrap())
            .unwrap_err();
        assert!(matches!(err, SaleError::BelowMinimum { .. }));
        assert_eq!(ledger.balance_of(&TokenId::Native, "buyer"), tokens(1));
    }

    #[test]
    fn test_buy_rounding_to_zero_vsk_is_rejected() {
        let roles = Roles::with_admin("owner");
        let mut ledger = Ledger::default();
        ledger.mint(&TokenId::Native, "buyer", tokens(1)).unwrap();
        // 1e-18 VSK per native unit, no minimum
        let mut sale = PrimarySale::new("sale", U256::one(), U256::zero(), tokens(10)).unwrap();
        sale.add_inventory(&roles, "owner", tokens(10_000)).unwrap();

        let err = sale
            .buy_vesika(&mut ledger, &AllowAll, "buyer", U256::one())
            .unwrap_err();
        assert!(matches!(err, SaleError::InvalidInput(_)));
        assert_eq!(ledger.balance_of(&TokenId::Native, "buyer"), tokens(1));
        assert_eq!(ledger.balance_of(&TokenId::Native, "sale"), U256::zero());
        assert_eq!(sale.sale_info().sold, U256::zero());
    }
}
