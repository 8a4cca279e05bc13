//! Supply tracking per token

use primitive_types::U256;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyStats {
    pub total_minted: U256,
    pub circulating_supply: U256,
}

impl SupplyStats {
    pub fn mint(&mut self, amount: U256) {
        self.total_minted += amount;
        self.circulating_supply += amount;
    }
}
