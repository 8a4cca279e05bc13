//! Artist profiles

use serde::{Deserialize, Serialize};
use vesika_core::Address;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub address: Address,
    /// Off-chain profile pointer (e.g. `ipfs://...`)
    pub profile_metadata: String,
    pub is_registered: bool,
    pub is_approved: bool,
    pub is_rejected: bool,
    /// Set once the approval bonus has been paid
    pub bonus_paid: bool,
    pub token_count: u64,
    pub registered_at: u64,
}

impl Artist {
    pub fn new(address: &str, profile_metadata: String, registered_at: u64) -> Self {
        Self {
            address: address.to_string(),
            profile_metadata,
            is_registered: true,
            is_approved: false,
            is_rejected: false,
            bonus_paid: false,
            token_count: 0,
            registered_at,
        }
    }

    /// Registered and waiting for a decision
    pub fn is_pending(&self) -> bool {
        self.is_registered && !self.is_approved && !self.is_rejected
    }
}
