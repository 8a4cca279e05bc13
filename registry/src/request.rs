//! Token requests

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use vesika_core::Address;

use crate::error::{RegistryError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Waiting for an approver
    Pending,
    /// Cleared for deployment
    Approved,
    /// Turned down
    Rejected,
}

/// Parameters for requesting a new artist token
#[derive(Debug, Clone)]
pub struct TokenRequestParams {
    pub name: String,
    pub symbol: String,
    pub max_supply: U256,
    pub initial_swap_rate: U256,
    pub description: String,
    pub metadata: String,
}

impl TokenRequestParams {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(RegistryError::InvalidInput("Name cannot be empty".to_string()));
        }
        if self.symbol.trim().is_empty() {
            return Err(RegistryError::InvalidInput("Symbol cannot be empty".to_string()));
        }
        if self.max_supply.is_zero() {
            return Err(RegistryError::InvalidInput(
                "Max supply must be greater than 0".to_string(),
            ));
        }
        if self.initial_swap_rate.is_zero() {
            return Err(RegistryError::InvalidInput(
                "Swap rate must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRequest {
    pub id: u64,
    pub artist: Address,
    pub name: String,
    pub symbol: String,
    pub max_supply: U256,
    pub initial_swap_rate: U256,
    pub description: String,
    pub metadata: String,
    pub status: RequestStatus,
    pub deployed: bool,
    pub token_address: Option<Address>,
    pub created_at: u64,
}

impl TokenRequest {
    pub fn new(id: u64, artist: &str, params: TokenRequestParams, created_at: u64) -> Self {
        Self {
            id,
            artist: artist.to_string(),
            name: params.name,
            symbol: params.symbol,
            max_supply: params.max_supply,
            initial_swap_rate: params.initial_swap_rate,
            description: params.description,
            metadata: params.metadata,
            status: RequestStatus::Pending,
            deployed: false,
            token_address: None,
            created_at,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == RequestStatus::Approved
    }
}
