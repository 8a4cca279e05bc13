//! `vesika.toml` configuration
//!
//! Every section is optional; a missing file yields the defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use vesika_core::{parse_units, U256};
use vesika_swap::FeeConfig;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub platform: PlatformConfig,
    #[serde(default)]
    pub swap: SwapConfig,
    #[serde(default)]
    pub sale: SaleConfig,
    #[serde(default)]
    pub staking: StakingConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Receives every role and the genesis VSK allocation
    pub admin: String,
    pub state_file: String,
    pub log_level: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            admin: "admin".to_string(),
            state_file: "vesika-state.json".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SwapConfig {
    pub fee_numerator: u64,
    pub fee_denominator: u64,
    pub address: String,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            fee_numerator: vesika_swap::DEFAULT_FEE_NUMERATOR,
            fee_denominator: vesika_swap::DEFAULT_FEE_DENOMINATOR,
            address: "vesika-swap".to_string(),
        }
    }
}

impl SwapConfig {
    pub fn fee(&self) -> Result<FeeConfig> {
        FeeConfig::new(self.fee_numerator, self.fee_denominator).context("invalid [swap] fee")
    }
}

/// Amounts are decimal strings in whole-token units
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SaleConfig {
    /// VSK per native unit
    pub rate: String,
    pub min_buy: String,
    pub max_buy: String,
    pub initial_inventory: String,
    pub address: String,
}

impl Default for SaleConfig {
    fn default() -> Self {
        Self {
            rate: "1000".to_string(),
            min_buy: "0.01".to_string(),
            max_buy: "10".to_string(),
            initial_inventory: "1000000".to_string(),
            address: "vesika-sale".to_string(),
        }
    }
}

/// Parsed `[sale]` amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleAmounts {
    pub rate: U256,
    pub min_buy: U256,
    pub max_buy: U256,
    pub initial_inventory: U256,
}

impl SaleConfig {
    pub fn amounts(&self) -> Result<SaleAmounts> {
        let field = |name: &str, value: &str| {
            parse_units(value).with_context(|| format!("invalid [sale] {}: {:?}", name, value))
        };
        Ok(SaleAmounts {
            rate: field("rate", &self.rate)?,
            min_buy: field("min_buy", &self.min_buy)?,
            max_buy: field("max_buy", &self.max_buy)?,
            initial_inventory: field("initial_inventory", &self.initial_inventory)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StakingConfig {
    pub custody: String,
}

impl Default for StakingConfig {
    fn default() -> Self {
        Self {
            custody: "vesika-staking".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub address: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            address: "vesika-factory".to_string(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        log::debug!("config {} not found, using defaults", path.display());
        return Ok(Config::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: Config =
        toml::from_str(&contents).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}
