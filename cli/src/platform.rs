//! Persisted platform state
//!
//! The CLI keeps every component in one JSON document. A command loads it,
//! applies a single operation and saves it back only when that operation
//! succeeded.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use vesika_core::constants::INITIAL_SUPPLY_TOKENS;
use vesika_core::{tokens, Ledger, Roles, TokenId, Whitelist};
use vesika_purchase::PrimarySale;
use vesika_registry::ArtistRegistry;
use vesika_staking::StakeLedger;
use vesika_swap::SwapRouter;

use crate::config::Config;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub admin: String,
    pub created_at: u64,
    pub ledger: Ledger,
    pub roles: Roles,
    pub whitelist: Whitelist,
    pub router: SwapRouter,
    pub stakes: StakeLedger,
    pub sale: PrimarySale,
    pub registry: ArtistRegistry,
}

impl Platform {
    /// Fresh platform: the admin holds every role and the genesis VSK allocation
    pub fn genesis(config: &Config, now: u64) -> Result<Self> {
        let admin = config.platform.admin.as_str();
        let roles = Roles::with_admin(admin);

        let mut ledger = Ledger::default();
        ledger.mint(&TokenId::Main, admin, tokens(INITIAL_SUPPLY_TOKENS))?;

        let router = SwapRouter::new(&config.swap.address, config.swap.fee()?)?;

        let amounts = config.sale.amounts()?;
        let mut sale = PrimarySale::new(
            &config.sale.address,
            amounts.rate,
            amounts.min_buy,
            amounts.max_buy,
        )?;
        sale.set_inventory(&roles, admin, amounts.initial_inventory)?;

        log::info!("genesis: {} VSK to {}", INITIAL_SUPPLY_TOKENS, admin);
        Ok(Self {
            admin: admin.to_string(),
            created_at: now,
            ledger,
            roles,
            whitelist: Whitelist::default(),
            router,
            stakes: StakeLedger::new(&config.staking.custody),
            sale,
            registry: ArtistRegistry::new(&config.registry.address),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("reading state {} (run `vesika init` first)", path.display())
        })?;
        serde_json::from_str(&contents).with_context(|| format!("parsing state {}", path.display()))
    }

    /// Write to a sibling temp file, then rename over `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
        log::debug!("state saved to {}", path.display());
        Ok(())
    }
}
