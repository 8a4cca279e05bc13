//! Ledger state management
//!
//! Every balance on the platform (native currency, VSK and artist tokens)
//! lives in one [`Ledger`]. Callers hold the ledger and pass it into each
//! operation explicitly; nothing here is global.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::access::{CapabilityChecker, Role};
use crate::error::{LedgerError, Result};
use crate::policy::TransferPolicy;
use crate::supply::SupplyStats;

/// Account or contract address
pub type Address = String;

/// Token identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum TokenId {
    /// Currency paid into the primary sale
    Native,
    /// VesikaCoin, the main platform coin
    Main,
    /// Artist token, keyed by its deployed address
    Artist(Address),
}

impl TokenId {
    pub fn is_artist(&self) -> bool {
        matches!(self, TokenId::Artist(_))
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenId::Native => write!(f, "NATIVE"),
            TokenId::Main => write!(f, "VSK"),
            TokenId::Artist(address) => write!(f, "{}", address),
        }
    }
}

impl From<TokenId> for String {
    fn from(token: TokenId) -> Self {
        token.to_string()
    }
}

impl TryFrom<String> for TokenId {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self> {
        match value.as_str() {
            "" => Err(LedgerError::InvalidInput("empty token id".to_string())),
            "NATIVE" | "native" => Ok(TokenId::Native),
            "VSK" | "vsk" => Ok(TokenId::Main),
            _ => Ok(TokenId::Artist(value)),
        }
    }
}

impl std::str::FromStr for TokenId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        TokenId::try_from(s.to_string())
    }
}

/// One debit/credit pair inside a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferLeg {
    pub token: TokenId,
    pub from: Address,
    pub to: Address,
    pub amount: U256,
}

impl TransferLeg {
    pub fn new(token: TokenId, from: &str, to: &str, amount: U256) -> Self {
        Self {
            token,
            from: from.to_string(),
            to: to.to_string(),
            amount,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TokenBook {
    balances: BTreeMap<Address, U256>,
    supply: SupplyStats,
    max_supply: Option<U256>,
    paused: bool,
}

impl TokenBook {
    fn balance(&self, account: &str) -> U256 {
        self.balances.get(account).copied().unwrap_or_default()
    }
}

/// Multi-token balance store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    tokens: BTreeMap<TokenId, TokenBook>,
}

impl Ledger {
    /// Ledger with the native currency (uncapped) and VSK (capped at `main_max_supply`)
    pub fn new(main_max_supply: U256) -> Self {
        let mut tokens = BTreeMap::new();
        tokens.insert(TokenId::Native, TokenBook::default());
        tokens.insert(
            TokenId::Main,
            TokenBook {
                max_supply: Some(main_max_supply),
                ..TokenBook::default()
            },
        );
        Ledger { tokens }
    }

    /// Register a new token with an optional supply cap
    pub fn register_token(&mut self, token: TokenId, max_supply: Option<U256>) -> Result<()> {
        if self.tokens.contains_key(&token) {
            return Err(LedgerError::InvalidInput(format!(
                "token {} already registered",
                token
            )));
        }
        log::info!("registered token {} (max supply {:?})", token, max_supply);
        self.tokens.insert(
            token,
            TokenBook {
                max_supply,
                ..TokenBook::default()
            },
        );
        Ok(())
    }

    pub fn is_registered(&self, token: &TokenId) -> bool {
        self.tokens.contains_key(token)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &TokenId> {
        self.tokens.keys()
    }

    pub fn balance_of(&self, token: &TokenId, account: &str) -> U256 {
        self.tokens
            .get(token)
            .map(|book| book.balance(account))
            .unwrap_or_default()
    }

    pub fn total_supply(&self, token: &TokenId) -> U256 {
        self.tokens
            .get(token)
            .map(|book| book.supply.circulating_supply)
            .unwrap_or_default()
    }

    pub fn max_supply(&self, token: &TokenId) -> Option<U256> {
        self.tokens.get(token).and_then(|book| book.max_supply)
    }

    pub fn supply_stats(&self, token: &TokenId) -> Option<&SupplyStats> {
        self.tokens.get(token).map(|book| &book.supply)
    }

    pub fn is_paused(&self, token: &TokenId) -> bool {
        self.tokens.get(token).map(|book| book.paused).unwrap_or(false)
    }

    pub fn set_paused(&mut self, token: &TokenId, paused: bool) -> Result<()> {
        let book = self.book_mut(token)?;
        book.paused = paused;
        log::info!("token {} paused={}", token, paused);
        Ok(())
    }

    /// Freeze transfers of `token`; `caller` must be a pauser or admin
    pub fn pause(&mut self, caps: &dyn CapabilityChecker, caller: &str, token: &TokenId) -> Result<()> {
        caps.require_any(caller, &[Role::Admin, Role::Pauser])?;
        self.set_paused(token, true)
    }

    pub fn unpause(&mut self, caps: &dyn CapabilityChecker, caller: &str, token: &TokenId) -> Result<()> {
        caps.require_any(caller, &[Role::Admin, Role::Pauser])?;
        self.set_paused(token, false)
    }

    /// Create `amount` new units for `to`, respecting the token's cap
    pub fn mint(&mut self, token: &TokenId, to: &str, amount: U256) -> Result<()> {
        let book = self.book_mut(token)?;

        let new_supply = book
            .supply
            .circulating_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        if let Some(cap) = book.max_supply {
            if new_supply > cap {
                return Err(LedgerError::MaxSupplyExceeded(token.clone()));
            }
        }

        let balance = book.balance(to);
        book.balances.insert(to.to_string(), balance + amount);
        book.supply.mint(amount);

        log::debug!("minted {} {} to {}", amount, token, to);
        Ok(())
    }

    /// Move `amount` of `token` from `from` to `to`
    pub fn transfer(
        &mut self,
        policy: &dyn TransferPolicy,
        token: &TokenId,
        from: &str,
        to: &str,
        amount: U256,
    ) -> Result<()> {
        self.transfer_batch(policy, &[TransferLeg::new(token.clone(), from, to, amount)])
    }

    /// Apply several transfers atomically.
    ///
    /// Every leg is authorized and every debit is covered by the opening
    /// balances before any balance changes.
    pub fn transfer_batch(&mut self, policy: &dyn TransferPolicy, legs: &[TransferLeg]) -> Result<()> {
        let mut debits: BTreeMap<(&TokenId, &str), U256> = BTreeMap::new();

        for leg in legs {
            let book = self
                .tokens
                .get(&leg.token)
                .ok_or_else(|| LedgerError::TransferFailed(format!("unknown token {}", leg.token)))?;
            if book.paused {
                return Err(LedgerError::TransferFailed(format!("token {} is paused", leg.token)));
            }
            if !policy.authorize(&leg.token, &leg.from, &leg.to) {
                return Err(LedgerError::TransferFailed(format!(
                    "transfer of {} from {} to {} not whitelisted",
                    leg.token, leg.from, leg.to
                )));
            }

            let total = debits.entry((&leg.token, leg.from.as_str())).or_default();
            *total = total.checked_add(leg.amount).ok_or(LedgerError::Overflow)?;

            let available = book.balance(&leg.from);
            if available < *total {
                return Err(LedgerError::InsufficientBalance {
                    token: leg.token.clone(),
                    requested: total.to_string(),
                    available: available.to_string(),
                });
            }
        }

        for leg in legs {
            if leg.from == leg.to || leg.amount.is_zero() {
                continue;
            }
            let book = self.book_mut(&leg.token)?;
            let from_balance = book.balance(&leg.from);
            book.balances.insert(leg.from.clone(), from_balance - leg.amount);
            let to_balance = book.balance(&leg.to);
            book.balances.insert(leg.to.clone(), to_balance + leg.amount);

            log::debug!("transfer {} {} {} -> {}", leg.amount, leg.token, leg.from, leg.to);
        }

        Ok(())
    }

    fn book_mut(&mut self, token: &TokenId) -> Result<&mut TokenBook> {
        self.tokens
            .get_mut(token)
            .ok_or_else(|| LedgerError::InvalidInput(format!("unknown token {}", token)))
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(crate::amount::tokens(crate::constants::MAX_SUPPLY_TOKENS))
    }
}
