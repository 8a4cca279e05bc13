//! Transfer authorization policies

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::state::{Address, TokenId};

/// Consulted by the ledger before any debit/credit
pub trait TransferPolicy {
    fn authorize(&self, token: &TokenId, from: &str, to: &str) -> bool;
}

/// Policy that authorizes every transfer
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl TransferPolicy for AllowAll {
    fn authorize(&self, _token: &TokenId, _from: &str, _to: &str) -> bool {
        true
    }
}

/// Per-token whitelist.
///
/// Tokens that were never restricted transfer freely. A restricted token moves
/// only when the sender or the receiver is whitelisted for it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Whitelist {
    restricted: BTreeMap<TokenId, BTreeSet<Address>>,
}

impl Whitelist {
    pub fn restrict(&mut self, token: &TokenId) {
        self.restricted.entry(token.clone()).or_default();
    }

    pub fn is_restricted(&self, token: &TokenId) -> bool {
        self.restricted.contains_key(token)
    }

    /// Add or remove `account`; restricts the token if it was not already
    pub fn update(&mut self, token: &TokenId, account: &str, allowed: bool) {
        let members = self.restricted.entry(token.clone()).or_default();
        if allowed {
            members.insert(account.to_string());
        } else {
            members.remove(account);
        }
        log::info!("whitelist {} {} -> {}", token, account, allowed);
    }

    pub fn is_whitelisted(&self, token: &TokenId, account: &str) -> bool {
        self.restricted
            .get(token)
            .map(|members| members.contains(account))
            .unwrap_or(false)
    }
}

impl TransferPolicy for Whitelist {
    fn authorize(&self, token: &TokenId, from: &str, to: &str) -> bool {
        match self.restricted.get(token) {
            None => true,
            Some(members) => members.contains(from) || members.contains(to),
        }
    }
}
