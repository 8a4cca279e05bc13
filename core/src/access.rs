//! Role-based capabilities
//!
//! Privileged operations never inspect roles directly; they ask a
//! [`CapabilityChecker`] handed in by the caller. [`Roles`] is the in-memory
//! registry used by the platform and by tests.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::{LedgerError, Result};
use crate::state::Address;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Platform administrator; may grant and revoke every role
    Admin,
    /// May mint VSK
    Minter,
    /// May pause token transfers
    Pauser,
    /// May approve artists and token requests
    Approver,
    /// May create liquidity pools
    LiquidityManager,
    /// May edit token whitelists
    WhitelistManager,
}

impl Role {
    pub fn all() -> [Role; 6] {
        [
            Role::Admin,
            Role::Minter,
            Role::Pauser,
            Role::Approver,
            Role::LiquidityManager,
            Role::WhitelistManager,
        ]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "admin",
            Role::Minter => "minter",
            Role::Pauser => "pauser",
            Role::Approver => "approver",
            Role::LiquidityManager => "liquidity-manager",
            Role::WhitelistManager => "whitelist-manager",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for Role {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        Role::all()
            .into_iter()
            .find(|role| role.to_string() == s.to_ascii_lowercase())
            .ok_or_else(|| LedgerError::InvalidInput(format!("unknown role: {}", s)))
    }
}

/// Answers whether an account holds a role
pub trait CapabilityChecker {
    fn has_capability(&self, account: &str, role: Role) -> bool;

    /// `Ok(())` if `account` holds any of `roles`, `Unauthorized` otherwise
    fn require_any(&self, account: &str, roles: &[Role]) -> Result<()> {
        if roles.iter().any(|role| self.has_capability(account, *role)) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized(format!(
                "{} lacks any of {:?}",
                account, roles
            )))
        }
    }
}

/// In-memory role registry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roles {
    members: BTreeMap<Role, BTreeSet<Address>>,
}

impl Roles {
    /// Registry with `admin` holding every role
    pub fn with_admin(admin: &str) -> Self {
        let mut roles = Roles::default();
        for role in Role::all() {
            roles
                .members
                .entry(role)
                .or_default()
                .insert(admin.to_string());
        }
        roles
    }

    /// Grant `role` to `account`; `granter` must be an admin
    pub fn grant(&mut self, granter: &str, role: Role, account: &str) -> Result<()> {
        self.require_any(granter, &[Role::Admin])?;
        self.members.entry(role).or_default().insert(account.to_string());
        log::info!("{} granted {} to {}", granter, role, account);
        Ok(())
    }

    /// Revoke `role` from `account`; `revoker` must be an admin
    pub fn revoke(&mut self, revoker: &str, role: Role, account: &str) -> Result<()> {
        self.require_any(revoker, &[Role::Admin])?;
        if let Some(members) = self.members.get_mut(&role) {
            members.remove(account);
        }
        log::info!("{} revoked {} from {}", revoker, role, account);
        Ok(())
    }
}

impl CapabilityChecker for Roles {
    fn has_capability(&self, account: &str, role: Role) -> bool {
        self.members
            .get(&role)
            .map(|members| members.contains(account))
            .unwrap_or(false)
    }
}
