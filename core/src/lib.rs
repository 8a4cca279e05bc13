//! VesikaArt Core Library
//!
//! Shared ledger primitives for the VesikaArt platform:
//! - Multi-token balance store with supply caps
//! - Role registry used as the capability checker
//! - Whitelist transfer policy for restricted artist tokens
//! - 18-decimal fixed-point amount helpers

pub mod access;
pub mod amount;
pub mod error;
pub mod policy;
pub mod state;
pub mod supply;

pub use access::{CapabilityChecker, Role, Roles};
pub use amount::{format_units, mul_div, parse_units, tokens, unit};
pub use error::{LedgerError, Result};
pub use policy::{AllowAll, TransferPolicy, Whitelist};
pub use primitive_types::U256;
pub use state::{Address, Ledger, TokenId, TransferLeg};
pub use supply::SupplyStats;

/// Platform constants
pub mod constants {
    /// Token decimals (18, ERC20 style)
    pub const DECIMALS: usize = 18;

    /// Seconds in one day
    pub const SECONDS_PER_DAY: u64 = 86_400;

    /// Seconds in one year (365 days)
    pub const SECONDS_PER_YEAR: u64 = 365 * SECONDS_PER_DAY;

    /// VSK hard cap, in whole tokens (100M)
    pub const MAX_SUPPLY_TOKENS: u64 = 100_000_000;

    /// VSK minted to the platform admin at genesis, in whole tokens (20M)
    pub const INITIAL_SUPPLY_TOKENS: u64 = 20_000_000;

    /// VSK minted to an artist on first approval, in whole tokens
    pub const ARTIST_BONUS_TOKENS: u64 = 1_000;

    /// Basis points denominator (100% = 10,000)
    pub const BASIS_POINTS: u64 = 10_000;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_constants() {
        assert_eq!(constants::SECONDS_PER_YEAR, 31_536_000);
        assert_eq!(unit(), U256::exp10(18));
        assert_eq!(tokens(constants::MAX_SUPPLY_TOKENS), U256::exp10(26));
    }
}
