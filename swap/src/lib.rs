//! VesikaArt Swap Module
//!
//! Constant-product liquidity pools pairing VSK with each artist token:
//! - Output pricing with a retained fee (0.3% by default)
//! - Pool creation by liquidity managers
//! - Directional swaps with a caller-supplied slippage floor

pub mod error;
pub mod pool;
pub mod router;

pub use error::{Result, SwapError};
pub use pool::{get_amount_out, FeeConfig, LiquidityPool, PoolInfo, SwapDirection};
pub use router::{CreatePoolParams, SwapRequest, SwapRouter, TokenDirectory};

/// Default fee numerator (amount kept after fee, per mille)
pub const DEFAULT_FEE_NUMERATOR: u64 = 997;

/// Default fee denominator
pub const DEFAULT_FEE_DENOMINATOR: u64 = 1000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fee_is_thirty_bps() {
        let fee = FeeConfig::default();
        assert_eq!(fee.numerator, DEFAULT_FEE_NUMERATOR);
        assert_eq!(fee.denominator, DEFAULT_FEE_DENOMINATOR);
        assert_eq!(fee.fee_bps(), 30);
    }
}
