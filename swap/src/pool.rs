//! Constant-product liquidity pool

use primitive_types::{U256, U512};
use serde::{Deserialize, Serialize};
use vesika_core::{Address, TokenId};

use crate::error::{Result, SwapError};

/// Fraction of every input that is priced into the trade.
///
/// `997 / 1000` keeps 0.3% of the input in the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    pub numerator: u64,
    pub denominator: u64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            numerator: crate::DEFAULT_FEE_NUMERATOR,
            denominator: crate::DEFAULT_FEE_DENOMINATOR,
        }
    }
}

impl FeeConfig {
    pub fn new(numerator: u64, denominator: u64) -> Result<Self> {
        let fee = Self {
            numerator,
            denominator,
        };
        fee.validate()?;
        Ok(fee)
    }

    pub fn validate(&self) -> Result<()> {
        if self.numerator == 0 || self.denominator == 0 || self.numerator > self.denominator {
            return Err(SwapError::InvalidInput(format!(
                "fee must satisfy 0 < numerator <= denominator, got {}/{}",
                self.numerator, self.denominator
            )));
        }
        Ok(())
    }

    /// Fee charged on input, in basis points
    pub fn fee_bps(&self) -> u64 {
        (self.denominator - self.numerator) * 10_000 / self.denominator
    }

    /// Output for `amount_in` against the given reserves.
    ///
    /// `out = in*n*R_out / (R_in*d + in*n)`, floored. Always strictly less
    /// than `reserve_out`.
    pub fn get_amount_out(&self, amount_in: U256, reserve_in: U256, reserve_out: U256) -> Result<U256> {
        if amount_in.is_zero() {
            return Err(SwapError::InvalidInput("amount in must be positive".to_string()));
        }
        if reserve_in.is_zero() || reserve_out.is_zero() {
            return Err(SwapError::InvalidInput("reserves must be positive".to_string()));
        }

        let overflow = || SwapError::InvalidInput("amount too large".to_string());

        let amount_in_with_fee = amount_in.full_mul(U256::from(self.numerator));
        let numerator = amount_in_with_fee
            .checked_mul(U512::from(reserve_out))
            .ok_or_else(overflow)?;
        let denominator = reserve_in
            .full_mul(U256::from(self.denominator))
            .checked_add(amount_in_with_fee)
            .ok_or_else(overflow)?;

        U256::try_from(numerator / denominator).map_err(|_| overflow())
    }
}

/// Output for `amount_in` at the default 0.3% fee
pub fn get_amount_out(amount_in: U256, reserve_in: U256, reserve_out: U256) -> Result<U256> {
    FeeConfig::default().get_amount_out(amount_in, reserve_in, reserve_out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapDirection {
    MainToArtist,
    ArtistToMain,
}

impl SwapDirection {
    /// Token the caller pays in
    pub fn input_token(&self, artist_token: &TokenId) -> TokenId {
        match self {
            SwapDirection::MainToArtist => TokenId::Main,
            SwapDirection::ArtistToMain => artist_token.clone(),
        }
    }

    /// Token the caller receives
    pub fn output_token(&self, artist_token: &TokenId) -> TokenId {
        match self {
            SwapDirection::MainToArtist => artist_token.clone(),
            SwapDirection::ArtistToMain => TokenId::Main,
        }
    }
}

/// Pool snapshot returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolInfo {
    pub main_token_reserve: U256,
    pub artist_token_reserve: U256,
    pub total_liquidity: U256,
    pub is_active: bool,
}

/// VSK / artist-token pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidityPool {
    pub token: TokenId,
    pub main_reserve: U256,
    pub artist_reserve: U256,
    pub total_liquidity: U256,
    pub is_active: bool,
    pub creator: Address,
    pub created_at: u64,
}

impl LiquidityPool {
    /// Seed a pool with its initial deposit
    pub fn new(
        token: TokenId,
        main_amount: U256,
        artist_amount: U256,
        creator: &str,
        created_at: u64,
    ) -> Result<Self> {
        if main_amount.is_zero() || artist_amount.is_zero() {
            return Err(SwapError::InvalidInput(
                "both deposit amounts must be positive".to_string(),
            ));
        }
        // sqrt of a 512-bit product of two 256-bit values fits in 256 bits
        let total_liquidity = U256::try_from(main_amount.full_mul(artist_amount).integer_sqrt())
            .map_err(|_| SwapError::InvalidInput("liquidity overflow".to_string()))?;

        Ok(Self {
            token,
            main_reserve: main_amount,
            artist_reserve: artist_amount,
            total_liquidity,
            is_active: true,
            creator: creator.to_string(),
            created_at,
        })
    }

    /// (reserve_in, reserve_out) for a trade in `direction`
    pub fn reserves(&self, direction: SwapDirection) -> (U256, U256) {
        match direction {
            SwapDirection::MainToArtist => (self.main_reserve, self.artist_reserve),
            SwapDirection::ArtistToMain => (self.artist_reserve, self.main_reserve),
        }
    }

    pub fn is_live(&self) -> bool {
        self.is_active && !self.main_reserve.is_zero() && !self.artist_reserve.is_zero()
    }

    /// Output for a trade against current reserves, without mutating
    pub fn quote(&self, fee: &FeeConfig, direction: SwapDirection, amount_in: U256) -> Result<U256> {
        if !self.is_live() {
            return Err(SwapError::PoolInactive(self.token.clone()));
        }
        let (reserve_in, reserve_out) = self.reserves(direction);
        fee.get_amount_out(amount_in, reserve_in, reserve_out)
    }

    /// Reserves after a trade, or an error if they would overflow
    pub(crate) fn reserves_after(
        &self,
        direction: SwapDirection,
        amount_in: U256,
        amount_out: U256,
    ) -> Result<(U256, U256)> {
        let (reserve_in, reserve_out) = self.reserves(direction);
        let new_in = reserve_in
            .checked_add(amount_in)
            .ok_or_else(|| SwapError::InvalidInput("reserve overflow".to_string()))?;
        let new_out = reserve_out
            .checked_sub(amount_out)
            .ok_or_else(|| SwapError::InvalidInput("reserve underflow".to_string()))?;
        Ok(match direction {
            SwapDirection::MainToArtist => (new_in, new_out),
            SwapDirection::ArtistToMain => (new_out, new_in),
        })
    }

    /// Reserve product `k`
    pub fn k(&self) -> U512 {
        self.main_reserve.full_mul(self.artist_reserve)
    }

    pub fn info(&self) -> PoolInfo {
        PoolInfo {
            main_token_reserve: self.main_reserve,
            artist_token_reserve: self.artist_reserve,
            total_liquidity: self.total_liquidity,
            is_active: self.is_active,
        }
    }
}
