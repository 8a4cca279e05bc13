//! Swap router: pool registry and directional swaps
//!
//! The router owns one custody address on the ledger holding the reserves of
//! every pool. Each operation validates everything, moves tokens in one
//! ledger batch, and only then updates pool reserves, so a failed call leaves
//! both the ledger and the pools untouched.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vesika_core::{
    Address, CapabilityChecker, Ledger, Role, TokenId, TransferLeg, TransferPolicy,
};

use crate::error::{Result, SwapError};
use crate::pool::{FeeConfig, LiquidityPool, PoolInfo, SwapDirection};

/// Knows which artist tokens may be paired with VSK
pub trait TokenDirectory {
    fn is_listed(&self, token: &TokenId) -> bool;

    /// Artist who issued `token`
    fn artist_of(&self, _token: &TokenId) -> Option<Address> {
        None
    }
}

/// Parameters for seeding a new pool
#[derive(Debug, Clone)]
pub struct CreatePoolParams {
    pub token: TokenId,
    pub main_amount: U256,
    pub artist_amount: U256,
    pub now: u64,
}

/// A single swap order
#[derive(Debug, Clone)]
pub struct SwapRequest {
    pub token: TokenId,
    pub direction: SwapDirection,
    pub amount_in: U256,
    pub min_amount_out: U256,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapRouter {
    address: Address,
    fee: FeeConfig,
    pools: BTreeMap<TokenId, LiquidityPool>,
}

impl SwapRouter {
    pub fn new(address: &str, fee: FeeConfig) -> Result<Self> {
        fee.validate()?;
        if address.is_empty() {
            return Err(SwapError::AddressZero("router address".to_string()));
        }
        Ok(Self {
            address: address.to_string(),
            fee,
            pools: BTreeMap::new(),
        })
    }

    /// Custody address holding all pool reserves
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn fee(&self) -> &FeeConfig {
        &self.fee
    }

    pub fn pool(&self, token: &TokenId) -> Option<&LiquidityPool> {
        self.pools.get(token)
    }

    pub fn pools(&self) -> impl Iterator<Item = &LiquidityPool> {
        self.pools.values()
    }

    /// Create (or re-seed an inactive) pool for an artist token.
    ///
    /// Open to admins, liquidity managers and the token's own artist.
    pub fn create_pool(
        &mut self,
        ledger: &mut Ledger,
        policy: &dyn TransferPolicy,
        caps: &dyn CapabilityChecker,
        directory: &dyn TokenDirectory,
        caller: &str,
        params: CreatePoolParams,
    ) -> Result<TokenId> {
        let token = params.token;
        if directory.artist_of(&token).as_deref() != Some(caller) {
            caps.require_any(caller, &[Role::Admin, Role::LiquidityManager])
                .map_err(|_| {
                    SwapError::Unauthorized(format!("{} cannot manage liquidity", caller))
                })?;
        }

        if !token.is_artist() || !directory.is_listed(&token) {
            return Err(SwapError::AddressZero(token.to_string()));
        }
        if let Some(existing) = self.pools.get(&token) {
            if existing.is_live() {
                return Err(SwapError::PoolExists(token));
            }
        }

        let pool = LiquidityPool::new(
            token.clone(),
            params.main_amount,
            params.artist_amount,
            caller,
            params.now,
        )?;

        ledger.transfer_batch(
            policy,
            &[
                TransferLeg::new(TokenId::Main, caller, &self.address, params.main_amount),
                TransferLeg::new(token.clone(), caller, &self.address, params.artist_amount),
            ],
        )?;

        log::info!(
            "pool created for {} by {}: main={} artist={}",
            token,
            caller,
            pool.main_reserve,
            pool.artist_reserve
        );
        self.pools.insert(token.clone(), pool);
        Ok(token)
    }

    pub fn get_pool_info(&self, token: &TokenId) -> Result<PoolInfo> {
        self.pools
            .get(token)
            .map(LiquidityPool::info)
            .ok_or_else(|| SwapError::AddressZero(token.to_string()))
    }

    /// Constant-product output under this router's fee
    pub fn get_amount_out(&self, amount_in: U256, reserve_in: U256, reserve_out: U256) -> Result<U256> {
        self.fee.get_amount_out(amount_in, reserve_in, reserve_out)
    }

    /// Output a swap would produce right now
    pub fn quote(&self, token: &TokenId, direction: SwapDirection, amount_in: U256) -> Result<U256> {
        let pool = self
            .pools
            .get(token)
            .ok_or_else(|| SwapError::AddressZero(token.to_string()))?;
        pool.quote(&self.fee, direction, amount_in)
    }

    /// Execute a swap for `caller`, returning the amount paid out
    pub fn swap(
        &mut self,
        ledger: &mut Ledger,
        policy: &dyn TransferPolicy,
        caller: &str,
        request: SwapRequest,
    ) -> Result<U256> {
        let SwapRequest {
            token,
            direction,
            amount_in,
            min_amount_out,
        } = request;

        let pool = self
            .pools
            .get(&token)
            .ok_or_else(|| SwapError::AddressZero(token.to_string()))?;

        let amount_out = pool.quote(&self.fee, direction, amount_in)?;
        if amount_out.is_zero() {
            return Err(SwapError::InvalidInput("swap output rounds to zero".to_string()));
        }
        if amount_out < min_amount_out {
            return Err(SwapError::SlippageExceeded {
                minimum: min_amount_out.to_string(),
                actual: amount_out.to_string(),
            });
        }
        let (main_reserve, artist_reserve) = pool.reserves_after(direction, amount_in, amount_out)?;

        ledger.transfer_batch(
            policy,
            &[
                TransferLeg::new(direction.input_token(&token), caller, &self.address, amount_in),
                TransferLeg::new(direction.output_token(&token), &self.address, caller, amount_out),
            ],
        )?;

        if let Some(pool) = self.pools.get_mut(&token) {
            pool.main_reserve = main_reserve;
            pool.artist_reserve = artist_reserve;
        }

        log::info!(
            "swap {:?} on {} by {}: in={} out={}",
            direction,
            token,
            caller,
            amount_in,
            amount_out
        );
        Ok(amount_out)
    }

    pub fn swap_main_to_artist(
        &mut self,
        ledger: &mut Ledger,
        policy: &dyn TransferPolicy,
        caller: &str,
        token: &TokenId,
        main_amount: U256,
        min_artist_out: U256,
    ) -> Result<U256> {
        self.swap(
            ledger,
            policy,
            caller,
            SwapRequest {
                token: token.clone(),
                direction: SwapDirection::MainToArtist,
                amount_in: main_amount,
                min_amount_out: min_artist_out,
            },
        )
    }

    pub fn swap_artist_to_main(
        &mut self,
        ledger: &mut Ledger,
        policy: &dyn TransferPolicy,
        caller: &str,
        token: &TokenId,
        artist_amount: U256,
        min_main_out: U256,
    ) -> Result<U256> {
        self.swap(
            ledger,
            policy,
            caller,
            SwapRequest {
                token: token.clone(),
                direction: SwapDirection::ArtistToMain,
                amount_in: artist_amount,
                min_amount_out: min_main_out,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesika_core::{tokens, AllowAll, Roles};

    struct Listed;

    impl TokenDirectory for Listed {
        fn is_listed(&self, _token: &TokenId) -> bool {
            true
        }
    }

    struct IssuedBy(&'static str);

    impl TokenDirectory for IssuedBy {
        fn is_listed(&self, _token: &TokenId) -> bool {
            true
        }

        fn artist_of(&self, _token: &TokenId) -> Option<Address> {
            Some(self.0.to_string())
        }
    }

    fn artist() -> TokenId {
        TokenId::Artist("0xart".to_string())
    }

    fn setup() -> (SwapRouter, Ledger, Roles) {
        let mut ledger = Ledger::default();
        ledger.register_token(artist(), None).unwrap();
        ledger.mint(&TokenId::Main, "owner", tokens(10_000)).unwrap();
        ledger.mint(&artist(), "owner", tokens(100_000)).unwrap();
        let router = SwapRouter::new("swap", FeeConfig::default()).unwrap();
        (router, ledger, Roles::with_admin("owner"))
    }

    fn params(main: u64, art: u64) -> CreatePoolParams {
        CreatePoolParams {
            token: artist(),
            main_amount: tokens(main),
            artist_amount: tokens(art),
            now: 1_000,
        }
    }

    #[test]
    fn test_create_pool_moves_deposit_into_custody() {
        let (mut router, mut ledger, roles) = setup();

        router
            .create_pool(&mut ledger, &AllowAll, &roles, &Listed, "owner", params(1_000, 10_000))
            .unwrap();

        assert_eq!(ledger.balance_of(&TokenId::Main, "swap"), tokens(1_000));
        assert_eq!(ledger.balance_of(&artist(), "swap"), tokens(10_000));
        let info = router.get_pool_info(&artist()).unwrap();
        assert!(info.is_active);
        assert_eq!(info.main_token_reserve, tokens(1_000));
    }

    #[test]
    fn test_create_pool_requires_role() {
        let (mut router, mut ledger, roles) = setup();

        let err = router
            .create_pool(&mut ledger, &AllowAll, &roles, &Listed, "stranger", params(1, 1))
            .unwrap_err();
        assert!(matches!(err, SwapError::Unauthorized(_)));
    }

    #[test]
    fn test_token_artist_creates_pool_without_role() {
        let (mut router, mut ledger, roles) = setup();
        ledger.mint(&TokenId::Main, "painter", tokens(100)).unwrap();
        ledger.transfer(&AllowAll, &artist(), "owner", "painter", tokens(1_000)).unwrap();

        router
            .create_pool(&mut ledger, &AllowAll, &roles, &IssuedBy("painter"), "painter", params(100, 1_000))
            .unwrap();
        assert_eq!(ledger.balance_of(&artist(), "painter"), U256::zero());
        assert!(router.get_pool_info(&artist()).unwrap().is_active);

        // another artist's token grants nothing
        let err = router
            .create_pool(&mut ledger, &AllowAll, &roles, &IssuedBy("painter"), "sculptor", params(1, 1))
            .unwrap_err();
        assert!(matches!(err, SwapError::Unauthorized(_)));
    }

    #[test]
    fn test_create_pool_twice_fails() {
        let (mut router, mut ledger, roles) = setup();
        router
            .create_pool(&mut ledger, &AllowAll, &roles, &Listed, "owner", params(10, 10))
            .unwrap();

        let err = router
            .create_pool(&mut ledger, &AllowAll, &roles, &Listed, "owner", params(10, 10))
            .unwrap_err();
        assert_eq!(err, SwapError::PoolExists(artist()));
    }

    #[test]
    fn test_unknown_pool_is_address_zero() {
        let (mut router, mut ledger, _) = setup();
        let err = router
            .swap_main_to_artist(&mut ledger, &AllowAll, "owner", &artist(), tokens(1), U256::zero())
            .unwrap_err();
        assert!(matches!(err, SwapError::AddressZero(_)));
        assert!(router.get_pool_info(&artist()).is_err());
    }

    #[test]
    fn test_slippage_floor_leaves_state_unchanged() {
        let (mut router, mut ledger, roles) = setup();
        router
            .create_pool(&mut ledger, &AllowAll, &roles, &Listed, "owner", params(1_000, 10_000))
            .unwrap();
        let before = ledger.balance_of(&TokenId::Main, "owner");

        let err = router
            .swap_main_to_artist(&mut ledger, &AllowAll, "owner", &artist(), tokens(100), tokens(907))
            .unwrap_err();
        assert!(matches!(err, SwapError::SlippageExceeded { .. }));
        assert_eq!(ledger.balance_of(&TokenId::Main, "owner"), before);
        assert_eq!(router.get_pool_info(&artist()).unwrap().main_token_reserve, tokens(1_000));
    }

    #[test]
    fn test_dust_swap_with_zero_output_is_rejected() {
        let (mut router, mut ledger, roles) = setup();
        router
            .create_pool(&mut ledger, &AllowAll, &roles, &Listed, "owner", params(1_000, 10_000))
            .unwrap();
        let before = ledger.balance_of(&artist(), "owner");

        // 1 wei of artist token against a 1:10 pool quotes 0 VSK
        let err = router
            .swap_artist_to_main(&mut ledger, &AllowAll, "owner", &artist(), U256::one(), U256::zero())
            .unwrap_err();
        assert!(matches!(err, SwapError::InvalidInput(_)));
        assert_eq!(ledger.balance_of(&artist(), "owner"), before);
        let info = router.get_pool_info(&artist()).unwrap();
        assert_eq!(info.artist_token_reserve, tokens(10_000));
    }
}
