//! Artist registry and token factory

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use vesika_core::constants::ARTIST_BONUS_TOKENS;
use vesika_core::{tokens, Address, CapabilityChecker, Ledger, Role, TokenId, Whitelist};
use vesika_swap::TokenDirectory;

use crate::artist::Artist;
use crate::error::{RegistryError, Result};
use crate::request::{RequestStatus, TokenRequest, TokenRequestParams};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRegistry {
    address: Address,
    artists: BTreeMap<Address, Artist>,
    requests: BTreeMap<u64, TokenRequest>,
    request_counter: u64,
    deployed_tokens: Vec<Address>,
    token_artists: BTreeMap<Address, Address>,
    paused: bool,
}

impl ArtistRegistry {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            artists: BTreeMap::new(),
            requests: BTreeMap::new(),
            request_counter: 0,
            deployed_tokens: Vec::new(),
            token_artists: BTreeMap::new(),
            paused: false,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn request_counter(&self) -> u64 {
        self.request_counter
    }

    // ---- artists ----

    pub fn register_artist(&mut self, caller: &str, profile_metadata: &str, now: u64) -> Result<()> {
        if self.paused {
            return Err(RegistryError::Paused);
        }
        if self.artists.contains_key(caller) {
            return Err(RegistryError::AlreadyRegistered(caller.to_string()));
        }
        self.artists.insert(
            caller.to_string(),
            Artist::new(caller, profile_metadata.to_string(), now),
        );
        log::info!("artist registered: {}", caller);
        Ok(())
    }

    /// Approve a registered artist, minting the welcome bonus on first approval
    pub fn approve_artist(
        &mut self,
        ledger: &mut Ledger,
        caps: &dyn CapabilityChecker,
        approver: &str,
        artist: &str,
    ) -> Result<()> {
        require_approver(caps, approver)?;
        let profile = self
            .artists
            .get(artist)
            .ok_or_else(|| RegistryError::NotRegistered(artist.to_string()))?;

        let pay_bonus = !profile.bonus_paid;
        if pay_bonus {
            ledger.mint(&TokenId::Main, artist, tokens(ARTIST_BONUS_TOKENS))?;
        }

        if let Some(profile) = self.artists.get_mut(artist) {
            profile.is_approved = true;
            profile.is_rejected = false;
            profile.bonus_paid = true;
        }
        log::info!("artist approved by {}: {} (bonus paid: {})", approver, artist, pay_bonus);
        Ok(())
    }

    pub fn reject_artist(&mut self, caps: &dyn CapabilityChecker, approver: &str, artist: &str) -> Result<()> {
        require_approver(caps, approver)?;
        let profile = self
            .artists
            .get_mut(artist)
            .ok_or_else(|| RegistryError::NotRegistered(artist.to_string()))?;
        profile.is_approved = false;
        profile.is_rejected = true;
        log::info!("artist rejected by {}: {}", approver, artist);
        Ok(())
    }

    pub fn get_artist_info(&self, artist: &str) -> Option<&Artist> {
        self.artists.get(artist)
    }

    pub fn pending_artists(&self) -> Vec<&Artist> {
        self.artists.values().filter(|a| a.is_pending()).collect()
    }

    pub fn approved_artist_count(&self) -> usize {
        self.artists.values().filter(|a| a.is_approved).count()
    }

    // ---- token requests ----

    pub fn request_token(&mut self, caller: &str, params: TokenRequestParams, now: u64) -> Result<u64> {
        if self.paused {
            return Err(RegistryError::Paused);
        }
        match self.artists.get(caller) {
            Some(artist) if artist.is_approved => {}
            Some(_) => return Err(RegistryError::NotApproved(caller.to_string())),
            None => return Err(RegistryError::NotRegistered(caller.to_string())),
        }
        params.validate()?;

        self.request_counter += 1;
        let id = self.request_counter;
        log::info!("token requested by {}: #{} {} ({})", caller, id, params.name, params.symbol);
        self.requests.insert(id, TokenRequest::new(id, caller, params, now));
        Ok(id)
    }

    pub fn approve_token_request(&mut self, caps: &dyn CapabilityChecker, approver: &str, id: u64) -> Result<()> {
        self.decide_request(caps, approver, id, RequestStatus::Approved)
    }

    pub fn reject_token_request(&mut self, caps: &dyn CapabilityChecker, approver: &str, id: u64) -> Result<()> {
        self.decide_request(caps, approver, id, RequestStatus::Rejected)
    }

    fn decide_request(
        &mut self,
        caps: &dyn CapabilityChecker,
        approver: &str,
        id: u64,
        decision: RequestStatus,
    ) -> Result<()> {
        require_approver(caps, approver)?;
        let request = self
            .requests
            .get_mut(&id)
            .ok_or(RegistryError::RequestNotFound(id))?;
        if request.status != RequestStatus::Pending {
            return Err(RegistryError::RequestNotPending(id));
        }
        request.status = decision;
        log::info!("token request #{} {:?} by {}", id, decision, approver);
        Ok(())
    }

    pub fn get_request_details(&self, id: u64) -> Option<&TokenRequest> {
        self.requests.get(&id)
    }

    pub fn pending_requests(&self) -> Vec<u64> {
        self.request_ids_where(|r| r.status == RequestStatus::Pending)
    }

    /// Approved and not yet deployed
    pub fn approved_requests(&self) -> Vec<u64> {
        self.request_ids_where(|r| r.is_approved() && !r.deployed)
    }

    pub fn artist_requests(&self, artist: &str) -> Vec<&TokenRequest> {
        self.requests.values().filter(|r| r.artist == artist).collect()
    }

    fn request_ids_where(&self, keep: impl Fn(&TokenRequest) -> bool) -> Vec<u64> {
        self.requests
            .values()
            .filter(|r| keep(r))
            .map(|r| r.id)
            .collect()
    }

    // ---- deployment ----

    /// Deploy the token for an approved request.
    ///
    /// The full supply is minted to the artist and the token starts out
    /// whitelist-restricted with only the artist listed.
    pub fn deploy_token(
        &mut self,
        ledger: &mut Ledger,
        whitelist: &mut Whitelist,
        caps: &dyn CapabilityChecker,
        caller: &str,
        id: u64,
    ) -> Result<Address> {
        let request = self
            .requests
            .get(&id)
            .ok_or(RegistryError::RequestNotFound(id))?;
        if caller != request.artist {
            require_approver(caps, caller)?;
        }
        if !request.is_approved() {
            return Err(RegistryError::RequestNotApproved(id));
        }
        if request.deployed {
            return Err(RegistryError::AlreadyDeployed(id));
        }

        let token_address = self.derive_token_address(id);
        let token = TokenId::Artist(token_address.clone());
        let artist = request.artist.clone();
        let max_supply = request.max_supply;

        ledger.register_token(token.clone(), Some(max_supply))?;
        ledger.mint(&token, &artist, max_supply)?;
        whitelist.restrict(&token);
        whitelist.update(&token, &artist, true);

        if let Some(request) = self.requests.get_mut(&id) {
            request.deployed = true;
            request.token_address = Some(token_address.clone());
        }
        if let Some(profile) = self.artists.get_mut(&artist) {
            profile.token_count += 1;
        }
        self.deployed_tokens.push(token_address.clone());
        self.token_artists.insert(token_address.clone(), artist.clone());

        log::info!("token deployed for request #{}: {} -> {}", id, token_address, artist);
        Ok(token_address)
    }

    /// `0x` + first 20 bytes of SHA-256(factory address || request id)
    fn derive_token_address(&self, id: u64) -> Address {
        let mut hasher = Sha256::new();
        hasher.update(self.address.as_bytes());
        hasher.update(id.to_be_bytes());
        let digest = hasher.finalize();
        format!("0x{}", hex::encode(&digest[..20]))
    }

    pub fn is_deployed_token(&self, token_address: &str) -> bool {
        self.token_artists.contains_key(token_address)
    }

    pub fn all_deployed_tokens(&self) -> &[Address] {
        &self.deployed_tokens
    }

    pub fn artist_tokens(&self, artist: &str) -> Vec<&Address> {
        self.deployed_tokens
            .iter()
            .filter(|token| self.token_artists.get(*token).map(String::as_str) == Some(artist))
            .collect()
    }

    pub fn token_artist(&self, token_address: &str) -> Option<&Address> {
        self.token_artists.get(token_address)
    }

    /// Edit a token whitelist as an admin, whitelist manager, or the token's artist
    pub fn update_whitelist(
        &self,
        whitelist: &mut Whitelist,
        caps: &dyn CapabilityChecker,
        caller: &str,
        token: &TokenId,
        account: &str,
        allowed: bool,
    ) -> Result<()> {
        let owns_token = match token {
            TokenId::Artist(address) => self.token_artist(address).map(String::as_str) == Some(caller),
            _ => false,
        };
        if !owns_token {
            caps.require_any(caller, &[Role::Admin, Role::WhitelistManager])
                .map_err(|_| {
                    RegistryError::Unauthorized(format!("{} cannot edit whitelist of {}", caller, token))
                })?;
        }
        whitelist.update(token, account, allowed);
        Ok(())
    }

    // ---- pause ----

    pub fn pause(&mut self, caps: &dyn CapabilityChecker, caller: &str) -> Result<()> {
        require_pauser(caps, caller)?;
        self.paused = true;
        log::warn!("registry paused by {}", caller);
        Ok(())
    }

    pub fn unpause(&mut self, caps: &dyn CapabilityChecker, caller: &str) -> Result<()> {
        require_pauser(caps, caller)?;
        self.paused = false;
        log::info!("registry unpaused by {}", caller);
        Ok(())
    }
}

impl TokenDirectory for ArtistRegistry {
    fn is_listed(&self, token: &TokenId) -> bool {
        match token {
            TokenId::Artist(address) => self.is_deployed_token(address),
            _ => false,
        }
    }

    fn artist_of(&self, token: &TokenId) -> Option<Address> {
        match token {
            TokenId::Artist(address) => self.token_artist(address).cloned(),
            _ => None,
        }
    }
}

fn require_approver(caps: &dyn CapabilityChecker, caller: &str) -> Result<()> {
    caps.require_any(caller, &[Role::Admin, Role::Approver])
        .map_err(|_| RegistryError::Unauthorized(format!("{} is not an approver", caller)))
}

fn require_pauser(caps: &dyn CapabilityChecker, caller: &str) -> Result<()> {
    caps.require_any(caller, &[Role::Admin, Role::Pauser])
        .map_err(|_| RegistryError::Unauthorized(format!("{} cannot pause", caller)))
}
