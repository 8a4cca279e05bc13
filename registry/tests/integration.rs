use vesika_core::constants::ARTIST_BONUS_TOKENS;
use vesika_core::*;
use vesika_registry::*;
use vesika_swap::{CreatePoolParams, FeeConfig, SwapError, SwapRouter};

const ARTIST: &str = "0xartist";
const OTHER_ARTIST: &str = "0xartist2";

struct Platform {
    registry: ArtistRegistry,
    ledger: Ledger,
    roles: Roles,
    whitelist: Whitelist,
}

fn platform() -> Platform {
    let mut roles = Roles::with_admin("owner");
    roles.grant("owner", Role::Approver, "curator").unwrap();
    Platform {
        registry: ArtistRegistry::new("factory"),
        ledger: Ledger::default(),
        roles,
        whitelist: Whitelist::default(),
    }
}

fn params(name: &str, symbol: &str) -> TokenRequestParams {
    TokenRequestParams {
        name: name.to_string(),
        symbol: symbol.to_string(),
        max_supply: tokens(1_000_000),
        initial_swap_rate: tokens(10),
        description: "Artist's first token".to_string(),
        metadata: "ipfs://QmTokenMetadata123".to_string(),
    }
}

/// Registered, approved artist with one approved request
fn approved_request(p: &mut Platform) -> u64 {
    p.registry
        .register_artist(ARTIST, "ipfs://QmArtistMetadata", 1)
        .unwrap();
    p.registry
        .approve_artist(&mut p.ledger, &p.roles, "curator", ARTIST)
        .unwrap();
    let id = p
        .registry
        .request_token(ARTIST, params("ArtistToken1", "ART1"), 2)
        .unwrap();
    p.registry
        .approve_token_request(&p.roles, "curator", id)
        .unwrap();
    id
}

#[test]
fn test_register_artist() {
    let mut p = platform();
    p.registry
        .register_artist(ARTIST, "ipfs://QmArtistMetadata", 7)
        .unwrap();

    let info = p.registry.get_artist_info(ARTIST).unwrap();
    assert!(info.is_registered);
    assert!(!info.is_approved);
    assert_eq!(info.profile_metadata, "ipfs://QmArtistMetadata");
    assert_eq!(info.registered_at, 7);
    assert_eq!(p.registry.pending_artists().len(), 1);
}

#[test]
fn test_duplicate_registration_fails() {
    let mut p = platform();
    p.registry.register_artist(ARTIST, "a", 0).unwrap();
    assert_eq!(
        p.registry.register_artist(ARTIST, "b", 0),
        Err(RegistryError::AlreadyRegistered(ARTIST.to_string()))
    );
}

#[test]
fn test_approval_pays_bonus_once() {
    let mut p = platform();
    p.registry.register_artist(ARTIST, "a", 0).unwrap();

    p.registry
        .approve_artist(&mut p.ledger, &p.roles, "curator", ARTIST)
        .unwrap();
    p.registry
        .approve_artist(&mut p.ledger, &p.roles, "owner", ARTIST)
        .unwrap();

    assert_eq!(
        p.ledger.balance_of(&TokenId::Main, ARTIST),
        tokens(ARTIST_BONUS_TOKENS)
    );
    assert_eq!(p.registry.approved_artist_count(), 1);
    assert!(p.registry.pending_artists().is_empty());
}

#[test]
fn test_only_approvers_decide() {
    let mut p = platform();
    p.registry.register_artist(ARTIST, "a", 0).unwrap();

    let err = p
        .registry
        .approve_artist(&mut p.ledger, &p.roles, ARTIST, ARTIST)
        .unwrap_err();
    assert!(matches!(err, RegistryError::Unauthorized(_)));
    assert_eq!(p.ledger.total_supply(&TokenId::Main), U256::zero());

    assert!(matches!(
        p.registry
            .approve_artist(&mut p.ledger, &p.roles, "curator", "0xnobody"),
        Err(RegistryError::NotRegistered(_))
    ));
}

#[test]
fn test_rejected_artist_cannot_request() {
    let mut p = platform();
    p.registry.register_artist(ARTIST, "a", 0).unwrap();
    p.registry.reject_artist(&p.roles, "curator", ARTIST).unwrap();

    assert!(p.registry.pending_artists().is_empty());
    assert_eq!(
        p.registry.request_token(ARTIST, params("T", "T"), 0),
        Err(RegistryError::NotApproved(ARTIST.to_string()))
    );
}

#[test]
fn test_unapproved_artist_cannot_request() {
    let mut p = platform();
    p.registry.register_artist(ARTIST, "a", 0).unwrap();
    assert!(matches!(
        p.registry.request_token(ARTIST, params("T", "T"), 0),
        Err(RegistryError::NotApproved(_))
    ));
    assert!(matches!(
        p.registry.request_token(OTHER_ARTIST, params("T", "T"), 0),
        Err(RegistryError::NotRegistered(_))
    ));
}

#[test]
fn test_request_validation() {
    let mut p = platform();
    p.registry.register_artist(ARTIST, "a", 0).unwrap();
    p.registry
        .approve_artist(&mut p.ledger, &p.roles, "owner", ARTIST)
        .unwrap();

    assert_eq!(
        p.registry.request_token(ARTIST, params("", "ART1"), 0),
        Err(RegistryError::InvalidInput("Name cannot be empty".to_string()))
    );

    let mut zero = params("ArtistToken1", "ART1");
    zero.max_supply = U256::zero();
    assert_eq!(
        p.registry.request_token(ARTIST, zero, 0),
        Err(RegistryError::InvalidInput(
            "Max supply must be greater than 0".to_string()
        ))
    );
    assert_eq!(p.registry.request_counter(), 0);
}

#[test]
fn test_request_ids_are_sequential() {
    let mut p = platform();
    let first = approved_request(&mut p);
    let second = p
        .registry
        .request_token(ARTIST, params("ArtistToken2", "ART2"), 3)
        .unwrap();
    assert_eq!((first, second), (1, 2));
    assert_eq!(p.registry.pending_requests(), vec![2]);
    assert_eq!(p.registry.approved_requests(), vec![1]);
    assert_eq!(p.registry.artist_requests(ARTIST).len(), 2);
}

#[test]
fn test_decided_request_cannot_change() {
    let mut p = platform();
    let id = approved_request(&mut p);

    assert_eq!(
        p.registry.reject_token_request(&p.roles, "curator", id),
        Err(RegistryError::RequestNotPending(id))
    );
    assert_eq!(
        p.registry.approve_token_request(&p.roles, "curator", 99),
        Err(RegistryError::RequestNotFound(99))
    );
}

#[test]
fn test_deploy_mints_supply_and_restricts() {
    let mut p = platform();
    let id = approved_request(&mut p);

    let address = p
        .registry
        .deploy_token(&mut p.ledger, &mut p.whitelist, &p.roles, ARTIST, id)
        .unwrap();
    let token = TokenId::Artist(address.clone());

    assert_eq!(p.ledger.balance_of(&token, ARTIST), tokens(1_000_000));
    assert_eq!(p.ledger.max_supply(&token), Some(tokens(1_000_000)));
    assert!(p.whitelist.is_restricted(&token));
    assert!(p.whitelist.is_whitelisted(&token, ARTIST));

    let request = p.registry.get_request_details(id).unwrap();
    assert!(request.deployed);
    assert_eq!(request.token_address.as_deref(), Some(address.as_str()));
    assert!(p.registry.approved_requests().is_empty());
    assert_eq!(p.registry.artist_tokens(ARTIST), vec![&address]);
    assert_eq!(p.registry.all_deployed_tokens(), &[address.clone()]);
    assert!(p.registry.is_deployed_token(&address));
    assert_eq!(p.registry.get_artist_info(ARTIST).unwrap().token_count, 1);

    // restricted: moving between two unlisted holders is refused
    p.ledger
        .transfer(&p.whitelist, &token, ARTIST, "fan", tokens(10))
        .unwrap();
    assert!(p
        .ledger
        .transfer(&p.whitelist, &token, "fan", "fan2", tokens(1))
        .is_err());
}

#[test]
fn test_double_deploy_fails() {
    let mut p = platform();
    let id = approved_request(&mut p);
    p.registry
        .deploy_token(&mut p.ledger, &mut p.whitelist, &p.roles, ARTIST, id)
        .unwrap();

    assert_eq!(
        p.registry
            .deploy_token(&mut p.ledger, &mut p.whitelist, &p.roles, ARTIST, id),
        Err(RegistryError::AlreadyDeployed(id))
    );
}

#[test]
fn test_deploy_requires_approval_and_ownership() {
    let mut p = platform();
    p.registry.register_artist(ARTIST, "a", 0).unwrap();
    p.registry
        .approve_artist(&mut p.ledger, &p.roles, "owner", ARTIST)
        .unwrap();
    let id = p
        .registry
        .request_token(ARTIST, params("ArtistToken1", "ART1"), 0)
        .unwrap();

    assert_eq!(
        p.registry
            .deploy_token(&mut p.ledger, &mut p.whitelist, &p.roles, ARTIST, id),
        Err(RegistryError::RequestNotApproved(id))
    );

    p.registry
        .approve_token_request(&p.roles, "owner", id)
        .unwrap();
    assert!(matches!(
        p.registry
            .deploy_token(&mut p.ledger, &mut p.whitelist, &p.roles, "stranger", id),
        Err(RegistryError::Unauthorized(_))
    ));
    assert!(p
        .registry
        .deploy_token(&mut p.ledger, &mut p.whitelist, &p.roles, "curator", id)
        .is_ok());
}

#[test]
fn test_pause_blocks_requests() {
    let mut p = platform();
    p.registry.register_artist(ARTIST, "a", 0).unwrap();
    p.registry
        .approve_artist(&mut p.ledger, &p.roles, "owner", ARTIST)
        .unwrap();

    assert!(p.registry.pause(&p.roles, ARTIST).is_err());
    p.registry.pause(&p.roles, "owner").unwrap();
    assert_eq!(
        p.registry.request_token(ARTIST, params("T", "T"), 0),
        Err(RegistryError::Paused)
    );
    assert_eq!(
        p.registry.register_artist(OTHER_ARTIST, "b", 0),
        Err(RegistryError::Paused)
    );

    p.registry.unpause(&p.roles, "owner").unwrap();
    assert!(p.registry.request_token(ARTIST, params("T", "T"), 0).is_ok());
}

#[test]
fn test_artist_manages_own_whitelist() {
    let mut p = platform();
    let id = approved_request(&mut p);
    let address = p
        .registry
        .deploy_token(&mut p.ledger, &mut p.whitelist, &p.roles, ARTIST, id)
        .unwrap();
    let token = TokenId::Artist(address);

    p.registry
        .update_whitelist(&mut p.whitelist, &p.roles, ARTIST, &token, "gallery", true)
        .unwrap();
    assert!(p.whitelist.is_whitelisted(&token, "gallery"));

    assert!(matches!(
        p.registry
            .update_whitelist(&mut p.whitelist, &p.roles, "gallery", &token, "gallery", false),
        Err(RegistryError::Unauthorized(_))
    ));
}

#[test]
fn test_artist_pools_own_token_then_fan_swaps() {
    let mut p = platform();
    let id = approved_request(&mut p);
    let address = p
        .registry
        .deploy_token(&mut p.ledger, &mut p.whitelist, &p.roles, ARTIST, id)
        .unwrap();
    let token = TokenId::Artist(address);

    let mut router = SwapRouter::new("swap", FeeConfig::default()).unwrap();
    p.registry
        .update_whitelist(&mut p.whitelist, &p.roles, ARTIST, &token, router.address(), true)
        .unwrap();
    assert!(!p.roles.has_capability(ARTIST, Role::LiquidityManager));

    let seed = |token: &TokenId| CreatePoolParams {
        token: token.clone(),
        main_amount: tokens(500),
        artist_amount: tokens(5_000),
        now: 10,
    };
    let err = router
        .create_pool(&mut p.ledger, &p.whitelist, &p.roles, &p.registry, OTHER_ARTIST, seed(&token))
        .unwrap_err();
    assert!(matches!(err, SwapError::Unauthorized(_)));

    router
        .create_pool(
            &mut p.ledger,
            &p.whitelist,
            &p.roles,
            &p.registry,
            ARTIST,
            seed(&token),
        )
        .unwrap();

    p.ledger.mint(&TokenId::Main, "fan", tokens(100)).unwrap();
    let quoted = router
        .quote(&token, vesika_swap::SwapDirection::MainToArtist, tokens(10))
        .unwrap();
    let out = router
        .swap_main_to_artist(&mut p.ledger, &p.whitelist, "fan", &token, tokens(10), quoted)
        .unwrap();

    assert_eq!(out, quoted);
    assert_eq!(p.ledger.balance_of(&token, "fan"), out);
    assert_eq!(
        router.get_pool_info(&token).unwrap().main_token_reserve,
        tokens(510)
    );
}

#[test]
fn test_registry_state_serializes() {
    let mut p = platform();
    let id = approved_request(&mut p);
    p.registry
        .deploy_token(&mut p.ledger, &mut p.whitelist, &p.roles, ARTIST, id)
        .unwrap();

    let json = serde_json::to_string(&p.registry).unwrap();
    let restored: ArtistRegistry = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.all_deployed_tokens(), p.registry.all_deployed_tokens());
    assert_eq!(restored.get_request_details(id), p.registry.get_request_details(id));
    assert_eq!(restored.request_counter(), 1);
}
