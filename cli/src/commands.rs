//! Command dispatch and terminal output

use anyhow::{bail, Context, Result};
use owo_colors::OwoColorize;
use std::str::FromStr;
use vesika_core::constants::SECONDS_PER_DAY;
use vesika_core::{format_units, mul_div, parse_units, CapabilityChecker, Role, TokenId, U256};
use vesika_registry::{RequestStatus, TokenRequest, TokenRequestParams};
use vesika_staking::{voting_power, TierInfo};
use vesika_swap::{CreatePoolParams, SwapDirection, SwapRequest};

use crate::platform::Platform;
use crate::{Commands, Side};

/// Slippage floor applied to swaps run without `--min-out`, in percent
const DEFAULT_SLIPPAGE_PERCENT: u64 = 10;

impl From<Side> for SwapDirection {
    fn from(side: Side) -> Self {
        match side {
            Side::Buy => SwapDirection::MainToArtist,
            Side::Sell => SwapDirection::ArtistToMain,
        }
    }
}

fn amount(value: &str) -> Result<U256> {
    parse_units(value).with_context(|| format!("invalid amount {:?}", value))
}

fn token(value: &str) -> Result<TokenId> {
    TokenId::from_str(value).with_context(|| format!("invalid token {:?}", value))
}

fn role(value: &str) -> Result<Role> {
    Role::from_str(value).context("roles: admin, minter, pauser, approver, liquidity-manager, whitelist-manager")
}

fn header(title: &str) {
    println!("\n{}", title.cyan().bold());
    println!("{}", "═══════════════════════════════════".bright_black());
}

fn done(message: impl std::fmt::Display) {
    println!("{} {}", "✓".green().bold(), message);
}

fn row(label: &str, value: impl std::fmt::Display) {
    println!("{:<18} {}", format!("{}:", label).yellow(), value);
}

fn timestamp(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| secs.to_string())
}

/// Run one command against the platform; returns whether state changed
pub fn execute(platform: &mut Platform, caller: &str, now: u64, command: Commands) -> Result<bool> {
    let Platform {
        ledger,
        roles,
        whitelist,
        router,
        stakes,
        sale,
        registry,
        ..
    } = platform;

    match command {
        Commands::Init { .. } => bail!("init is handled before state is loaded"),

        Commands::Balance { address } => {
            header("Balances");
            row("Address", &address);
            for token in ledger.tokens() {
                let balance = ledger.balance_of(token, &address);
                if !balance.is_zero() || !token.is_artist() {
                    row(&token.to_string(), format_units(balance).green());
                }
            }
            if let Some(position) = stakes.active_stake(&address) {
                row("Staked VSK", format_units(position.amount).green());
            }
            println!();
            Ok(false)
        }

        Commands::Supply { token: t } => {
            let t = token(&t)?;
            let stats = ledger
                .supply_stats(&t)
                .with_context(|| format!("unknown token {}", t))?;
            header("Supply");
            row("Token", &t);
            row("Circulating", format_units(stats.circulating_supply));
            row("Minted", format_units(stats.total_minted));
            match ledger.max_supply(&t) {
                Some(cap) => row("Max supply", format_units(cap)),
                None => row("Max supply", "uncapped"),
            }
            row("Paused", ledger.is_paused(&t));
            println!();
            Ok(false)
        }

        Commands::Mint { to, amount: a, token: t } => {
            roles.require_any(caller, &[Role::Admin, Role::Minter])?;
            let (t, a) = (token(&t)?, amount(&a)?);
            ledger.mint(&t, &to, a)?;
            done(format!("Minted {} {} to {}", format_units(a), t, to));
            Ok(true)
        }

        Commands::Transfer { to, amount: a, token: t } => {
            let (t, a) = (token(&t)?, amount(&a)?);
            ledger.transfer(whitelist, &t, caller, &to, a)?;
            done(format!("Sent {} {} from {} to {}", format_units(a), t, caller, to));
            Ok(true)
        }

        Commands::GrantRole { role: r, account } => {
            let r = role(&r)?;
            roles.grant(caller, r, &account)?;
            done(format!("Granted {} to {}", r, account));
            Ok(true)
        }

        Commands::RevokeRole { role: r, account } => {
            let r = role(&r)?;
            roles.revoke(caller, r, &account)?;
            done(format!("Revoked {} from {}", r, account));
            Ok(true)
        }

        Commands::Whitelist { token: t, account, remove } => {
            let t = token(&t)?;
            registry.update_whitelist(whitelist, roles, caller, &t, &account, !remove)?;
            let verb = if remove { "Removed" } else { "Whitelisted" };
            done(format!("{} {} on {}", verb, account, t));
            Ok(true)
        }

        Commands::PauseToken { token: t } => {
            let t = token(&t)?;
            ledger.pause(roles, caller, &t)?;
            done(format!("Transfers of {} paused", t));
            Ok(true)
        }

        Commands::UnpauseToken { token: t } => {
            let t = token(&t)?;
            ledger.unpause(roles, caller, &t)?;
            done(format!("Transfers of {} resumed", t));
            Ok(true)
        }

        Commands::RegisterArtist { metadata } => {
            registry.register_artist(caller, &metadata, now)?;
            done(format!("Registered artist {} (pending approval)", caller));
            Ok(true)
        }

        Commands::ApproveArtist { artist } => {
            registry.approve_artist(ledger, roles, caller, &artist)?;
            done(format!("Approved artist {}", artist));
            Ok(true)
        }

        Commands::RejectArtist { artist } => {
            registry.reject_artist(roles, caller, &artist)?;
            done(format!("Rejected artist {}", artist));
            Ok(true)
        }

        Commands::RequestToken {
            name,
            symbol,
            max_supply,
            swap_rate,
            description,
            metadata,
        } => {
            let params = TokenRequestParams {
                name,
                symbol,
                max_supply: amount(&max_supply)?,
                initial_swap_rate: amount(&swap_rate)?,
                description,
                metadata,
            };
            let id = registry.request_token(caller, params, now)?;
            done(format!("Token request #{} submitted", id));
            Ok(true)
        }

        Commands::ApproveRequest { id } => {
            registry.approve_token_request(roles, caller, id)?;
            done(format!("Request #{} approved", id));
            Ok(true)
        }

        Commands::RejectRequest { id } => {
            registry.reject_token_request(roles, caller, id)?;
            done(format!("Request #{} rejected", id));
            Ok(true)
        }

        Commands::DeployToken { id } => {
            let address = registry.deploy_token(ledger, whitelist, roles, caller, id)?;
            done(format!("Request #{} deployed at {}", id, address.bright_blue()));
            Ok(true)
        }

        Commands::Requests { artist } => {
            header("Token Requests");
            let requests: Vec<&TokenRequest> = match &artist {
                Some(artist) => registry.artist_requests(artist),
                None => (1..=registry.request_counter())
                    .filter_map(|id| registry.get_request_details(id))
                    .collect(),
            };
            if requests.is_empty() {
                println!("  (none)");
            }
            for request in requests {
                let status = match (request.status, request.deployed) {
                    (_, true) => "deployed".green().to_string(),
                    (RequestStatus::Approved, false) => "approved".cyan().to_string(),
                    (RequestStatus::Pending, _) => "pending".yellow().to_string(),
                    (RequestStatus::Rejected, _) => "rejected".red().to_string(),
                };
                println!(
                    "  #{:<4} {:<10} {:<24} {:>26}  {}  {}",
                    request.id,
                    request.symbol,
                    request.name,
                    format_units(request.max_supply),
                    status,
                    request.artist
                );
                if let Some(address) = &request.token_address {
                    println!("        token {}", address.bright_blue());
                }
            }
            println!(
                "\n  pending: {:?}  awaiting deployment: {:?}  paused: {}",
                registry.pending_requests(),
                registry.approved_requests(),
                registry.is_paused()
            );
            println!();
            Ok(false)
        }

        Commands::PauseRegistry => {
            registry.pause(roles, caller)?;
            done("Registry paused");
            Ok(true)
        }

        Commands::UnpauseRegistry => {
            registry.unpause(roles, caller)?;
            done("Registry unpaused");
            Ok(true)
        }

        Commands::CreatePool {
            token: t,
            main_amount,
            artist_amount,
        } => {
            let t = token(&t)?;
            // the router must be able to receive and pay out the artist token;
            // the listing is kept only if the pool is created
            let mut staged = whitelist.clone();
            if staged.is_restricted(&t) && !staged.is_whitelisted(&t, router.address()) {
                staged.update(&t, router.address(), true);
            }
            router.create_pool(
                ledger,
                &staged,
                roles,
                registry,
                caller,
                CreatePoolParams {
                    token: t.clone(),
                    main_amount: amount(&main_amount)?,
                    artist_amount: amount(&artist_amount)?,
                    now,
                },
            )?;
            *whitelist = staged;
            done(format!("Pool created for {}", t));
            Ok(true)
        }

        Commands::PoolInfo { token: t } => {
            let t = token(&t)?;
            let info = router.get_pool_info(&t)?;
            header("Liquidity Pool");
            row("Token", &t);
            row("VSK reserve", format_units(info.main_token_reserve));
            row("Artist reserve", format_units(info.artist_token_reserve));
            row("Liquidity", format_units(info.total_liquidity));
            row("Active", info.is_active);
            row("Fee (bps)", router.fee().fee_bps());
            if let Some(pool) = router.pool(&t) {
                row("Creator", &pool.creator);
                row("Created", timestamp(pool.created_at));
            }
            println!();
            Ok(false)
        }

        Commands::Quote { token: t, amount: a, side } => {
            let (t, a) = (token(&t)?, amount(&a)?);
            let direction = SwapDirection::from(side);
            let out = router.quote(&t, direction, a)?;
            println!(
                "{} {} -> {} {}",
                format_units(a),
                direction.input_token(&t),
                format_units(out).green(),
                direction.output_token(&t)
            );
            Ok(false)
        }

        Commands::Swap {
            token: t,
            amount: a,
            side,
            min_out,
        } => {
            let (t, a) = (token(&t)?, amount(&a)?);
            let direction = SwapDirection::from(side);
            let min_amount_out = match min_out {
                Some(min) => amount(&min)?,
                None => {
                    let quoted = router.quote(&t, direction, a)?;
                    mul_div(quoted, U256::from(100 - DEFAULT_SLIPPAGE_PERCENT), U256::from(100))
                        .context("quote too large")?
                }
            };
            let out = router.swap(
                ledger,
                whitelist,
                caller,
                SwapRequest {
                    token: t.clone(),
                    direction,
                    amount_in: a,
                    min_amount_out,
                },
            )?;
            done(format!(
                "Swapped {} {} for {} {}",
                format_units(a),
                direction.input_token(&t),
                format_units(out),
                direction.output_token(&t)
            ));
            Ok(true)
        }

        Commands::Stake { amount: a, days } => {
            let a = amount(&a)?;
            let lock = days
                .checked_mul(SECONDS_PER_DAY)
                .context("lock period too long")?;
            stakes.stake(ledger, whitelist, caller, a, lock, now)?;
            done(format!("Staked {} VSK for {} days", format_units(a), days));
            Ok(true)
        }

        Commands::Unstake => {
            let returned = stakes.unstake(ledger, whitelist, caller, now)?;
            done(format!("Unstaked {} VSK", format_units(returned)));
            Ok(true)
        }

        Commands::Claim => {
            let reward = stakes.claim_rewards(ledger, caller, now)?;
            done(format!("Claimed {} VSK", format_units(reward)));
            Ok(!reward.is_zero())
        }

        Commands::Reward { address } => {
            let account = address.as_deref().unwrap_or(caller);
            header("Stake");
            row("Address", account);
            match stakes.active_stake(account) {
                Some(position) => {
                    row("Staked", format_units(position.amount));
                    row("Tier", format!("{:?}", position.tier()?));
                    row("Since", timestamp(position.timestamp));
                    row("Unlocks", timestamp(position.unlock_time()));
                    row("Pending reward", format_units(stakes.calculate_reward(account, now)?).green());
                }
                None => println!("  no active stake"),
            }
            println!();
            Ok(false)
        }

        Commands::VotingPower { address } => {
            let account = address.as_deref().unwrap_or(caller);
            let power = voting_power(ledger, stakes, account);
            header("Voting Power");
            row("Address", &power.account);
            row("Balance", format_units(power.balance));
            row("Staked", format_units(power.staked));
            row("Power", format_units(power.power).green());
            println!();
            Ok(false)
        }

        Commands::Tiers => {
            header("Staking Tiers");
            for tier in TierInfo::all() {
                println!(
                    "  {:<10} {:>4} days  {:>5.2}% APY",
                    format!("{:?}", tier.tier),
                    tier.lock_days,
                    tier.apy_bps as f64 / 100.0
                );
            }
            row("Total staked", format_units(stakes.total_staked()));
            println!();
            Ok(false)
        }

        Commands::SaleInfo => {
            let info = sale.sale_info();
            header("Primary Sale");
            row("Status", format!("{:?}", sale.status()));
            row("Rate (VSK/unit)", format_units(info.rate));
            row("Min buy", format_units(info.min_buy));
            row("Max buy", format_units(info.max_buy));
            row("Sold", format_units(info.sold));
            row("Raised", format_units(info.raised));
            row("Available", format_units(info.available));
            println!();
            Ok(false)
        }

        Commands::Buy { value } => {
            let value = amount(&value)?;
            let vsk = sale.buy_vesika(ledger, whitelist, caller, value)?;
            done(format!("Bought {} VSK for {}", format_units(vsk), format_units(value)));
            Ok(true)
        }

        Commands::UpdateRate { rate } => {
            sale.update_rate(roles, caller, amount(&rate)?)?;
            done(format!("Sale rate set to {}", rate));
            Ok(true)
        }

        Commands::AddInventory { amount: a } => {
            sale.add_inventory(roles, caller, amount(&a)?)?;
            done(format!("Inventory now {}", format_units(sale.sale_info().available)));
            Ok(true)
        }

        Commands::SetInventory { amount: a } => {
            sale.set_inventory(roles, caller, amount(&a)?)?;
            done(format!("Inventory now {}", format_units(sale.sale_info().available)));
            Ok(true)
        }

        Commands::PauseSale => {
            sale.pause(roles, caller)?;
            done("Sale paused");
            Ok(true)
        }

        Commands::UnpauseSale => {
            sale.unpause(roles, caller)?;
            done("Sale unpaused");
            Ok(true)
        }

        Commands::Withdraw { to, amount: a } => {
            let a = amount(&a)?;
            sale.withdraw_raised(ledger, whitelist, roles, caller, &to, a)?;
            done(format!("Withdrew {} to {}", format_units(a), to));
            Ok(true)
        }
    }
}
