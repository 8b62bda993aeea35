use cosmwasm_std::{
    coins, entry_point, to_json_binary, Addr, BankMsg, Binary, Deps, DepsMut, Env, Event,
    MessageInfo, Order, Response, StdResult, Storage, Uint128,
};
use cw2::{get_contract_version, set_contract_version};
use cw_storage_plus::Bound;
use shared::accrued_interest;

use crate::error::ContractError;
use crate::msg::{
    AdminResponse, AdminsResponse, BalanceResponse, ConfigResponse, ExecuteMsg, InstantiateMsg,
    InterestPaidEventResponse, InterestPaidEventsResponse, InterestResponse,
    LastInterestPaidResponse, MigrateMsg, QueryMsg, RateResponse,
};
use crate::state::{
    Account, Config, InterestPaid, ACCOUNTS, ACCOUNT_EVENTS, ADMINS, ANNUAL_RATE, CONFIG,
    INTEREST_EVENTS, NEXT_EVENT_ID,
};

const CONTRACT_NAME: &str = "crates.io:interest-bank";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 30;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    if msg.denom.trim().is_empty() {
        return Err(ContractError::InvalidDenom {});
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let config = Config {
        owner: info.sender.clone(),
        denom: msg.denom,
    };
    CONFIG.save(deps.storage, &config)?;

    let annual_rate = msg.annual_rate.unwrap_or(0);
    ANNUAL_RATE.save(deps.storage, &annual_rate)?;

    NEXT_EVENT_ID.save(deps.storage, &1u64)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("owner", info.sender)
        .add_attribute("denom", config.denom)
        .add_attribute("annual_rate", annual_rate.to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Deposit {} => execute_deposit(deps, env, info),
        ExecuteMsg::Withdraw { amount } => execute_withdraw(deps, info, amount),
        ExecuteMsg::SetAnnualInterestRate { rate } => {
            execute_set_annual_interest_rate(deps, info, rate)
        }
        ExecuteMsg::AddAdmin { address } => execute_add_admin(deps, info, address),
        ExecuteMsg::RemoveAdmin { address } => execute_remove_admin(deps, info, address),
    }
}

pub fn execute_deposit(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let amount = paid_amount(&info, &config.denom)?;
    let rate = ANNUAL_RATE.load(deps.storage)?;
    let now = env.block.time.seconds();

    // A new account starts its checkpoint now, so nothing is owed yet
    let mut account = ACCOUNTS
        .may_load(deps.storage, &info.sender)?
        .unwrap_or(Account {
            balance: Uint128::zero(),
            last_interest_paid: now,
        });

    let interest = settle_interest(&mut account, rate, now)?;
    account.balance = account.balance.checked_add(amount)?;
    account.last_interest_paid = now;

    ACCOUNTS.save(deps.storage, &info.sender, &account)?;

    let mut response = Response::new()
        .add_attribute("method", "deposit")
        .add_attribute("depositor", info.sender.to_string())
        .add_attribute("amount", amount)
        .add_attribute("interest", interest)
        .add_attribute("balance", account.balance);

    if !interest.is_zero() {
        let event = record_interest_paid(deps.storage, &info.sender, interest, now)?;
        deps.api.debug(&format!(
            "interest paid: {} {} at {}",
            info.sender, interest, now
        ));
        response = response.add_event(event);
    }

    Ok(response)
}

pub fn execute_withdraw(
    deps: DepsMut,
    info: MessageInfo,
    amount: Uint128,
) -> Result<Response, ContractError> {
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {});
    }

    let config = CONFIG.load(deps.storage)?;

    // Withdrawal neither settles interest nor moves the checkpoint
    let mut account = match ACCOUNTS.may_load(deps.storage, &info.sender)? {
        Some(account) if account.balance >= amount => account,
        _ => return Err(ContractError::InsufficientBalance {}),
    };
    account.balance = account.balance.checked_sub(amount)?;

    ACCOUNTS.save(deps.storage, &info.sender, &account)?;

    Ok(Response::new()
        .add_message(BankMsg::Send {
            to_address: info.sender.to_string(),
            amount: coins(amount.u128(), config.denom),
        })
        .add_attribute("method", "withdraw")
        .add_attribute("account", info.sender)
        .add_attribute("amount", amount)
        .add_attribute("balance", account.balance))
}

pub fn execute_set_annual_interest_rate(
    deps: DepsMut,
    info: MessageInfo,
    rate: u64,
) -> Result<Response, ContractError> {
    ensure_privileged(deps.storage, &info.sender)?;

    ANNUAL_RATE.save(deps.storage, &rate)?;

    Ok(Response::new()
        .add_attribute("method", "set_annual_interest_rate")
        .add_attribute("sender", info.sender)
        .add_attribute("rate", rate.to_string()))
}

pub fn execute_add_admin(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    let config = ensure_privileged(deps.storage, &info.sender)?;
    let admin_addr = deps.api.addr_validate(&address)?;

    // The owner is implicitly privileged and stays out of the admin map
    if admin_addr != config.owner {
        ADMINS.save(deps.storage, &admin_addr, &true)?;
    }

    Ok(Response::new()
        .add_attribute("method", "add_admin")
        .add_attribute("sender", info.sender)
        .add_attribute("admin", address))
}

pub fn execute_remove_admin(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    let config = ensure_privileged(deps.storage, &info.sender)?;
    let admin_addr = deps.api.addr_validate(&address)?;

    if admin_addr == config.owner {
        return Err(ContractError::CannotRemoveOwner {});
    }
    if admin_addr == info.sender {
        return Err(ContractError::CannotRemoveSelf {});
    }

    ADMINS.remove(deps.storage, &admin_addr);

    Ok(Response::new()
        .add_attribute("method", "remove_admin")
        .add_attribute("sender", info.sender)
        .add_attribute("admin", address))
}

/// Sum of the attached funds in the ledger's denomination.
fn paid_amount(info: &MessageInfo, denom: &str) -> Result<Uint128, ContractError> {
    let mut amount = Uint128::zero();
    for coin in &info.funds {
        if coin.denom != denom {
            return Err(ContractError::UnsupportedDenom {
                denom: coin.denom.clone(),
            });
        }
        amount = amount.checked_add(coin.amount)?;
    }

    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {});
    }
    Ok(amount)
}

/// Capitalizes the interest accrued on the current balance since the current
/// checkpoint and returns it. The checkpoint is left untouched; the caller
/// advances it once the new funds are credited.
fn settle_interest(
    account: &mut Account,
    rate: u64,
    as_of: u64,
) -> Result<Uint128, ContractError> {
    let interest = accrued_interest(account.balance, rate, account.last_interest_paid, as_of)?;
    account.balance = account.balance.checked_add(interest)?;
    Ok(interest)
}

fn record_interest_paid(
    storage: &mut dyn Storage,
    account: &Addr,
    amount: Uint128,
    timestamp: u64,
) -> Result<Event, ContractError> {
    let id = NEXT_EVENT_ID.load(storage)?;
    let next_id = id.checked_add(1).ok_or(ContractError::ArithmeticOverflow {})?;
    NEXT_EVENT_ID.save(storage, &next_id)?;

    let record = InterestPaid {
        account: account.clone(),
        amount,
        timestamp,
    };
    INTEREST_EVENTS.save(storage, id, &record)?;
    ACCOUNT_EVENTS.save(storage, (account, id), &())?;

    Ok(Event::new("interest_paid")
        .add_attribute("id", id.to_string())
        .add_attribute("account", account.to_string())
        .add_attribute("amount", amount)
        .add_attribute("timestamp", timestamp.to_string()))
}

fn is_privileged(storage: &dyn Storage, config: &Config, addr: &Addr) -> StdResult<bool> {
    if *addr == config.owner {
        return Ok(true);
    }
    Ok(ADMINS.may_load(storage, addr)?.unwrap_or(false))
}

/// Fails with `Unauthorized` unless `caller` is the owner or an admin.
fn ensure_privileged(storage: &dyn Storage, caller: &Addr) -> Result<Config, ContractError> {
    let config = CONFIG.load(storage)?;
    if !is_privileged(storage, &config, caller)? {
        return Err(ContractError::Unauthorized {});
    }
    Ok(config)
}

/// Anyone may read their own pending interest, only the owner and admins may read others'.
fn ensure_can_view(
    storage: &dyn Storage,
    caller: &Addr,
    user: &Addr,
) -> Result<(), ContractError> {
    if caller != user {
        ensure_privileged(storage, caller)?;
    }
    Ok(())
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    let binary = match msg {
        QueryMsg::Balance { caller } => {
            let caller_addr = deps.api.addr_validate(&caller)?;
            to_json_binary(&query_balance(deps, &caller_addr)?)?
        }
        QueryMsg::UserBalance { caller, user } => {
            let (caller_addr, user_addr) = validate_pair(deps, &caller, &user)?;
            ensure_privileged(deps.storage, &caller_addr)?;
            to_json_binary(&query_balance(deps, &user_addr)?)?
        }
        QueryMsg::MyInterest { caller } => {
            let caller_addr = deps.api.addr_validate(&caller)?;
            to_json_binary(&query_interest(deps, &env, &caller_addr)?)?
        }
        QueryMsg::UserInterest { caller, user } => {
            let (caller_addr, user_addr) = validate_pair(deps, &caller, &user)?;
            ensure_can_view(deps.storage, &caller_addr, &user_addr)?;
            to_json_binary(&query_interest(deps, &env, &user_addr)?)?
        }
        QueryMsg::UserLastInterestPaid { caller, user } => {
            let (caller_addr, user_addr) = validate_pair(deps, &caller, &user)?;
            ensure_privileged(deps.storage, &caller_addr)?;
            to_json_binary(&query_last_interest_paid(deps, &user_addr)?)?
        }
        QueryMsg::AnnualInterestRate {} => to_json_binary(&RateResponse {
            rate: ANNUAL_RATE.load(deps.storage)?,
        })?,
        QueryMsg::IsAdmin { address } => to_json_binary(&query_is_admin(deps, address)?)?,
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?)?,
        QueryMsg::Admins { start_after, limit } => {
            to_json_binary(&query_admins(deps, start_after, limit)?)?
        }
        QueryMsg::InterestPaidEvents {
            account,
            start_after,
            limit,
        } => to_json_binary(&query_interest_paid_events(
            deps,
            account,
            start_after,
            limit,
        )?)?,
    };
    Ok(binary)
}

fn validate_pair(deps: Deps, caller: &str, user: &str) -> StdResult<(Addr, Addr)> {
    Ok((deps.api.addr_validate(caller)?, deps.api.addr_validate(user)?))
}

fn query_balance(deps: Deps, user: &Addr) -> StdResult<BalanceResponse> {
    let balance = ACCOUNTS
        .may_load(deps.storage, user)?
        .map(|account| account.balance)
        .unwrap_or_default();
    Ok(BalanceResponse { balance })
}

fn query_interest(deps: Deps, env: &Env, user: &Addr) -> Result<InterestResponse, ContractError> {
    let interest = match ACCOUNTS.may_load(deps.storage, user)? {
        Some(account) => {
            let rate = ANNUAL_RATE.load(deps.storage)?;
            accrued_interest(
                account.balance,
                rate,
                account.last_interest_paid,
                env.block.time.seconds(),
            )?
        }
        None => Uint128::zero(),
    };
    Ok(InterestResponse { interest })
}

fn query_last_interest_paid(deps: Deps, user: &Addr) -> StdResult<LastInterestPaidResponse> {
    let timestamp = ACCOUNTS
        .may_load(deps.storage, user)?
        .map(|account| account.last_interest_paid)
        .unwrap_or(0);
    Ok(LastInterestPaidResponse { timestamp })
}

fn query_is_admin(deps: Deps, address: String) -> StdResult<AdminResponse> {
    let addr = deps.api.addr_validate(&address)?;
    let is_admin = ADMINS.may_load(deps.storage, &addr)?.unwrap_or(false);
    Ok(AdminResponse { is_admin })
}

fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        owner: config.owner,
        denom: config.denom,
    })
}

fn query_admins(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<AdminsResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start_addr = start_after
        .map(|addr| deps.api.addr_validate(&addr))
        .transpose()?;
    let start = start_addr.as_ref().map(Bound::exclusive);

    let admins = ADMINS
        .range(deps.storage, start, None, Order::Ascending)
        .filter_map(|item| match item {
            Ok((addr, true)) => Some(Ok(addr)),
            Ok((_, false)) => None,
            Err(err) => Some(Err(err)),
        })
        .take(limit)
        .collect::<StdResult<Vec<Addr>>>()?;

    Ok(AdminsResponse { admins })
}

fn query_interest_paid_events(
    deps: Deps,
    account: Option<String>,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<InterestPaidEventsResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);

    let ids: Vec<u64> = match account {
        Some(account) => {
            let account_addr = deps.api.addr_validate(&account)?;
            ACCOUNT_EVENTS
                .prefix(&account_addr)
                .keys(deps.storage, start, None, Order::Ascending)
                .take(limit)
                .collect::<StdResult<_>>()?
        }
        None => INTEREST_EVENTS
            .keys(deps.storage, start, None, Order::Ascending)
            .take(limit)
            .collect::<StdResult<_>>()?,
    };

    let events = ids
        .into_iter()
        .map(|id| {
            let record = INTEREST_EVENTS.load(deps.storage, id)?;
            Ok(InterestPaidEventResponse {
                id,
                account: record.account,
                amount: record.amount,
                timestamp: record.timestamp,
            })
        })
        .collect::<StdResult<Vec<_>>>()?;

    Ok(InterestPaidEventsResponse { events })
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::InvalidMigration {
            name: stored.contract,
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("method", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
