use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Item, Map};

#[cw_serde]
pub struct Config {
    /// Instantiating address, always privileged and never removable
    pub owner: Addr,
    /// The only native denomination the ledger accepts
    pub denom: String,
}

#[cw_serde]
pub struct Account {
    /// Principal plus capitalized interest
    pub balance: Uint128,
    /// Checkpoint (block seconds) of the last deposit
    pub last_interest_paid: u64,
}

#[cw_serde]
pub struct InterestPaid {
    pub account: Addr,
    pub amount: Uint128,
    pub timestamp: u64,
}

pub const CONFIG: Item<Config> = Item::new("config");

/// Annual interest rate in whole percent
pub const ANNUAL_RATE: Item<u64> = Item::new("annual_rate");

/// Admin flags. The owner is never stored here.
pub const ADMINS: Map<&Addr, bool> = Map::new("admins");

/// Ledger accounts indexed by address
pub const ACCOUNTS: Map<&Addr, Account> = Map::new("accounts");

/// Next interest event sequence number
pub const NEXT_EVENT_ID: Item<u64> = Item::new("next_event_id");

/// Append-only interest settlement log, in settlement order
pub const INTEREST_EVENTS: Map<u64, InterestPaid> = Map::new("interest_events");

/// Interest events by account (for queries)
pub const ACCOUNT_EVENTS: Map<(&Addr, u64), ()> = Map::new("account_events");
