use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128};

#[cw_serde]
pub struct InstantiateMsg {
    /// Native denomination held by the ledger
    pub denom: String,
    /// Initial annual interest rate in percent (default 0)
    pub annual_rate: Option<u64>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Deposit the attached funds, settling pending interest first
    Deposit {},
    /// Withdraw from the caller's balance without settling interest
    Withdraw { amount: Uint128 },
    /// Set the annual interest rate (owner or admin)
    SetAnnualInterestRate { rate: u64 },
    /// Grant admin rights (owner or admin)
    AddAdmin { address: String },
    /// Revoke admin rights (owner or admin)
    RemoveAdmin { address: String },
}

#[cw_serde]
pub struct MigrateMsg {}

/// Queries carry no sender, so the querying identity is passed as `caller`.
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Caller's own balance
    #[returns(BalanceResponse)]
    Balance { caller: String },

    /// Any user's balance (owner or admin)
    #[returns(BalanceResponse)]
    UserBalance { caller: String, user: String },

    /// Caller's pending interest
    #[returns(InterestResponse)]
    MyInterest { caller: String },

    /// Any user's pending interest (owner or admin)
    #[returns(InterestResponse)]
    UserInterest { caller: String, user: String },

    /// Any user's last interest checkpoint (owner or admin)
    #[returns(LastInterestPaidResponse)]
    UserLastInterestPaid { caller: String, user: String },

    #[returns(RateResponse)]
    AnnualInterestRate {},

    /// Raw admin flag of an address
    #[returns(AdminResponse)]
    IsAdmin { address: String },

    #[returns(ConfigResponse)]
    Config {},

    /// Current admins, ascending by address
    #[returns(AdminsResponse)]
    Admins {
        start_after: Option<String>,
        limit: Option<u32>,
    },

    /// Settled interest records, optionally for one account
    #[returns(InterestPaidEventsResponse)]
    InterestPaidEvents {
        account: Option<String>,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
}

// Response types

#[cw_serde]
pub struct BalanceResponse {
    pub balance: Uint128,
}

#[cw_serde]
pub struct InterestResponse {
    pub interest: Uint128,
}

#[cw_serde]
pub struct LastInterestPaidResponse {
    pub timestamp: u64,
}

#[cw_serde]
pub struct RateResponse {
    pub rate: u64,
}

#[cw_serde]
pub struct AdminResponse {
    pub is_admin: bool,
}

#[cw_serde]
pub struct ConfigResponse {
    pub owner: Addr,
    pub denom: String,
}

#[cw_serde]
pub struct AdminsResponse {
    pub admins: Vec<Addr>,
}

#[cw_serde]
pub struct InterestPaidEventResponse {
    pub id: u64,
    pub account: Addr,
    pub amount: Uint128,
    pub timestamp: u64,
}

#[cw_serde]
pub struct InterestPaidEventsResponse {
    pub events: Vec<InterestPaidEventResponse>,
}
