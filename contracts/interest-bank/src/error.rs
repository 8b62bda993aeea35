use cosmwasm_std::{CheckedMultiplyRatioError, OverflowError, StdError};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Amount must be greater than zero")]
    InvalidAmount {},

    #[error("Denomination must not be empty")]
    InvalidDenom {},

    #[error("Unsupported denomination: {denom}")]
    UnsupportedDenom { denom: String },

    #[error("Insufficient balance")]
    InsufficientBalance {},

    #[error("Cannot remove the owner")]
    CannotRemoveOwner {},

    #[error("Cannot remove yourself")]
    CannotRemoveSelf {},

    #[error("Arithmetic overflow")]
    ArithmeticOverflow {},

    #[error("Cannot migrate from contract {name}")]
    InvalidMigration { name: String },
}

impl From<OverflowError> for ContractError {
    fn from(_: OverflowError) -> Self {
        ContractError::ArithmeticOverflow {}
    }
}

impl From<CheckedMultiplyRatioError> for ContractError {
    fn from(_: CheckedMultiplyRatioError) -> Self {
        ContractError::ArithmeticOverflow {}
    }
}
