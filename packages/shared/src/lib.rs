// Interest accrual math shared by the ledger contracts on CosmWasm

use cosmwasm_std::{CheckedMultiplyRatioError, Uint128};

/// 365 days
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// Seconds elapsed since a checkpoint. A checkpoint in the future counts as zero.
pub fn elapsed_seconds(checkpoint: u64, as_of: u64) -> u64 {
    as_of.saturating_sub(checkpoint)
}

/// Simple interest owed on `principal` at `annual_rate` percent over `elapsed` seconds.
///
/// `principal * annual_rate * elapsed / (100 * SECONDS_PER_YEAR)`, rounded down.
/// The product is taken in 256-bit space, so only a result that does not fit
/// in `Uint128` is reported as an error.
pub fn simple_interest(
    principal: Uint128,
    annual_rate: u64,
    elapsed: u64,
) -> Result<Uint128, CheckedMultiplyRatioError> {
    let numerator = u128::from(annual_rate) * u128::from(elapsed);
    let denominator = 100u128 * u128::from(SECONDS_PER_YEAR);
    principal.checked_multiply_ratio(numerator, denominator)
}

/// Interest accrued between `checkpoint` and `as_of`.
pub fn accrued_interest(
    principal: Uint128,
    annual_rate: u64,
    checkpoint: u64,
    as_of: u64,
) -> Result<Uint128, CheckedMultiplyRatioError> {
    simple_interest(principal, annual_rate, elapsed_seconds(checkpoint, as_of))
}
