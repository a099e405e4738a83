//! Fixed-fractional position sizing
//!
//! Sizes a trade so that hitting the stop loses exactly `risk_percent` of
//! the account:
//!
//! - `loss = |entry - stop|`
//! - `risk_amount = account * risk_percent / 100`
//! - `position = risk_amount / loss`
//! - `rr = |target - entry| / loss`
//!
//! No bounds are enforced on the inputs. Negative or zero account and prices
//! go through the arithmetic unchanged.

use rust_decimal_macros::dec;

use super::types::{RiskAssessment, RiskError, RiskInputs};

/// Calculate position size and risk/reward for a trade
pub fn compute(inputs: &RiskInputs) -> Result<RiskAssessment, RiskError> {
    let loss = inputs
        .entry
        .checked_sub(inputs.stop)
        .ok_or(RiskError::Overflow("stop distance"))?
        .abs();

    if loss.is_zero() {
        return Err(RiskError::ZeroStopDistance);
    }

    let risk_amount = inputs
        .account
        .checked_mul(inputs.risk_percent)
        .and_then(|v| v.checked_div(dec!(100)))
        .ok_or(RiskError::Overflow("risk amount"))?;

    let position = risk_amount
        .checked_div(loss)
        .ok_or(RiskError::Overflow("position"))?;

    let reward = inputs
        .target
        .checked_sub(inputs.entry)
        .ok_or(RiskError::Overflow("reward distance"))?
        .abs();
    let rr = reward
        .checked_div(loss)
        .ok_or(RiskError::Overflow("risk/reward"))?;

    Ok(RiskAssessment {
        loss_per_unit: loss,
        risk_amount,
        position,
        rr,
    })
}
