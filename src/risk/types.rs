//! Risk calculation types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Risk calculation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RiskError {
    /// Entry and stop are the same price, so the risk per unit is zero
    #[error("stop price must differ from entry price")]
    ZeroStopDistance,
    /// Decimal arithmetic overflowed
    #[error("arithmetic overflow computing {0}")]
    Overflow(&'static str),
}

/// Inputs to a position sizing calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskInputs {
    /// Account capital
    pub account: Decimal,
    /// Percent of account risked on the trade (2 = 2%)
    pub risk_percent: Decimal,
    /// Entry price
    pub entry: Decimal,
    /// Stop-loss price
    pub stop: Decimal,
    /// Take-profit price
    pub target: Decimal,
}

/// Result of a position sizing calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Price distance from entry to stop
    pub loss_per_unit: Decimal,
    /// Capital lost if the stop is hit
    pub risk_amount: Decimal,
    /// Quantity to trade
    pub position: Decimal,
    /// Reward distance over risk distance
    pub rr: Decimal,
}

impl std::fmt::Display for RiskAssessment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "position {:.2} | risk/reward {:.2}",
            self.position, self.rr
        )
    }
}
