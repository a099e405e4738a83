//! Risk management module
//!
//! Position sizing and risk/reward for a single planned trade

mod calculator;
mod types;

pub use calculator::compute;
pub use types::{RiskAssessment, RiskError, RiskInputs};
