//! Descriptive statistics over institution price expectations

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::InstitutionPrices;

/// Mean, median and range of the selected institution prices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionStats {
    pub avg: Decimal,
    pub median: Decimal,
    pub max: Decimal,
    pub min: Decimal,
}

impl InstitutionStats {
    /// Aggregate a list of prices, `None` when the list is empty
    pub fn from_values(values: &[Decimal]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort();

        let count = Decimal::from(sorted.len());
        let sum: Decimal = sorted.iter().sum();
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / dec!(2)
        } else {
            sorted[mid]
        };

        Some(Self {
            avg: sum / count,
            median,
            max: sorted[sorted.len() - 1],
            min: sorted[0],
        })
    }
}

impl std::fmt::Display for InstitutionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "avg {:.2} | median {:.2} | max {:.2} | min {:.2}",
            self.avg, self.median, self.max, self.min
        )
    }
}

/// Aggregate the prices of the selected institutions
///
/// Callers pass only institutions that are selected and priced above zero.
/// The result does not depend on map order.
pub fn aggregate(prices: &InstitutionPrices) -> Option<InstitutionStats> {
    let values: Vec<Decimal> = prices.values().copied().collect();
    InstitutionStats::from_values(&values)
}
