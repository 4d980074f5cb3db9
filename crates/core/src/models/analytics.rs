use serde::{Deserialize, Serialize};

use super::holding::Holding;

/// Aggregate figures derived from the eligible holdings of a collection.
///
/// Always recomputed as a whole from the current collection; never patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioMetrics {
    /// Sum of `current_price * quantity` over eligible holdings
    pub total_value: f64,

    /// Eligible holding with the highest current price (first one on ties)
    pub top_holding: Option<Holding>,

    /// Share of `total_value` per eligible holding, in input order
    pub distribution: Vec<DistributionEntry>,

    /// Sum of `buy_price * quantity` over eligible holdings
    pub total_cost: f64,

    /// `total_value - total_cost`
    pub total_gain_loss: f64,

    /// Number of holdings that contributed to these figures
    pub eligible_count: usize,
}

impl PortfolioMetrics {
    /// The canonical "nothing to measure" value: zero total, no top
    /// holding, empty distribution.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distribution.is_empty()
    }

    /// Percentage return of the eligible holdings against their cost.
    #[must_use]
    pub fn total_return_pct(&self) -> f64 {
        if self.total_cost > 0.0 {
            self.total_gain_loss / self.total_cost * 100.0
        } else {
            0.0
        }
    }
}

/// One slice of the portfolio distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionEntry {
    pub holding: Holding,

    /// Share of the portfolio value, 0–100
    pub percentage: f64,
}
