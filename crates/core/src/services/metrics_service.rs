use crate::models::analytics::{DistributionEntry, PortfolioMetrics};
use crate::models::holding::Holding;

/// Derives portfolio metrics from a holdings collection.
///
/// Pure business logic — no I/O, no state. The same input always gives
/// the same output and the input is never modified.
pub struct MetricsService;

impl MetricsService {
    pub fn new() -> Self {
        Self
    }

    /// Compute total value, top holding and percentage distribution.
    ///
    /// Only eligible holdings (known positive price, positive quantity)
    /// are considered. With none eligible the result is
    /// `PortfolioMetrics::empty()`, so the division below never sees a
    /// zero total.
    pub fn compute(&self, holdings: &[Holding]) -> PortfolioMetrics {
        // (holding, price, market value)
        let eligible: Vec<(&Holding, f64, f64)> = holdings
            .iter()
            .filter(|h| h.is_eligible())
            .filter_map(|h| h.current_price.map(|p| (h, p, p * h.quantity)))
            .collect();

        if eligible.is_empty() {
            return PortfolioMetrics::empty();
        }

        let total_value: f64 = eligible.iter().map(|(_, _, value)| value).sum();
        let total_cost: f64 = eligible.iter().map(|(h, _, _)| h.cost_basis()).sum();

        // Strictly greater only, so the first of several equal prices wins.
        let mut top = eligible[0];
        for candidate in &eligible[1..] {
            if candidate.1 > top.1 {
                top = *candidate;
            }
        }

        let distribution = eligible
            .iter()
            .map(|(h, _, value)| DistributionEntry {
                holding: (*h).clone(),
                percentage: value / total_value * 100.0,
            })
            .collect();

        PortfolioMetrics {
            total_value,
            top_holding: Some(top.0.clone()),
            distribution,
            total_cost,
            total_gain_loss: total_value - total_cost,
            eligible_count: eligible.len(),
        }
    }
}

impl Default for MetricsService {
    fn default() -> Self {
        Self::new()
    }
}
