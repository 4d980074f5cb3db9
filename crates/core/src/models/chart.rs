use serde::{Deserialize, Serialize};

/// Chart-ready distribution series.
///
/// The core computes everything; the charting layer just renders the
/// three parallel vectors. They always have the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Holding display names
    pub labels: Vec<String>,

    /// Percentage of the portfolio value per label
    pub values: Vec<f64>,

    /// CSS hex colors (`#rrggbb`), one per label
    pub colors: Vec<String>,
}

impl ChartSeries {
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
