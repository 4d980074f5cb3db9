use crate::models::analytics::PortfolioMetrics;
use crate::models::chart::ChartSeries;

/// Base palette for distribution slices.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f",
    "#edc948", "#b07aa1", "#ff9da7", "#9c755f", "#bab0ac",
];

/// Hue step for colors beyond the palette (golden angle, in degrees).
const GOLDEN_ANGLE: f64 = 137.507_764;

/// Turns computed metrics into chart-ready series.
///
/// The core computes all the numbers — the frontend only renders.
/// Colors are assigned by position, so the same distribution always
/// renders the same way.
pub struct ChartService {
    palette: Vec<String>,
}

impl ChartService {
    pub fn new() -> Self {
        Self::with_palette(DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect())
    }

    /// Use a custom base palette. An empty palette falls back to
    /// generated colors for every entry.
    pub fn with_palette(palette: Vec<String>) -> Self {
        Self { palette }
    }

    /// Build the pie-chart series for a distribution: one label, value
    /// and color per entry, in distribution order.
    pub fn distribution_series(&self, metrics: &PortfolioMetrics) -> ChartSeries {
        let mut series = ChartSeries {
            labels: Vec::with_capacity(metrics.distribution.len()),
            values: Vec::with_capacity(metrics.distribution.len()),
            colors: Vec::with_capacity(metrics.distribution.len()),
        };

        for (idx, entry) in metrics.distribution.iter().enumerate() {
            series.labels.push(entry.holding.name.clone());
            series.values.push(entry.percentage);
            series.colors.push(self.color_at(idx));
        }

        series
    }

    /// Color for the `idx`-th slice.
    pub fn color_at(&self, idx: usize) -> String {
        if let Some(color) = self.palette.get(idx) {
            return color.clone();
        }
        let offset = idx - self.palette.len();
        let hue = ((offset as f64 + 1.0) * GOLDEN_ANGLE) % 360.0;
        hsl_to_hex(hue, 0.62, 0.52)
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

/// HSL (hue in degrees, saturation and lightness in 0..=1) to `#rrggbb`.
fn hsl_to_hex(hue: f64, saturation: f64, lightness: f64) -> String {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = hue / 60.0;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    format!("#{:02x}{:02x}{:02x}", channel(r), channel(g), channel(b))
}
