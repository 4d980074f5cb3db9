use serde::{Deserialize, Deserializer, Serialize};

/// Identifier assigned by the remote store when a holding is created.
///
/// Opaque to this library. Remote stores hand out either numeric or
/// string ids, so both shapes are kept as received and written back the
/// same way they came in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HoldingId {
    Number(u64),
    Text(String),
}

impl std::fmt::Display for HoldingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HoldingId::Number(n) => write!(f, "{n}"),
            HoldingId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<u64> for HoldingId {
    fn from(n: u64) -> Self {
        HoldingId::Number(n)
    }
}

impl From<&str> for HoldingId {
    fn from(s: &str) -> Self {
        HoldingId::Text(s.to_string())
    }
}

impl From<String> for HoldingId {
    fn from(s: String) -> Self {
        HoldingId::Text(s)
    }
}

/// One owned stock position, as stored by the remote.
///
/// `current_price` stays `None` until the remote populates it. Such
/// holdings are listed but never contribute to portfolio metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    /// Remote-assigned identifier, immutable once assigned
    pub id: HoldingId,

    /// Display name (e.g., "Apple Inc.")
    pub name: String,

    /// Ticker symbol (e.g., "AAPL")
    pub ticker: String,

    /// Number of units owned
    #[serde(deserialize_with = "lenient_number")]
    pub quantity: f64,

    /// Cost basis per unit
    #[serde(deserialize_with = "lenient_number")]
    pub buy_price: f64,

    /// Latest market price per unit, if known
    #[serde(default, deserialize_with = "lenient_optional_number")]
    pub current_price: Option<f64>,
}

impl Holding {
    /// A holding counts towards metrics only with a known, finite,
    /// positive price and a finite positive quantity.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.quantity.is_finite()
            && self.quantity > 0.0
            && matches!(self.current_price, Some(p) if p.is_finite() && p > 0.0)
    }

    /// `current_price * quantity`, or `None` while unpriced.
    #[must_use]
    pub fn market_value(&self) -> Option<f64> {
        self.current_price.map(|p| p * self.quantity)
    }

    /// Total amount paid: `buy_price * quantity`.
    #[must_use]
    pub fn cost_basis(&self) -> f64 {
        self.buy_price * self.quantity
    }

    /// Absolute gain/loss against the cost basis, or `None` while unpriced.
    #[must_use]
    pub fn gain_loss(&self) -> Option<f64> {
        self.market_value().map(|v| v - self.cost_basis())
    }

    /// Percentage return against the cost basis.
    /// `None` while unpriced or when the cost basis is zero.
    #[must_use]
    pub fn return_pct(&self) -> Option<f64> {
        let cost = self.cost_basis();
        if cost <= 0.0 {
            return None;
        }
        self.gain_loss().map(|g| g / cost * 100.0)
    }
}

/// A validated holding that has not been stored yet.
///
/// Serialized as the body of a create request: no `id`, and
/// `currentPrice` explicitly `null` so the remote fills it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHolding {
    pub name: String,
    pub ticker: String,
    pub quantity: f64,
    pub buy_price: f64,
    pub current_price: Option<f64>,
}

impl NewHolding {
    /// Attach an id, producing the full record sent on update.
    #[must_use]
    pub fn with_id(self, id: HoldingId, current_price: Option<f64>) -> Holding {
        Holding {
            id,
            name: self.name,
            ticker: self.ticker,
            quantity: self.quantity,
            buy_price: self.buy_price,
            current_price,
        }
    }
}

// ── Lenient numeric fields ──────────────────────────────────────────
//
// Web forms post numbers as strings, and remote stores keep whatever
// they were given. Accept both `12.5` and `"12.5"`, but only finite
// values. A blank string means "absent" for the nullable price and is an
// error everywhere else.

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        let n = match self {
            NumberOrString::Number(n) => n,
            NumberOrString::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => n,
                Ok(_) => return Err(E::custom(format!("expected a finite number, got \"{s}\""))),
                Err(_) => return Err(E::custom(format!("expected a number, got \"{s}\""))),
            },
        };
        Ok(n)
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    NumberOrString::deserialize(deserializer)?.into_f64()
}

fn lenient_optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(v) => v.into_f64().map(Some),
    }
}
