use crate::errors::CoreError;
use crate::models::form::HoldingForm;
use crate::models::holding::{Holding, HoldingId, NewHolding};

/// Validates form input and applies remote results to a holdings list.
///
/// Pure business logic — no I/O, no API calls. Easy to test.
pub struct HoldingsService;

impl HoldingsService {
    pub fn new() -> Self {
        Self
    }

    /// Validate raw form input.
    ///
    /// Rules:
    /// - name, ticker, quantity and buy price must all be filled in
    /// - quantity and buy price must be finite numbers greater than zero
    ///
    /// The resulting candidate has no price; the remote fills it in.
    pub fn validate_form(&self, form: &HoldingForm) -> Result<NewHolding, CoreError> {
        let name = required(&form.name, "name")?;
        let ticker = required(&form.ticker, "ticker")?;
        let quantity = positive_number(&form.quantity, "quantity")?;
        let buy_price = positive_number(&form.buy_price, "buy price")?;

        Ok(NewHolding {
            name: name.to_string(),
            ticker: ticker.to_string(),
            quantity,
            buy_price,
            current_price: None,
        })
    }

    /// Append a freshly created holding.
    /// A record whose id is already present replaces the old one instead,
    /// keeping ids unique.
    pub fn append(&self, holdings: &mut Vec<Holding>, created: Holding) {
        match holdings.iter().position(|h| h.id == created.id) {
            Some(idx) => holdings[idx] = created,
            None => holdings.push(created),
        }
    }

    /// Replace the holding stored under `id` with `updated`, keeping its
    /// position. The remote may normalize the record, so `updated` wins
    /// field by field, including its id. Any other entry already carrying
    /// the returned id is dropped, keeping ids unique.
    /// Returns `false` when no holding has that id.
    pub fn replace(&self, holdings: &mut Vec<Holding>, id: &HoldingId, updated: Holding) -> bool {
        let Some(idx) = holdings.iter().position(|h| &h.id == id) else {
            return false;
        };
        let duplicate = holdings
            .iter()
            .enumerate()
            .position(|(i, h)| i != idx && h.id == updated.id);
        holdings[idx] = updated;
        if let Some(dup) = duplicate {
            holdings.remove(dup);
        }
        true
    }

    /// Remove the holding with `id`. Returns `false` when it was absent.
    pub fn remove(&self, holdings: &mut Vec<Holding>, id: &HoldingId) -> bool {
        let before = holdings.len();
        holdings.retain(|h| &h.id != id);
        holdings.len() != before
    }

    /// Find a holding by id.
    pub fn find<'a>(&self, holdings: &'a [Holding], id: &HoldingId) -> Option<&'a Holding> {
        holdings.iter().find(|h| &h.id == id)
    }
}

impl Default for HoldingsService {
    fn default() -> Self {
        Self::new()
    }
}

fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(trimmed)
}

fn positive_number(value: &str, field: &str) -> Result<f64, CoreError> {
    let raw = required(value, field)?;
    let number: f64 = raw
        .parse()
        .map_err(|_| CoreError::Validation(format!("{field} must be a number, got '{raw}'")))?;
    if !number.is_finite() || number <= 0.0 {
        return Err(CoreError::Validation(format!(
            "{field} must be greater than zero, got {raw}"
        )));
    }
    Ok(number)
}
