use serde::{Deserialize, Serialize};

use super::holding::{Holding, HoldingId};

/// Raw input fields of the add/edit form, exactly as typed by the user.
///
/// Nothing here is validated; `HoldingsService::validate_form` turns it
/// into a `NewHolding` or a validation error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingForm {
    pub name: String,
    pub ticker: String,
    pub quantity: String,
    pub buy_price: String,
}

impl HoldingForm {
    pub fn new(
        name: impl Into<String>,
        ticker: impl Into<String>,
        quantity: impl Into<String>,
        buy_price: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ticker: ticker.into(),
            quantity: quantity.into(),
            buy_price: buy_price.into(),
        }
    }

    /// Pre-fill the form from a stored holding (entering edit mode).
    pub fn from_holding(holding: &Holding) -> Self {
        Self {
            name: holding.name.clone(),
            ticker: holding.ticker.clone(),
            quantity: holding.quantity.to_string(),
            buy_price: holding.buy_price.to_string(),
        }
    }

    /// `true` when every field is blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty()
            && self.ticker.trim().is_empty()
            && self.quantity.trim().is_empty()
            && self.buy_price.trim().is_empty()
    }
}

/// In-progress edit of an existing holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditBuffer {
    /// Holding being edited
    pub id: HoldingId,

    /// Price when editing started; the form has no price field
    pub current_price: Option<f64>,

    /// Edited field values
    pub form: HoldingForm,
}

impl EditBuffer {
    pub fn from_holding(holding: &Holding) -> Self {
        Self {
            id: holding.id.clone(),
            current_price: holding.current_price,
            form: HoldingForm::from_holding(holding),
        }
    }
}
