use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::traits::HoldingsProvider;
use crate::errors::CoreError;
use crate::models::holding::{Holding, HoldingId, NewHolding};
use crate::models::settings::Settings;

/// JSON-over-HTTP holdings store.
///
/// - `GET    {base}/{collection}`       → array of holdings
/// - `POST   {base}/{collection}`       → created holding (with id)
/// - `PUT    {base}/{collection}/{id}`  → stored holding
/// - `DELETE {base}/{collection}/{id}`  → status only
///
/// Any non-2xx status is reported as `CoreError::Api`.
pub struct RestHoldingsProvider {
    client: Client,
    collection_url: Url,
}

impl RestHoldingsProvider {
    pub fn new(settings: &Settings) -> Result<Self, CoreError> {
        let collection_url = settings.collection_url()?;
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = if settings.request_timeout_secs > 0 {
            builder.timeout(Duration::from_secs(settings.request_timeout_secs))
        } else {
            builder
        };
        let client = builder
            .build()
            .map_err(|e| CoreError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            collection_url,
        })
    }

    /// URL of the collection endpoint.
    #[must_use]
    pub fn collection_url(&self) -> &Url {
        &self.collection_url
    }

    /// URL of a single holding (`{collection}/{id}`).
    #[must_use]
    pub fn item_url(&self, id: &HoldingId) -> Url {
        let mut url = self.collection_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(&id.to_string());
        }
        url
    }

    async fn read_holding(resp: Response) -> Result<Holding, CoreError> {
        let body: Value = resp.error_for_status()?.json().await?;
        serde_json::from_value(body).map_err(|e| {
            CoreError::MalformedResponse(format!("expected a holding object: {e}"))
        })
    }
}

/// Decode the body of a collection fetch.
///
/// All or nothing: anything other than a JSON array is rejected as
/// malformed, and so is the whole array when any one record fails to
/// decode. The error names the first bad record's position.
pub fn parse_holdings_payload(payload: Value) -> Result<Vec<Holding>, CoreError> {
    let records = match payload {
        Value::Array(records) => records,
        other => {
            let kind = match other {
                Value::Null => "null",
                Value::Bool(_) => "a boolean",
                Value::Number(_) => "a number",
                Value::String(_) => "a string",
                Value::Object(_) => "an object",
                Value::Array(_) => "an array",
            };
            return Err(CoreError::MalformedResponse(format!(
                "expected an array of holdings, got {kind}"
            )));
        }
    };
    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| {
            serde_json::from_value(record).map_err(|e| {
                CoreError::MalformedResponse(format!("invalid holding record at index {idx}: {e}"))
            })
        })
        .collect()
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl HoldingsProvider for RestHoldingsProvider {
    fn name(&self) -> &str {
        "REST"
    }

    async fn list(&self) -> Result<Vec<Holding>, CoreError> {
        debug!(url = %self.collection_url, "GET holdings");
        let payload: Value = self
            .client
            .get(self.collection_url.clone())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        parse_holdings_payload(payload)
    }

    async fn create(&self, candidate: &NewHolding) -> Result<Holding, CoreError> {
        debug!(url = %self.collection_url, ticker = %candidate.ticker, "POST holding");
        let resp = self
            .client
            .post(self.collection_url.clone())
            .json(candidate)
            .send()
            .await?;
        Self::read_holding(resp).await
    }

    async fn update(&self, holding: &Holding) -> Result<Holding, CoreError> {
        let url = self.item_url(&holding.id);
        debug!(url = %url, "PUT holding");
        let resp = self.client.put(url).json(holding).send().await?;
        Self::read_holding(resp).await
    }

    async fn delete(&self, id: &HoldingId) -> Result<(), CoreError> {
        let url = self.item_url(id);
        debug!(url = %url, "DELETE holding");
        self.client.delete(url).send().await?.error_for_status()?;
        Ok(())
    }
}
