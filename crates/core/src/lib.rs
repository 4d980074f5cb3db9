pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use chrono::{DateTime, Utc};
use models::{
    analytics::PortfolioMetrics,
    chart::ChartSeries,
    form::{EditBuffer, HoldingForm},
    holding::{Holding, HoldingId},
    settings::Settings,
};
use providers::{rest::RestHoldingsProvider, traits::HoldingsProvider};
use services::{
    chart_service::ChartService, holdings_service::HoldingsService,
    metrics_service::MetricsService,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use errors::CoreError;

/// A remote round-trip issued by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Load,
    Add,
    Update,
    Delete,
}

impl std::fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreOperation::Load => write!(f, "load"),
            StoreOperation::Add => write!(f, "add"),
            StoreOperation::Update => write!(f, "update"),
            StoreOperation::Delete => write!(f, "delete"),
        }
    }
}

/// Whether the store is waiting on the remote.
///
/// While an operation is in flight the holdings and metrics may not match
/// the remote yet. Errors are reported separately (`last_error`), never
/// through this status. Observers that cannot borrow the store while an
/// operation runs follow it through `HoldingsStore::subscribe_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreStatus {
    #[default]
    Idle,
    InFlight(StoreOperation),
}

/// Main entry point for the stock dashboard core library.
///
/// Single source of truth for the holdings collection, the form and edit
/// buffers, the visible error and the derived metrics. Every mutation
/// goes through the remote first; the local collection only changes once
/// the remote has answered successfully, and metrics are recomputed from
/// the resulting collection every time it changes.
#[must_use]
pub struct HoldingsStore {
    provider: Box<dyn HoldingsProvider>,
    holdings: Vec<Holding>,
    /// `None` until the first successful load; distinct from empty metrics.
    metrics: Option<PortfolioMetrics>,
    form: HoldingForm,
    edit: Option<EditBuffer>,
    status: watch::Sender<StoreStatus>,
    last_error: Option<CoreError>,
    last_synced: Option<DateTime<Utc>>,
    holdings_service: HoldingsService,
    metrics_service: MetricsService,
    chart_service: ChartService,
}

impl std::fmt::Debug for HoldingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HoldingsStore")
            .field("provider", &self.provider.name())
            .field("holdings", &self.holdings.len())
            .field("metrics_computed", &self.metrics.is_some())
            .field("editing", &self.edit.as_ref().map(|e| &e.id))
            .field("status", &self.status())
            .field("last_error", &self.last_error)
            .finish()
    }
}

impl HoldingsStore {
    /// Create an empty store backed by `provider`. Nothing is fetched
    /// until `load()` is called.
    pub fn new(provider: Box<dyn HoldingsProvider>) -> Self {
        Self {
            provider,
            holdings: Vec::new(),
            metrics: None,
            form: HoldingForm::default(),
            edit: None,
            status: watch::Sender::new(StoreStatus::Idle),
            last_error: None,
            last_synced: None,
            holdings_service: HoldingsService::new(),
            metrics_service: MetricsService::new(),
            chart_service: ChartService::new(),
        }
    }

    /// Create a store talking to the REST backend described by `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self, CoreError> {
        let provider = RestHoldingsProvider::new(settings)?;
        Ok(Self::new(Box::new(provider)))
    }

    /// Replace the chart color assignment (e.g., a themed palette).
    pub fn with_chart_service(mut self, chart_service: ChartService) -> Self {
        self.chart_service = chart_service;
        self
    }

    // ── Remote operations ───────────────────────────────────────────

    /// Fetch the whole collection and replace the local one with it.
    ///
    /// On failure the collection is emptied and metrics go back to
    /// "not computed".
    pub async fn load(&mut self) -> Result<(), CoreError> {
        let result = {
            let _in_flight = self.begin(StoreOperation::Load);
            self.provider.list().await
        };

        match result {
            Ok(holdings) => {
                info!(count = holdings.len(), "holdings loaded");
                self.holdings = holdings;
                self.last_synced = Some(Utc::now());
                self.succeed();
                Ok(())
            }
            Err(e) => {
                self.holdings.clear();
                self.metrics = None;
                Err(self.fail(CoreError::Load(e.to_string())))
            }
        }
    }

    /// Re-fetch the collection to pick up price changes.
    pub async fn refresh(&mut self) -> Result<(), CoreError> {
        self.load().await
    }

    /// Validate `candidate` and create it remotely.
    ///
    /// Invalid input never reaches the remote. On success the stored
    /// record (with its new id) is appended and the form is cleared.
    pub async fn add(&mut self, candidate: &HoldingForm) -> Result<Holding, CoreError> {
        let new_holding = match self.holdings_service.validate_form(candidate) {
            Ok(h) => h,
            Err(e) => return Err(self.fail(e)),
        };

        let result = {
            let _in_flight = self.begin(StoreOperation::Add);
            self.provider.create(&new_holding).await
        };

        match result {
            Ok(created) => {
                info!(id = %created.id, ticker = %created.ticker, "holding added");
                self.holdings_service.append(&mut self.holdings, created.clone());
                self.form = HoldingForm::default();
                self.succeed();
                Ok(created)
            }
            Err(e) => Err(self.fail(CoreError::Add(e.to_string()))),
        }
    }

    /// Submit the store's own form buffer through `add`.
    pub async fn submit_form(&mut self) -> Result<Holding, CoreError> {
        let form = self.form.clone();
        self.add(&form).await
    }

    /// Validate `edited` and store it under `id`, which must already be
    /// in the collection.
    ///
    /// The local entry is replaced by the record the remote returns, not
    /// by the submitted one. Edit mode for `id` ends only on success.
    pub async fn update(
        &mut self,
        id: &HoldingId,
        edited: &HoldingForm,
    ) -> Result<Holding, CoreError> {
        let Some(current_price) = self.holding(id).map(|h| h.current_price) else {
            return Err(self.fail(CoreError::Validation(format!("no holding with id {id}"))));
        };
        let record = match self.holdings_service.validate_form(edited) {
            Ok(h) => h.with_id(id.clone(), current_price),
            Err(e) => return Err(self.fail(e)),
        };

        let result = {
            let _in_flight = self.begin(StoreOperation::Update);
            self.provider.update(&record).await
        };

        match result {
            Ok(stored) => {
                let replaced = self
                    .holdings_service
                    .replace(&mut self.holdings, id, stored.clone());
                info!(id = %id, replaced, "holding updated");
                if self.edit.as_ref().is_some_and(|e| &e.id == id) {
                    self.edit = None;
                }
                self.succeed();
                Ok(stored)
            }
            Err(e) => Err(self.fail(CoreError::Update(e.to_string()))),
        }
    }

    /// Submit the edit buffer through `update`.
    pub async fn save_edit(&mut self) -> Result<Holding, CoreError> {
        let Some(buffer) = self.edit.clone() else {
            return Err(self.fail(CoreError::Validation("no holding is being edited".into())));
        };
        self.update(&buffer.id, &buffer.form).await
    }

    /// Delete the holding with `id` remotely, then locally.
    ///
    /// An id that is not in the collection is a no-op once the remote
    /// reports success.
    pub async fn remove(&mut self, id: &HoldingId) -> Result<(), CoreError> {
        let result = {
            let _in_flight = self.begin(StoreOperation::Delete);
            self.provider.delete(id).await
        };

        match result {
            Ok(()) => {
                let removed = self.holdings_service.remove(&mut self.holdings, id);
                info!(id = %id, removed, "holding deleted");
                if self.edit.as_ref().is_some_and(|e| &e.id == id) {
                    self.edit = None;
                }
                self.succeed();
                Ok(())
            }
            Err(e) => Err(self.fail(CoreError::Delete(e.to_string()))),
        }
    }

    // ── Edit buffer ─────────────────────────────────────────────────

    /// Enter edit mode for `id`, pre-filling the buffer from the stored
    /// holding. Replaces any edit already in progress.
    pub fn begin_edit(&mut self, id: &HoldingId) -> Result<(), CoreError> {
        match self.holding(id).map(EditBuffer::from_holding) {
            Some(buffer) => {
                debug!(id = %id, "edit started");
                self.edit = Some(buffer);
                Ok(())
            }
            None => Err(self.fail(CoreError::Validation(format!("no holding with id {id}")))),
        }
    }

    /// Discard the edit in progress without contacting the remote.
    pub fn cancel_edit(&mut self) {
        if let Some(buffer) = self.edit.take() {
            debug!(id = %buffer.id, "edit cancelled");
        }
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    #[must_use]
    pub fn edit_buffer(&self) -> Option<&EditBuffer> {
        self.edit.as_ref()
    }

    /// Mutable access to the edit form, if editing.
    pub fn edit_form_mut(&mut self) -> Option<&mut HoldingForm> {
        self.edit.as_mut().map(|e| &mut e.form)
    }

    // ── Form buffer ─────────────────────────────────────────────────

    #[must_use]
    pub fn form(&self) -> &HoldingForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut HoldingForm {
        &mut self.form
    }

    // ── Readers ─────────────────────────────────────────────────────

    /// The current collection, in remote order plus local appends.
    #[must_use]
    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    /// Get a single holding by its id.
    #[must_use]
    pub fn holding(&self, id: &HoldingId) -> Option<&Holding> {
        self.holdings_service.find(&self.holdings, id)
    }

    /// Metrics for the current collection; `None` before the first
    /// successful load or after a failed one.
    #[must_use]
    pub fn metrics(&self) -> Option<&PortfolioMetrics> {
        self.metrics.as_ref()
    }

    /// Pie-chart series for the current metrics. Empty when nothing is
    /// computed or nothing is eligible.
    #[must_use]
    pub fn chart_series(&self) -> ChartSeries {
        self.metrics
            .as_ref()
            .map(|m| self.chart_service.distribution_series(m))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn status(&self) -> StoreStatus {
        *self.status.borrow()
    }

    /// Follow status changes, including while an operation holds the
    /// store. Receivers outlive the store; they then see its last status.
    #[must_use]
    pub fn subscribe_status(&self) -> watch::Receiver<StoreStatus> {
        self.status.subscribe()
    }

    /// `true` while a remote call is outstanding.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.status() != StoreStatus::Idle
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&CoreError> {
        self.last_error.as_ref()
    }

    /// The message to show the user, if the last operation failed.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.last_error.as_ref().map(ToString::to_string)
    }

    /// Dismiss the visible error.
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// When the collection was last fetched successfully.
    #[must_use]
    pub fn last_synced(&self) -> Option<DateTime<Utc>> {
        self.last_synced
    }

    /// Export the collection as JSON (for debugging/display).
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.holdings)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize holdings: {e}")))
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Mark `operation` in flight until the returned guard is dropped,
    /// whether the remote answered or the caller gave up on the future.
    fn begin(&self, operation: StoreOperation) -> InFlight<'_> {
        debug!(%operation, provider = self.provider.name(), "remote call started");
        self.status.send_replace(StoreStatus::InFlight(operation));
        InFlight {
            status: &self.status,
            operation,
        }
    }

    /// Recompute metrics from the collection as it is now and clear the
    /// previous error.
    fn succeed(&mut self) {
        self.metrics = Some(self.metrics_service.compute(&self.holdings));
        self.last_error = None;
    }

    fn fail(&mut self, error: CoreError) -> CoreError {
        warn!(%error, "holdings store operation failed");
        self.last_error = Some(error.clone());
        error
    }
}

/// Resets the store status to `Idle` when dropped.
struct InFlight<'a> {
    status: &'a watch::Sender<StoreStatus>,
    operation: StoreOperation,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        debug!(operation = %self.operation, "remote call settled");
        self.status.send_replace(StoreStatus::Idle);
    }
}
