use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::holding::{Holding, HoldingId, NewHolding};

/// Trait abstraction over the remote holdings store.
///
/// The store only ever talks to this trait, so the HTTP backend can be
/// swapped (or mocked in tests) without touching any state logic.
/// Each call resolves exactly once, with the remote result or an error.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait HoldingsProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch the whole collection.
    async fn list(&self) -> Result<Vec<Holding>, CoreError>;

    /// Store a new holding and return it with its assigned id.
    async fn create(&self, candidate: &NewHolding) -> Result<Holding, CoreError>;

    /// Replace the stored holding with `holding.id` and return the stored result.
    async fn update(&self, holding: &Holding) -> Result<Holding, CoreError>;

    /// Delete by id. Succeeds when the remote reports success, even if
    /// nothing was stored under that id.
    async fn delete(&self, id: &HoldingId) -> Result<(), CoreError>;
}
