use prospect_core::{BroadcastHub, RecordStore};
use std::sync::Arc;

/// Shared state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    /// The live record store, shared with the ingestion pipeline.
    pub store: Arc<RecordStore>,
    /// Fan-out point for live feed events.
    pub hub: BroadcastHub,
}

impl AppState {
    /// Bundle the shared store and hub for the router.
    pub fn new(store: Arc<RecordStore>, hub: BroadcastHub) -> Self {
        Self { store, hub }
    }
}
