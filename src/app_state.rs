//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::{Customer, Hotel};
use crate::persistence::{MemoryStore, RecordStore};
use crate::render::{HtmlRenderer, Renderer};
use crate::service::RecordService;
use crate::storage::BlobStore;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Hotel operations.
    pub hotels: Arc<RecordService<Hotel>>,
    /// Customer operations.
    pub customers: Arc<RecordService<Customer>>,
    /// Page renderer.
    pub renderer: Arc<dyn Renderer>,
}

impl AppState {
    /// Wires both record services to their stores and a shared blob store,
    /// rendering with [`HtmlRenderer`].
    #[must_use]
    pub fn new(
        hotel_store: Arc<dyn RecordStore<Hotel>>,
        customer_store: Arc<dyn RecordStore<Customer>>,
        blobs: Arc<dyn BlobStore>,
        page_size: u32,
    ) -> Self {
        Self {
            hotels: Arc::new(RecordService::new(
                hotel_store,
                Arc::clone(&blobs),
                page_size,
            )),
            customers: Arc::new(RecordService::new(customer_store, blobs, page_size)),
            renderer: Arc::new(HtmlRenderer),
        }
    }

    /// State backed by empty in-memory stores.
    #[must_use]
    pub fn in_memory(blobs: Arc<dyn BlobStore>, page_size: u32) -> Self {
        Self::new(
            Arc::new(MemoryStore::<Hotel>::new()),
            Arc::new(MemoryStore::<Customer>::new()),
            blobs,
            page_size,
        )
    }

    /// Replaces the page renderer.
    #[must_use]
    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }
}
