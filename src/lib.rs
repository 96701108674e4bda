//! Racing fence installation pricing service.
//!
//! Library half of the service: pricing engines, record store, cache and the
//! axum application. The binary in `main.rs` wires configuration to it.

pub mod cache;
pub mod config;
pub mod error;
pub mod pricing;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::cache::AppCache;
use crate::pricing::reference::ReferenceData;
use crate::pricing::store::RecordStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub cache: AppCache,
    pub reference: Arc<ReferenceData>,
    /// Largest listing the calculations endpoints return
    pub listing_limit: i64,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RecordStore>,
        cache: AppCache,
        reference: Arc<ReferenceData>,
        listing_limit: i64,
    ) -> Self {
        Self {
            store,
            cache,
            reference,
            listing_limit,
        }
    }
}

/// Build the HTTP application
pub fn app(state: AppState, cors_origins: &[String]) -> Router {
    pricing::router()
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the configured origins; `*` allows any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
                None
            }
        })
        .collect();

    layer.allow_origin(allowed)
}
