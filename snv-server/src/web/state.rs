//! Application state for the web layer.

use std::sync::Arc;

use crate::resolver::{GeoProvider, SnvResolver};

/// Shared application state.
///
/// Wraps the resolver so every request shares its segment and version
/// caches.
pub struct AppState<P: GeoProvider> {
    pub resolver: Arc<SnvResolver<P>>,
}

// Manual impl: `P` itself need not be `Clone`
impl<P: GeoProvider> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            resolver: Arc::clone(&self.resolver),
        }
    }
}

impl<P: GeoProvider> AppState<P> {
    pub fn new(resolver: SnvResolver<P>) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }
}
