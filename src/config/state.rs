// Application state module
// Shared, read-only state handed to every request

use std::sync::Arc;

use super::types::Config;
use crate::store::FileStore;

/// Application state
///
/// Built once at startup. Requests only read from it, so no locking is needed;
/// the store itself must support concurrent opens.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn FileStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn FileStore>) -> Self {
        Self { config, store }
    }
}
