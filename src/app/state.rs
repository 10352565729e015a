use std::sync::Arc;

use crate::mongo::manager::ConnectionManager;
use crate::mongo::store::Connector;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub connections: Arc<ConnectionManager>,
}

impl AppState {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            connections: Arc::new(ConnectionManager::new(connector)),
        }
    }
}
