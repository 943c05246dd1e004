//! Shared application state injected into every handler.

use std::sync::Arc;

use textline_core::service::MessagingService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MessagingService>,
}

impl AppState {
    pub fn new(service: MessagingService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
