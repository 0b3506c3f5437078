//! Shared application state injected into HTTP handlers.

use std::sync::Arc;

use crate::application::services::LinkService;
use crate::domain::click_worker::ClickDispatcher;
use crate::domain::repositories::LinkRepository;

/// State shared by every request.
///
/// Cheap to clone: every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub click_dispatcher: ClickDispatcher,
    /// Prefix for short URLs in responses, without trailing slash.
    pub base_url: Arc<str>,
}

impl AppState {
    pub fn new(link_service: Arc<LinkService<dyn LinkRepository>>, base_url: &str) -> Self {
        let click_dispatcher = link_service.click_dispatcher().clone();
        Self {
            link_service,
            click_dispatcher,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    /// Public URL for `code`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }
}
