use crate::source::AnalyticsSource;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn AnalyticsSource>,
}

impl AppState {
    pub fn new(source: impl AnalyticsSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }
}
