use std::sync::Arc;

use crate::config::Config;
use crate::generation::WordDetailGenerator;
use crate::layout::{FontSet, PageConfig};

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything in here is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub generator: WordDetailGenerator,
    pub config: Config,
    /// Fonts for PDF export. The meaning font is optional; see `FontSet`.
    pub fonts: Arc<FontSet>,
    pub page_config: PageConfig,
}
