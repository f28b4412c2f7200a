// PDF export: text wrapping, pagination, and serialization.
// Layout is CPU-bound; HTTP handlers run `export` inside tokio::task::spawn_blocking.

pub mod font_metrics;
pub mod handlers;
pub mod paginator;
pub mod pdf;
pub mod wrap;

use thiserror::Error;
use tracing::info;

use crate::models::word::WordDetail;

pub use font_metrics::{default_page_config, EmbeddedFont, FontSet, PageConfig};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export")]
    Empty,

    #[error("failed to render document: {0}")]
    Render(String),
}

/// A finished export, ready to download.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// The meaning font was unavailable; the caller should tell the user.
    pub font_fallback: bool,
}

/// Lays out and serializes `records` into one PDF.
///
/// Either the complete document is returned or an error is; there is no partial
/// output.
pub fn export(
    records: &[WordDetail],
    title: &str,
    fonts: &FontSet,
    config: &PageConfig,
    filename: &str,
) -> Result<ExportedDocument, ExportError> {
    let layout = paginator::layout_document(records, title, fonts, config)?;
    let bytes = pdf::render_pdf(&layout, fonts, config)?;

    info!(
        records = records.len(),
        pages = layout.pages.len(),
        bytes = bytes.len(),
        font_fallback = layout.font_fallback,
        "PDF export complete"
    );

    Ok(ExportedDocument {
        filename: filename.to_string(),
        bytes,
        page_count: layout.pages.len(),
        font_fallback: layout.font_fallback,
    })
}
