//! Axum route handler for PDF export.

use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::layout::export;
use crate::models::word::WordDetail;
use crate::state::AppState;

/// Header carrying a user-facing note about the export, e.g. a font fallback.
pub const EXPORT_NOTICE_HEADER: &str = "x-export-notice";

const FONT_FALLBACK_NOTICE: &str =
    "Meaning font is not loaded; non-Latin characters may not display correctly in this PDF.";

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub title: Option<String>,
    pub records: Vec<WordDetail>,
}

/// POST /api/v1/export/pdf
///
/// Returns the PDF as an attachment. An empty record list is a 422
/// `NOTHING_TO_EXPORT`; a layout or serialization failure is a 500
/// `EXPORT_FAILED` with no body bytes.
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let title = request
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| state.config.page_title.clone());
    let fonts = state.fonts.clone();
    let page_config = state.page_config.clone();
    let filename = state.config.export_filename.clone();
    let records = request.records;

    // Layout and serialization are CPU-bound; keep them off the executor.
    let exported = tokio::task::spawn_blocking(move || {
        export(&records, &title, &fonts, &page_config, &filename)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in PDF export: {e}")))??;

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        exported.filename
    ))
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid export filename: {e}")))?;

    info!(
        filename = %exported.filename,
        pages = exported.page_count,
        "Serving PDF export"
    );
    if exported.font_fallback {
        warn!("PDF exported without the meaning font; Helvetica fallback used");
    }
    let font_fallback = exported.font_fallback;

    let mut response = exported.bytes.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    if font_fallback {
        headers.insert(
            EXPORT_NOTICE_HEADER,
            HeaderValue::from_static(FONT_FALLBACK_NOTICE),
        );
    }

    Ok(response)
}
