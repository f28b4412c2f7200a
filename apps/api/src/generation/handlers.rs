//! Axum route handlers for the Words API.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::cards::{build_cards, WordCard};
use crate::errors::AppError;
use crate::state::AppState;
use crate::vocabulary::{select_daily_words, WORD_BANK};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TodayQuery {
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TodayResponse {
    pub date: NaiveDate,
    pub words: Vec<String>,
    pub meaning_language: String,
    pub cards: Vec<WordCard>,
}

#[derive(Debug, Deserialize)]
pub struct DetailsRequest {
    pub words: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DetailsResponse {
    pub meaning_language: String,
    pub cards: Vec<WordCard>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/words/today
///
/// Selects today's words from the rotation and generates their cards. Model
/// failures show up as placeholder text on the cards, never as an error.
pub async fn handle_today(
    State(state): State<AppState>,
    Query(query): Query<TodayQuery>,
) -> Result<Json<TodayResponse>, AppError> {
    let count = query.count.unwrap_or(state.config.words_per_day);
    if count == 0 {
        return Err(AppError::Validation("count must be at least 1".to_string()));
    }

    let date = Local::now().date_naive();
    let words = select_daily_words(WORD_BANK, date, count);
    let details = state.generator.generate(&words).await;
    let language = state.generator.meaning_language().to_string();

    Ok(Json(TodayResponse {
        date,
        words,
        cards: build_cards(details, &language),
        meaning_language: language,
    }))
}

/// POST /api/v1/words/details
///
/// Generates cards for a caller-supplied word list. Blank entries are dropped.
pub async fn handle_details(
    State(state): State<AppState>,
    Json(request): Json<DetailsRequest>,
) -> Result<Json<DetailsResponse>, AppError> {
    let words: Vec<String> = request
        .words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();

    if words.is_empty() {
        return Err(AppError::Validation("words cannot be empty".to_string()));
    }

    let details = state.generator.generate(&words).await;
    let language = state.generator.meaning_language().to_string();

    Ok(Json(DetailsResponse {
        cards: build_cards(details, &language),
        meaning_language: language,
    }))
}
