//! Schema validation for the model's word-detail payload.
//!
//! The payload is checked immediately after the model call, before any field is
//! trusted. Whole-payload failures and per-field gaps both resolve to a
//! `FailureReason`, which owns the placeholder text shown to the user.

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::generation::prompts::RECORDS_FIELD;
use crate::llm_client::strip_json_fences;
use crate::models::word::WordDetail;

/// Why a generated field could not be filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The model answered, but the payload was absent, malformed, or empty.
    Unavailable,
    /// The model call itself failed.
    Error,
    /// The payload was valid but this word or field was not in it.
    Missing,
}

impl FailureReason {
    pub const fn placeholder(self) -> &'static str {
        match self {
            FailureReason::Unavailable => "Details for this word are currently unavailable.",
            FailureReason::Error => "Could not retrieve details for this word at this time.",
            FailureReason::Missing => "Not provided for this word.",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("model output is not valid JSON: {0}")]
    NotJson(String),

    #[error("model output is not a JSON object")]
    NotAnObject,

    #[error("model output has no `{0}` array")]
    MissingRecords(&'static str),

    #[error("model output `{0}` array is empty")]
    EmptyRecords(&'static str),
}

/// A record exactly as the model returned it. `None` marks a field that was
/// absent, not a string, or blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnedRecord {
    pub word: Option<String>,
    pub sentence: Option<String>,
    pub meaning: Option<String>,
    pub pronunciation: Option<String>,
}

impl ReturnedRecord {
    fn from_value(value: &Value) -> Self {
        Self {
            word: string_field(value, "word"),
            sentence: string_field(value, "sentence"),
            meaning: string_field(value, "meaning"),
            pronunciation: string_field(value, "pronunciation"),
        }
    }

    /// Builds the final record for `word`, substituting `Missing` placeholders.
    fn into_detail(self, word: &str) -> WordDetail {
        let missing = || FailureReason::Missing.placeholder().to_string();
        WordDetail {
            word: word.to_string(),
            sentence: self.sentence.unwrap_or_else(missing),
            meaning: self.meaning.unwrap_or_else(missing),
            pronunciation: self.pronunciation.unwrap_or_else(missing),
        }
    }
}

fn string_field(value: &Value, name: &str) -> Option<String> {
    value
        .get(name)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Validates raw model text against `{"wordDetails": [ {...}, ... ]}`.
///
/// Markdown fences are stripped first. Individual elements are never rejected:
/// a non-object element simply yields a record with every field `None`.
pub fn validate_word_details(raw: &str) -> Result<Vec<ReturnedRecord>, PayloadError> {
    let text = strip_json_fences(raw);
    let value: Value =
        serde_json::from_str(text).map_err(|e| PayloadError::NotJson(e.to_string()))?;

    let object = value.as_object().ok_or(PayloadError::NotAnObject)?;
    let records = object
        .get(RECORDS_FIELD)
        .and_then(Value::as_array)
        .ok_or(PayloadError::MissingRecords(RECORDS_FIELD))?;

    if records.is_empty() {
        return Err(PayloadError::EmptyRecords(RECORDS_FIELD));
    }

    Ok(records.iter().map(ReturnedRecord::from_value).collect())
}

/// One placeholder record per input word.
pub fn placeholder_details(words: &[String], reason: FailureReason) -> Vec<WordDetail> {
    words
        .iter()
        .map(|w| WordDetail::placeholder(w, reason.placeholder()))
        .collect()
}

/// Re-keys the model's records by input order.
///
/// Each input word claims the first unclaimed record whose `word` matches it
/// (trimmed, case-insensitive). A duplicate input word with no unclaimed match
/// reuses an already claimed one. A record with no `word` at all is accepted
/// for the input at the same position. Anything else is `Missing`; unclaimed
/// extra records are dropped.
pub fn align_to_query(words: &[String], returned: Vec<ReturnedRecord>) -> Vec<WordDetail> {
    let keys: Vec<Option<String>> = returned
        .iter()
        .map(|r| r.word.as_deref().map(normalize))
        .collect();
    let mut claimed = vec![false; returned.len()];
    let mut details = Vec::with_capacity(words.len());

    for (position, word) in words.iter().enumerate() {
        let key = normalize(word);
        let matches = |i: usize| keys[i].as_deref() == Some(key.as_str());

        let unclaimed_match = (0..returned.len()).find(|&i| !claimed[i] && matches(i));
        let any_match = || (0..returned.len()).find(|&i| matches(i));
        let unnamed_at_position = || {
            (position < returned.len() && !claimed[position] && keys[position].is_none())
                .then_some(position)
        };

        match unclaimed_match.or_else(any_match).or_else(unnamed_at_position) {
            Some(i) => {
                claimed[i] = true;
                details.push(returned[i].clone().into_detail(word));
            }
            None => {
                warn!(word = %word, "Model output has no record for word");
                details.push(WordDetail::placeholder(
                    word,
                    FailureReason::Missing.placeholder(),
                ));
            }
        }
    }

    let dropped = claimed.iter().filter(|c| !**c).count();
    if dropped > 0 {
        warn!(
            dropped,
            "Model output contained records for words that were not requested"
        );
    }

    details
}

fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}
