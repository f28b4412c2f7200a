//! Word cards: the per-word view handed to the front-end, plus the text the
//! copy and share actions operate on.

use serde::Serialize;

use crate::models::word::WordDetail;

pub mod capabilities;

/// What the host's share sheet receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCard {
    #[serde(flatten)]
    pub detail: WordDetail,
    pub copy_text: String,
    pub share: SharePayload,
}

impl WordCard {
    pub fn new(detail: WordDetail, meaning_language: &str) -> Self {
        let copy_text = format!(
            "Word: {}\nSentence: {}\nPronunciation: {}\n{} Meaning: {}",
            detail.word, detail.sentence, detail.pronunciation, meaning_language, detail.meaning
        );
        let share = SharePayload {
            title: format!("Word of the day: {}", detail.word),
            text: copy_text.clone(),
        };
        Self {
            detail,
            copy_text,
            share,
        }
    }
}

pub fn build_cards(details: Vec<WordDetail>, meaning_language: &str) -> Vec<WordCard> {
    details
        .into_iter()
        .map(|d| WordCard::new(d, meaning_language))
        .collect()
}
