//! Word-detail generation: one model call per word list.
//!
//! Flow: build prompt → `CompletionModel::complete` → `validate_word_details` →
//!       `align_to_query`.
//!
//! `generate` never fails. A call error, an unusable payload, or a gap in an
//! otherwise valid payload each degrade to placeholder text, so the caller always
//! gets exactly one record per requested word.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::generation::prompts::{build_word_details_prompt, word_details_system};
use crate::generation::validation::{
    align_to_query, placeholder_details, validate_word_details, FailureReason,
};
use crate::llm_client::CompletionModel;
use crate::models::word::WordDetail;

#[derive(Clone)]
pub struct WordDetailGenerator {
    model: Arc<dyn CompletionModel>,
    meaning_language: String,
}

impl WordDetailGenerator {
    pub fn new(model: Arc<dyn CompletionModel>, meaning_language: impl Into<String>) -> Self {
        Self {
            model,
            meaning_language: meaning_language.into(),
        }
    }

    pub fn meaning_language(&self) -> &str {
        &self.meaning_language
    }

    /// Generates one `WordDetail` per input word, in input order.
    ///
    /// An empty word list returns an empty result without calling the model.
    /// Words are trimmed; a blank entry is never sent to the model and keeps its
    /// slot as a record made entirely of `Missing` placeholders.
    pub async fn generate(&self, words: &[String]) -> Vec<WordDetail> {
        if words.is_empty() {
            debug!("No words requested; skipping word detail generation");
            return Vec::new();
        }

        let query: Vec<String> = words
            .iter()
            .map(|w| w.trim())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        if query.len() < words.len() {
            warn!(
                blank = words.len() - query.len(),
                "Blank words in request; they get placeholder records"
            );
        }

        let mut generated = if query.is_empty() {
            Vec::new()
        } else {
            self.generate_query(&query).await
        }
        .into_iter();

        let missing = FailureReason::Missing.placeholder();
        words
            .iter()
            .map(|w| {
                let word = w.trim();
                if word.is_empty() {
                    WordDetail::placeholder(missing, missing)
                } else {
                    generated
                        .next()
                        .unwrap_or_else(|| WordDetail::placeholder(word, missing))
                }
            })
            .collect()
    }

    /// One model call for a list of trimmed, non-blank words.
    async fn generate_query(&self, words: &[String]) -> Vec<WordDetail> {
        info!(count = words.len(), words = ?words, "Generating word details");

        let prompt = build_word_details_prompt(words, &self.meaning_language);
        let raw = match self.model.complete(&prompt, &word_details_system()).await {
            Ok(raw) => raw,
            Err(e) => {
                error!("Word detail LLM call failed: {e}");
                return placeholder_details(words, FailureReason::Error);
            }
        };

        debug!(raw_output = %raw, "Word detail LLM call returned");

        match validate_word_details(&raw) {
            Ok(records) => {
                if records.len() != words.len() {
                    warn!(
                        requested = words.len(),
                        returned = records.len(),
                        "Model returned a different number of records than requested"
                    );
                }
                align_to_query(words, records)
            }
            Err(e) => {
                warn!("Word detail output failed validation: {e}");
                placeholder_details(words, FailureReason::Unavailable)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::llm_client::LlmError;

    /// Scripted model: returns the queued answer and records every prompt.
    pub(crate) struct ScriptedModel {
        answer: Mutex<Option<Result<String, LlmError>>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        pub(crate) fn answering(text: &str) -> Self {
            Self {
                answer: Mutex::new(Some(Ok(text.to_string()))),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                answer: Mutex::new(Some(Err(LlmError::Api {
                    status: 503,
                    message: "overloaded".to_string(),
                }))),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionModel for ScriptedModel {
        async fn complete(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.answer
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(LlmError::EmptyContent))
        }
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    fn generator(model: ScriptedModel) -> (WordDetailGenerator, Arc<ScriptedModel>) {
        let model = Arc::new(model);
        (WordDetailGenerator::new(model.clone(), "Hindi"), model)
    }

    fn assert_no_empty_fields(details: &[WordDetail]) {
        for d in details {
            assert!(!d.word.is_empty());
            assert!(!d.sentence.is_empty());
            assert!(!d.meaning.is_empty());
            assert!(!d.pronunciation.is_empty());
        }
    }

    #[tokio::test]
    async fn test_generate_round_trips_a_valid_answer() {
        let (generator, _) = generator(ScriptedModel::answering(
            r#"{"wordDetails": [{"word": "ephemeral", "sentence": "It was ephemeral.",
                "meaning": "X", "pronunciation": "i-FEM-er-uhl"}]}"#,
        ));

        let details = generator.generate(&words(&["ephemeral"])).await;

        assert_eq!(
            details,
            vec![WordDetail {
                word: "ephemeral".to_string(),
                sentence: "It was ephemeral.".to_string(),
                meaning: "X".to_string(),
                pronunciation: "i-FEM-er-uhl".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_generate_call_error_yields_error_placeholders() {
        let (generator, _) = generator(ScriptedModel::failing());

        let details = generator.generate(&words(&["a", "b"])).await;

        assert_eq!(details.len(), 2);
        assert_eq!(details[0].word, "a");
        assert_eq!(details[1].word, "b");
        let placeholder = FailureReason::Error.placeholder();
        for d in &details {
            assert_eq!(d.sentence, placeholder);
            assert_eq!(d.meaning, placeholder);
            assert_eq!(d.pronunciation, placeholder);
        }
    }

    #[tokio::test]
    async fn test_generate_malformed_answer_yields_unavailable_placeholders() {
        let (generator, _) = generator(ScriptedModel::answering("not json at all"));

        let details = generator.generate(&words(&["a", "b", "c"])).await;

        assert_eq!(details.len(), 3);
        assert!(details
            .iter()
            .all(|d| d.sentence == FailureReason::Unavailable.placeholder()));
        assert_no_empty_fields(&details);
    }

    #[tokio::test]
    async fn test_generate_empty_array_yields_unavailable_placeholders() {
        let (generator, _) = generator(ScriptedModel::answering(r#"{"wordDetails": []}"#));

        let details = generator.generate(&words(&["a"])).await;

        assert_eq!(details.len(), 1);
        assert_eq!(details[0].meaning, FailureReason::Unavailable.placeholder());
    }

    #[tokio::test]
    async fn test_generate_partial_record_gets_field_placeholders() {
        let (generator, _) = generator(ScriptedModel::answering(
            r#"{"wordDetails": [{"word": "a", "sentence": "A sentence."}]}"#,
        ));

        let details = generator.generate(&words(&["a"])).await;

        assert_eq!(details[0].sentence, "A sentence.");
        assert_eq!(details[0].meaning, FailureReason::Missing.placeholder());
        assert_eq!(
            details[0].pronunciation,
            FailureReason::Missing.placeholder()
        );
    }

    #[tokio::test]
    async fn test_generate_length_matches_input_when_model_drops_words() {
        let (generator, _) = generator(ScriptedModel::answering(
            r#"{"wordDetails": [{"word": "b", "sentence": "B.", "meaning": "m", "pronunciation": "p"}]}"#,
        ));

        let details = generator.generate(&words(&["a", "b", "c"])).await;

        assert_eq!(details.len(), 3);
        assert_eq!(details[1].sentence, "B.");
        assert_no_empty_fields(&details);
    }

    #[tokio::test]
    async fn test_generate_blank_words_keep_their_slot_without_empty_fields() {
        let (generator, model) = generator(ScriptedModel::answering(
            r#"{"wordDetails": [{"word": "a", "sentence": "A.", "meaning": "m", "pronunciation": "p"}]}"#,
        ));

        let details = generator.generate(&words(&["", " a ", "   "])).await;

        assert_eq!(details.len(), 3);
        assert_eq!(details[1].word, "a");
        assert_eq!(details[1].sentence, "A.");
        assert_eq!(details[0].word, FailureReason::Missing.placeholder());
        assert_eq!(details[2].meaning, FailureReason::Missing.placeholder());
        assert_no_empty_fields(&details);

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("- a\n"));
        assert!(!prompts[0].contains("- \n"));
    }

    #[tokio::test]
    async fn test_generate_only_blank_words_skips_the_model() {
        let (generator, model) = generator(ScriptedModel::failing());

        let details = generator.generate(&words(&["", "  "])).await;

        assert_eq!(details.len(), 2);
        assert_no_empty_fields(&details);
        assert!(model.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_sends_one_prompt_with_all_words() {
        let (generator, model) = generator(ScriptedModel::answering(r#"{"wordDetails": []}"#));

        generator.generate(&words(&["alpha", "beta"])).await;

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("- alpha") && prompts[0].contains("- beta"));
    }

    #[tokio::test]
    async fn test_generate_empty_input_skips_model() {
        let (generator, model) = generator(ScriptedModel::failing());

        let details = generator.generate(&[]).await;

        assert!(details.is_empty());
        assert!(model.prompts.lock().unwrap().is_empty());
    }
}
