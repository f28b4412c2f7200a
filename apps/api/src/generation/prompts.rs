// LLM prompt constants for the word-detail generator.
// Reuses the cross-cutting JSON-only fragment from llm_client::prompts.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

const WORD_DETAILS_ROLE: &str = "You are a vocabulary tutor who writes clear example \
    sentences, accurate translations, and simple pronunciation guides for English words.";

/// Top-level field the model must place the record array under.
pub const RECORDS_FIELD: &str = "wordDetails";

/// Word-detail prompt template.
/// Replace: {language}, {word_list}
pub const WORD_DETAILS_PROMPT_TEMPLATE: &str = r#"For each word in the following list, provide:
1. An example sentence that clearly demonstrates the meaning of the word.
2. The {language} meaning of the word.
3. A simple pronunciation guide using capitalized stressed syllables (e.g. "i-FEM-er-uhl").

List of words:
{word_list}

Return a JSON object with this EXACT schema (no extra fields):
{
  "wordDetails": [
    {
      "word": "ephemeral",
      "sentence": "The beauty of the cherry blossoms is ephemeral, lasting only a few weeks.",
      "meaning": "क्षणिक",
      "pronunciation": "i-FEM-er-uhl"
    }
  ]
}

HARD RULES:
1. Exactly one object per word in the list, in the same order
2. `word` must repeat the listed word exactly as given
3. Every field is a non-empty string"#;

/// System prompt for word-detail generation.
pub fn word_details_system() -> String {
    format!("{WORD_DETAILS_ROLE} {JSON_ONLY_SYSTEM}")
}

/// Fills the template with the target language and a bulleted word list.
pub fn build_word_details_prompt(words: &[String], language: &str) -> String {
    let word_list = words
        .iter()
        .map(|w| format!("- {w}"))
        .collect::<Vec<_>>()
        .join("\n");

    WORD_DETAILS_PROMPT_TEMPLATE
        .replace("{language}", language)
        .replace("{word_list}", &word_list)
}
