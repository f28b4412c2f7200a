use serde::{Deserialize, Serialize};

/// One generated record per requested word.
///
/// Every field is non-empty once it leaves the generator: anything the model
/// failed to supply carries a placeholder string instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordDetail {
    pub word: String,
    pub sentence: String,
    pub meaning: String,
    pub pronunciation: String,
}

impl WordDetail {
    /// A record for `word` whose three generated fields all carry `placeholder`.
    pub fn placeholder(word: &str, placeholder: &str) -> Self {
        Self {
            word: word.to_string(),
            sentence: placeholder.to_string(),
            meaning: placeholder.to_string(),
            pronunciation: placeholder.to_string(),
        }
    }
}
