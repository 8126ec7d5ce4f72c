use std::collections::HashMap;

/// Fallback index for words that were never inserted.
///
/// Index 0 is also the padding value used by the batch collator, so a
/// downstream consumer cannot tell an out-of-vocabulary word apart from
/// padding. Inherited behavior, kept as-is.
pub const UNKNOWN_ID: i64 = 0;

/// Word-to-index mapping backing the embedding matrix. Indices are assigned
/// in insertion order, starting at 0.
#[derive(Debug, Clone, Default)]
pub struct Vocab {
    token_to_id: HashMap<String, i64>,
    id_to_token: Vec<String>,
}

impl Vocab {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a token and returns its index; returns the existing index if
    /// the token is already present.
    pub fn insert(&mut self, token: String) -> i64 {
        if let Some(&id) = self.token_to_id.get(&token) {
            return id;
        }
        let id = self.id_to_token.len() as i64;
        self.token_to_id.insert(token.clone(), id);
        self.id_to_token.push(token);
        id
    }

    pub fn get_id(&self, token: &str) -> Option<i64> {
        self.token_to_id.get(token).copied()
    }

    /// Index for a token, falling back to [`UNKNOWN_ID`] for unseen words.
    pub fn id_or_unknown(&self, token: &str) -> i64 {
        self.get_id(token).unwrap_or(UNKNOWN_ID)
    }

    pub fn get_token(&self, id: i64) -> Option<&str> {
        usize::try_from(id)
            .ok()
            .and_then(|i| self.id_to_token.get(i))
            .map(String::as_str)
    }

    /// Maps a token sequence to its index sequence.
    pub fn encode(&self, tokens: &[String]) -> Vec<i64> {
        tokens.iter().map(|t| self.id_or_unknown(t)).collect()
    }

    pub fn len(&self) -> usize {
        self.id_to_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_token.is_empty()
    }
}
