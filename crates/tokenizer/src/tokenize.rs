use regex::Regex;

use crate::error::Result;

/// Tokens shorter than this (in characters) are dropped.
pub const MIN_TOKEN_LEN: usize = 2;
/// Tokens longer than this (in characters) are dropped.
pub const MAX_TOKEN_LEN: usize = 15;

/// Word-level tokenizer: lowercase the text, pull out alphabetic runs and
/// keep tokens whose length falls within [MIN_TOKEN_LEN, MAX_TOKEN_LEN].
pub struct WordTokenizer {
    pattern: Regex,
}

impl WordTokenizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(r"\p{L}+")?,
        })
    }

    /// Deterministic: the same text always produces the same token sequence.
    /// Empty or non-alphabetic text yields an empty sequence.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.pattern
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .filter(|token| {
                let len = token.chars().count();
                (MIN_TOKEN_LEN..=MAX_TOKEN_LEN).contains(&len)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer() -> WordTokenizer {
        WordTokenizer::new().unwrap()
    }

    #[test]
    fn lowercases_and_strips_punctuation() {
        let tokens = tokenizer().tokenize("Wall St. Bears Claw Back!");
        assert_eq!(tokens, vec!["wall", "st", "bears", "claw", "back"]);
    }

    #[test]
    fn drops_too_short_and_too_long_tokens() {
        let long = "a".repeat(16);
        let text = format!("a ok {} market", long);
        let tokens = tokenizer().tokenize(&text);
        assert_eq!(tokens, vec!["ok", "market"]);
    }

    #[test]
    fn empty_text_yields_empty_sequence() {
        assert!(tokenizer().tokenize("").is_empty());
        assert!(tokenizer().tokenize("123 456 !!").is_empty());
    }

    #[test]
    fn tokenization_is_deterministic() {
        let t = tokenizer();
        let text = "Oil prices rise as OPEC cuts output";
        assert_eq!(t.tokenize(text), t.tokenize(text));
    }
}
