pub mod train;

pub use train::{train, Word2Vec};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word2VecConfig {
    /// Dimension of each word vector.
    pub vector_size: i64,
    /// Symmetric context window, in tokens.
    pub window: usize,
    /// Words seen fewer times than this are dropped from the vocabulary.
    pub min_count: u32,
    /// Negative samples drawn per (center, context) pair.
    pub negative: usize,
    pub epochs: usize,
    pub learning_rate: f64,
    /// Number of skip-gram pairs per optimizer step.
    pub batch_size: usize,
}

impl Default for Word2VecConfig {
    fn default() -> Self {
        Self {
            vector_size: 300,
            window: 5,
            min_count: 1,
            negative: 5,
            epochs: 5,
            learning_rate: 0.025,
            batch_size: 512,
        }
    }
}
