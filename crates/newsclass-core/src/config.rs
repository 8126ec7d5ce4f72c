use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Dimension of the pretrained word vectors.
    pub embedding_dim: i64,
    /// Width of the LSTM hidden state.
    pub hidden_dim: i64,
    /// Number of output classes.
    pub num_classes: i64,
    /// Dropout probability applied to the final hidden state (training only).
    pub dropout: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            embedding_dim: 300,
            hidden_dim: 128,
            num_classes: 4,
            dropout: 0.5,
        }
    }
}
