use tch::nn::RNN;
use tch::{nn, Tensor};

use crate::config::ModelConfig;

/// LSTM topic classifier over pretrained word embeddings.
///
/// The embedding matrix is frozen: it is held as a plain tensor outside the
/// VarStore, so the optimizer only ever updates the LSTM and the output
/// projection. Indices fed to [`LstmClassifier::forward`] must be valid rows
/// of the embedding matrix.
pub struct LstmClassifier {
    embedding: Tensor,
    lstm: nn::LSTM,
    fc: nn::Linear,
    dropout: f64,
}

impl LstmClassifier {
    /// `embedding` has shape [vocab_size, embedding_dim].
    pub fn new(vs: &nn::Path, config: &ModelConfig, embedding: Tensor) -> Self {
        let lstm = nn::lstm(
            vs / "lstm",
            config.embedding_dim,
            config.hidden_dim,
            Default::default(),
        );
        let fc = nn::linear(
            vs / "fc",
            config.hidden_dim,
            config.num_classes,
            Default::default(),
        );
        let embedding = embedding.detach().to_device(vs.device());

        Self {
            embedding,
            lstm,
            fc,
            dropout: config.dropout,
        }
    }

    /// Forward pass.
    ///
    /// `xs`: [batch, seq_len] of vocabulary indices (Int64, right-padded
    /// with 0). Returns unnormalized class logits [batch, num_classes];
    /// softmax is left to the loss function. Dropout only fires when
    /// `train` is set.
    pub fn forward(&self, xs: &Tensor, train: bool) -> Tensor {
        let embedded = Tensor::embedding(&self.embedding, xs, -1, false, false);
        let (out, _state) = self.lstm.seq(&embedded);
        let seq_len = out.size()[1];
        let last = out.select(1, seq_len - 1);
        last.dropout(self.dropout, train).apply(&self.fc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tch::{Device, Kind};

    fn tiny_model() -> (nn::VarStore, LstmClassifier, ModelConfig) {
        let config = ModelConfig {
            embedding_dim: 8,
            hidden_dim: 4,
            num_classes: 3,
            dropout: 0.5,
        };
        let embedding = Tensor::randn(&[10, config.embedding_dim], (Kind::Float, Device::Cpu));
        let vs = nn::VarStore::new(Device::Cpu);
        let model = LstmClassifier::new(&vs.root(), &config, embedding);
        (vs, model, config)
    }

    #[test]
    fn logits_have_batch_by_class_shape() {
        let (_vs, model, config) = tiny_model();
        let batch = Tensor::from_slice(&[1i64, 2, 3, 4, 0, 0]).view([2, 3]);
        let logits = model.forward(&batch, true);
        assert_eq!(logits.size(), vec![2, config.num_classes]);
    }

    #[test]
    fn eval_mode_is_deterministic() {
        let (_vs, model, _config) = tiny_model();
        let batch = Tensor::from_slice(&[5i64, 6, 7, 8, 9, 1]).view([2, 3]);
        let a = model.forward(&batch, false);
        let b = model.forward(&batch, false);
        assert!(a.equal(&b));
    }

    #[test]
    fn embedding_is_excluded_from_trainable_variables() {
        let (vs, _model, _config) = tiny_model();
        // Only LSTM weights/biases and the linear layer should be tracked.
        for var in vs.trainable_variables() {
            assert_ne!(var.size(), vec![10, 8]);
        }
    }
}
