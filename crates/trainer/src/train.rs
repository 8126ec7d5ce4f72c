use anyhow::Result;
use rand::seq::SliceRandom;
use rand::thread_rng;
use tch::{nn, nn::OptimizerConfig, Device, Tensor};

use newsclass_core::{LstmClassifier, ModelConfig};

use crate::dataset::{collate, TextDataset};
use crate::TrainerConfig;

pub struct Trainer {
    config: TrainerConfig,
    model: LstmClassifier,
    optimizer: nn::Optimizer,
    device: Device,
    vs: nn::VarStore,
}

impl Trainer {
    /// `embedding` is the pretrained matrix; it stays frozen, so the
    /// optimizer only tracks the LSTM and output-projection parameters.
    pub fn new(
        model_config: &ModelConfig,
        trainer_config: TrainerConfig,
        embedding: Tensor,
        device: Device,
    ) -> Result<Self> {
        let vs = nn::VarStore::new(device);
        let model = LstmClassifier::new(&vs.root(), model_config, embedding);
        let optimizer = nn::Adam::default().build(&vs, trainer_config.learning_rate)?;

        Ok(Self {
            config: trainer_config,
            model,
            optimizer,
            device,
            vs,
        })
    }

    pub fn model(&self) -> &LstmClassifier {
        &self.model
    }

    /// Runs the configured number of epochs: shuffled training batches with
    /// cross-entropy + Adam, then a validation pass, reporting both losses.
    pub fn train(&mut self, train_set: &TextDataset, val_set: &TextDataset) -> Result<()> {
        log::info!(
            "training {} parameter tensors on {:?}",
            self.vs.trainable_variables().len(),
            self.device
        );

        let mut order: Vec<usize> = (0..train_set.len()).collect();
        let mut rng = thread_rng();

        for epoch in 0..self.config.epochs {
            order.shuffle(&mut rng);
            let mut total_loss = 0.0;
            let mut batches = 0usize;

            for chunk in order.chunks(self.config.batch_size) {
                let items: Vec<(&[i64], i64)> =
                    chunk.iter().map(|&i| train_set.get(i)).collect();
                let (tokens, labels) = collate(&items, self.device);

                let logits = self.model.forward(&tokens, true);
                let loss = logits.cross_entropy_for_logits(&labels);
                self.optimizer.backward_step(&loss);

                total_loss += loss.double_value(&[]);
                batches += 1;
            }

            let train_loss = total_loss / batches.max(1) as f64;
            let val_loss = self.validation_loss(val_set);
            println!(
                "Epoch {}/{}, Train Loss: {:.4}, Val Loss: {:.4}",
                epoch + 1,
                self.config.epochs,
                train_loss,
                val_loss
            );
        }

        Ok(())
    }

    /// Average cross-entropy over the held-out batches: eval mode, no
    /// gradient tracking, averaged over batch count.
    pub fn validation_loss(&self, val_set: &TextDataset) -> f64 {
        tch::no_grad(|| {
            let order: Vec<usize> = (0..val_set.len()).collect();
            let mut total = 0.0;
            let mut batches = 0usize;

            for chunk in order.chunks(self.config.batch_size) {
                let items: Vec<(&[i64], i64)> =
                    chunk.iter().map(|&i| val_set.get(i)).collect();
                let (tokens, labels) = collate(&items, self.device);
                let logits = self.model.forward(&tokens, false);
                total += logits.cross_entropy_for_logits(&labels).double_value(&[]);
                batches += 1;
            }

            total / batches.max(1) as f64
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tch::Kind;

    fn synthetic_dataset() -> TextDataset {
        let sequences = vec![
            vec![1, 2, 3],
            vec![4, 5],
            vec![6, 7, 8, 9],
            vec![2, 4],
            vec![5, 1, 3],
        ];
        let labels = vec![0, 1, 2, 1, 0];
        TextDataset::new(sequences, labels)
    }

    fn tiny_trainer() -> Trainer {
        let model_config = ModelConfig {
            embedding_dim: 8,
            hidden_dim: 4,
            num_classes: 3,
            dropout: 0.5,
        };
        let config = TrainerConfig {
            batch_size: 2,
            epochs: 1,
            ..Default::default()
        };
        let embedding = Tensor::randn(&[10, 8], (Kind::Float, Device::Cpu));
        Trainer::new(&model_config, config, embedding, Device::Cpu).unwrap()
    }

    #[test]
    fn one_epoch_on_synthetic_split_reports_finite_loss() {
        let (train_set, val_set) = synthetic_dataset().split(0.2, 42);
        assert_eq!(train_set.len(), 4);
        assert_eq!(val_set.len(), 1);

        let mut trainer = tiny_trainer();
        trainer.train(&train_set, &val_set).unwrap();

        let val_loss = trainer.validation_loss(&val_set);
        assert!(val_loss.is_finite());
        assert!(val_loss >= 0.0);
    }

    #[test]
    fn validation_loss_is_non_negative_and_stable() {
        let (_, val_set) = synthetic_dataset().split(0.2, 42);
        let trainer = tiny_trainer();
        let a = trainer.validation_loss(&val_set);
        let b = trainer.validation_loss(&val_set);
        assert!(a >= 0.0);
        assert_eq!(a, b);
    }
}
