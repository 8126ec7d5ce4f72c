use tch::{Device, Kind, Tensor};

use newsclass_core::LstmClassifier;

use crate::dataset::{collate, TextDataset};

/// Rows in the batch whose arg-max logit matches the true label.
fn num_correct(logits: &Tensor, labels: &Tensor) -> i64 {
    let predictions = logits.argmax(-1, false);
    predictions
        .eq_tensor(labels)
        .sum(Kind::Int64)
        .int64_value(&[])
}

/// Classification accuracy over `dataset` in eval mode: correct / total,
/// a ratio in [0, 1].
pub fn accuracy(
    model: &LstmClassifier,
    dataset: &TextDataset,
    batch_size: usize,
    device: Device,
) -> f64 {
    if dataset.is_empty() {
        return 0.0;
    }

    tch::no_grad(|| {
        let order: Vec<usize> = (0..dataset.len()).collect();
        let mut correct = 0i64;
        let mut total = 0i64;

        for chunk in order.chunks(batch_size) {
            let items: Vec<(&[i64], i64)> = chunk.iter().map(|&i| dataset.get(i)).collect();
            let (tokens, labels) = collate(&items, device);
            let logits = model.forward(&tokens, false);
            correct += num_correct(&logits, &labels);
            total += labels.size()[0];
        }

        correct as f64 / total as f64
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsclass_core::ModelConfig;
    use tch::nn;

    #[test]
    fn num_correct_counts_argmax_matches() {
        let logits = Tensor::from_slice(&[2.0f32, 0.0, 1.0, 0.0, 3.0, 0.0]).view([2, 3]);
        let labels = Tensor::from_slice(&[0i64, 2]);
        assert_eq!(num_correct(&logits, &labels), 1);

        let all_right = Tensor::from_slice(&[0i64, 1]);
        assert_eq!(num_correct(&logits, &all_right), 2);
    }

    #[test]
    fn accuracy_is_a_ratio_in_unit_interval() {
        let config = ModelConfig {
            embedding_dim: 8,
            hidden_dim: 4,
            num_classes: 3,
            dropout: 0.5,
        };
        let embedding = Tensor::randn(&[10, 8], (Kind::Float, Device::Cpu));
        let vs = nn::VarStore::new(Device::Cpu);
        let model = LstmClassifier::new(&vs.root(), &config, embedding);

        let dataset = TextDataset::new(
            vec![vec![1, 2, 3], vec![4, 5], vec![6, 7, 8]],
            vec![0, 1, 2],
        );
        let value = accuracy(&model, &dataset, 2, Device::Cpu);
        assert!((0.0..=1.0).contains(&value));
    }

    #[test]
    fn accuracy_of_empty_dataset_is_zero() {
        let config = ModelConfig {
            embedding_dim: 8,
            hidden_dim: 4,
            num_classes: 3,
            dropout: 0.5,
        };
        let embedding = Tensor::randn(&[10, 8], (Kind::Float, Device::Cpu));
        let vs = nn::VarStore::new(Device::Cpu);
        let model = LstmClassifier::new(&vs.root(), &config, embedding);
        let dataset = TextDataset::new(vec![], vec![]);
        assert_eq!(accuracy(&model, &dataset, 2, Device::Cpu), 0.0);
    }
}
