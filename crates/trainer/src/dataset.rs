use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tch::{Device, Tensor};

/// Index sequences paired with their labels, with random access by row.
/// Sequences are variable length; a row whose source text was entirely
/// out-of-vocabulary or empty may be an empty sequence.
pub struct TextDataset {
    sequences: Vec<Vec<i64>>,
    labels: Vec<i64>,
}

impl TextDataset {
    pub fn new(sequences: Vec<Vec<i64>>, labels: Vec<i64>) -> Self {
        assert_eq!(sequences.len(), labels.len());
        Self { sequences, labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> (&[i64], i64) {
        (&self.sequences[index], self.labels[index])
    }

    /// Splits off a held-out fraction: shuffles row indices with a seeded
    /// RNG and keeps the trailing fraction for validation. The same seed
    /// always produces the same partition.
    pub fn split(self, validation_fraction: f64, seed: u64) -> (TextDataset, TextDataset) {
        let mut indices: Vec<usize> = (0..self.len()).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let held_out = (self.len() as f64 * validation_fraction).round() as usize;
        let split_at = self.len() - held_out;

        let pick = |selection: &[usize]| {
            let sequences = selection.iter().map(|&i| self.sequences[i].clone()).collect();
            let labels = selection.iter().map(|&i| self.labels[i]).collect();
            TextDataset::new(sequences, labels)
        };
        let train = pick(&indices[..split_at]);
        let validation = pick(&indices[split_at..]);
        (train, validation)
    }
}

/// Pads a batch of (index-sequence, label) items into one rectangular
/// Int64 tensor [rows, batch max length], right-padded with 0, plus an
/// aligned label vector. Row order is preserved between the two outputs.
pub fn collate(items: &[(&[i64], i64)], device: Device) -> (Tensor, Tensor) {
    let max_len = items
        .iter()
        .map(|(seq, _)| seq.len())
        .max()
        .unwrap_or(0)
        .max(1);

    let mut padded = vec![0i64; items.len() * max_len];
    let mut labels = Vec::with_capacity(items.len());
    for (row, (seq, label)) in items.iter().enumerate() {
        padded[row * max_len..row * max_len + seq.len()].copy_from_slice(seq);
        labels.push(*label);
    }

    let tokens = Tensor::from_slice(&padded)
        .view([items.len() as i64, max_len as i64])
        .to_device(device);
    let labels = Tensor::from_slice(&labels).to_device(device);
    (tokens, labels)
}
