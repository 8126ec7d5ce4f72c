use std::collections::HashMap;

use anyhow::Result;
use rand::distributions::{Distribution, WeightedIndex};
use rand::{thread_rng, Rng};
use tch::{nn, nn::OptimizerConfig, Device, Kind, Tensor};

use tokenizer::Vocab;

use crate::Word2VecConfig;

/// Trained word embeddings: a frequency-ordered vocabulary plus one vector
/// per word. `vectors` has shape [vocab_size, vector_size] and is detached
/// from the training graph; downstream consumers treat it as read-only.
pub struct Word2Vec {
    pub vocab: Vocab,
    pub vectors: Tensor,
}

impl Word2Vec {
    pub fn vector(&self, word: &str) -> Option<Tensor> {
        self.vocab.get_id(word).map(|id| self.vectors.get(id))
    }
}

/// Counts corpus frequencies and assigns indices most-frequent-first, so
/// the most common word sits at index 0. Ties break lexicographically to
/// keep index assignment deterministic.
fn build_vocab(sentences: &[Vec<String>], min_count: u32) -> (Vocab, Vec<u32>) {
    let mut frequencies: HashMap<&str, u32> = HashMap::new();
    for sentence in sentences {
        for token in sentence {
            *frequencies.entry(token.as_str()).or_insert(0) += 1;
        }
    }

    let mut ordered: Vec<(&str, u32)> = frequencies
        .into_iter()
        .filter(|&(_, count)| count >= min_count)
        .collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut vocab = Vocab::new();
    let mut counts = Vec::with_capacity(ordered.len());
    for (word, count) in ordered {
        vocab.insert(word.to_string());
        counts.push(count);
    }
    (vocab, counts)
}

/// One skip-gram-with-negative-sampling step over a buffer of pairs.
/// Returns the scalar loss for reporting.
#[allow(clippy::too_many_arguments)]
fn sgns_step(
    opt: &mut nn::Optimizer,
    input: &Tensor,
    output: &Tensor,
    centers: &[i64],
    contexts: &[i64],
    sampler: &WeightedIndex<f64>,
    rng: &mut impl Rng,
    config: &Word2VecConfig,
    device: Device,
) -> f64 {
    let n = centers.len() as i64;
    let k = config.negative as i64;
    let negatives: Vec<i64> = (0..centers.len() * config.negative)
        .map(|_| sampler.sample(rng) as i64)
        .collect();

    let centers_t = Tensor::from_slice(centers).to_device(device);
    let contexts_t = Tensor::from_slice(contexts).to_device(device);
    let negatives_t = Tensor::from_slice(&negatives).to_device(device);

    let v = input.index_select(0, &centers_t);
    let u = output.index_select(0, &contexts_t);
    let u_neg = output
        .index_select(0, &negatives_t)
        .view([n, k, config.vector_size]);

    // -log sigmoid(v·u) - sum_k log sigmoid(-v·u_neg)
    let pos = (&v * &u).sum_dim_intlist(Some(&[-1i64][..]), false, Kind::Float);
    let neg = u_neg.bmm(&v.unsqueeze(2)).squeeze_dim(2);
    let loss = -(pos.log_sigmoid().sum(Kind::Float) + neg.neg().log_sigmoid().sum(Kind::Float))
        / n as f64;

    opt.backward_step(&loss);
    loss.double_value(&[])
}

/// Trains skip-gram embeddings over the full corpus. Every sentence is a
/// pre-tokenized word sequence; the returned vocabulary covers every word
/// that clears `min_count`.
pub fn train(
    sentences: &[Vec<String>],
    config: &Word2VecConfig,
    device: Device,
) -> Result<Word2Vec> {
    let (vocab, counts) = build_vocab(sentences, config.min_count);
    anyhow::ensure!(!vocab.is_empty(), "corpus produced an empty vocabulary");
    let vocab_size = vocab.len() as i64;

    let vs = nn::VarStore::new(device);
    let root = vs.root();
    let bound = 0.5 / config.vector_size as f64;
    let input = root.var(
        "input",
        &[vocab_size, config.vector_size],
        nn::Init::Uniform {
            lo: -bound,
            up: bound,
        },
    );
    let output = root.var(
        "output",
        &[vocab_size, config.vector_size],
        nn::Init::Const(0.0),
    );
    let mut opt = nn::Sgd::default().build(&vs, config.learning_rate)?;

    // Unigram distribution raised to 3/4, the standard negative-sampling
    // table.
    let weights: Vec<f64> = counts.iter().map(|&c| f64::from(c).powf(0.75)).collect();
    let sampler = WeightedIndex::new(&weights)?;
    let mut rng = thread_rng();

    let encoded: Vec<Vec<i64>> = sentences
        .iter()
        .map(|sentence| {
            sentence
                .iter()
                .filter_map(|token| vocab.get_id(token))
                .collect()
        })
        .collect();

    for epoch in 0..config.epochs {
        let mut total_loss = 0.0;
        let mut batches = 0usize;
        let mut centers: Vec<i64> = Vec::with_capacity(config.batch_size);
        let mut contexts: Vec<i64> = Vec::with_capacity(config.batch_size);

        for sentence in &encoded {
            for (i, &center) in sentence.iter().enumerate() {
                let lo = i.saturating_sub(config.window);
                let hi = (i + config.window + 1).min(sentence.len());
                for j in lo..hi {
                    if j == i {
                        continue;
                    }
                    centers.push(center);
                    contexts.push(sentence[j]);
                    if centers.len() == config.batch_size {
                        total_loss += sgns_step(
                            &mut opt, &input, &output, &centers, &contexts, &sampler,
                            &mut rng, config, device,
                        );
                        batches += 1;
                        centers.clear();
                        contexts.clear();
                    }
                }
            }
        }
        if !centers.is_empty() {
            total_loss += sgns_step(
                &mut opt, &input, &output, &centers, &contexts, &sampler, &mut rng, config,
                device,
            );
            batches += 1;
        }

        println!(
            "Word2Vec epoch {}/{} | Avg loss: {:.4}",
            epoch + 1,
            config.epochs,
            total_loss / batches.max(1) as f64
        );
    }

    let vectors = input.detach().to_device(Device::Cpu);
    Ok(Word2Vec { vocab, vectors })
}
