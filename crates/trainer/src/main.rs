use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;

use newsclass_core::ModelConfig;
use tokenizer::WordTokenizer;
use trainer::data::{load_records, NewsRecord};
use trainer::dataset::TextDataset;
use trainer::{eval, Trainer, TrainerConfig};
use word2vec::{Word2Vec, Word2VecConfig};

#[derive(Parser)]
#[command(name = "newsclass-train", about = "Train the LSTM news-topic classifier")]
struct Cli {
    /// Training CSV (label,title,description; no header row)
    #[arg(long, default_value = "data/ag_news_csv/train.csv")]
    train: PathBuf,
    /// Test CSV in the same layout
    #[arg(long, default_value = "data/ag_news_csv/test.csv")]
    test: PathBuf,
    /// Optional YAML overrides; defaults apply when a file is absent
    #[arg(long, default_value = "configs/model_config.yaml")]
    model_config: PathBuf,
    #[arg(long, default_value = "configs/training_config.yaml")]
    training_config: PathBuf,
    #[arg(long, default_value = "configs/word2vec_config.yaml")]
    word2vec_config: PathBuf,
}

fn load_config<T>(path: &Path) -> Result<T>
where
    T: Default + serde::de::DeserializeOwned,
{
    if path.exists() {
        let content = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    } else {
        Ok(T::default())
    }
}

fn encode_dataset(
    vocab: &tokenizer::Vocab,
    token_rows: &[Vec<String>],
    records: &[NewsRecord],
) -> TextDataset {
    let sequences = token_rows.iter().map(|tokens| vocab.encode(tokens)).collect();
    let labels = records.iter().map(|r| r.label).collect();
    TextDataset::new(sequences, labels)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let model_config: ModelConfig = load_config(&cli.model_config)?;
    let trainer_config: TrainerConfig = load_config(&cli.training_config)?;
    let w2v_config: Word2VecConfig = load_config(&cli.word2vec_config)?;

    let device = trainer_config.device.resolve();
    println!("Using device: {:?}", device);

    let train_records = load_records(&cli.train, model_config.num_classes)?;
    let test_records = load_records(&cli.test, model_config.num_classes)?;
    println!(
        "Loaded {} train rows, {} test rows",
        train_records.len(),
        test_records.len()
    );

    let word_tokenizer = WordTokenizer::new()?;
    let train_tokens: Vec<Vec<String>> = train_records
        .iter()
        .map(|r| word_tokenizer.tokenize(&r.text))
        .collect();
    let test_tokens: Vec<Vec<String>> = test_records
        .iter()
        .map(|r| word_tokenizer.tokenize(&r.text))
        .collect();

    // Embeddings are trained over both partitions combined, matching the
    // documented pipeline.
    let mut corpus = train_tokens.clone();
    corpus.extend(test_tokens.iter().cloned());
    let Word2Vec { vocab, vectors } = word2vec::train(&corpus, &w2v_config, device)?;
    println!("Word2Vec training complete! Vocabulary size: {}", vocab.len());

    let full_train = encode_dataset(&vocab, &train_tokens, &train_records);
    let test_set = encode_dataset(&vocab, &test_tokens, &test_records);
    let (train_set, val_set) =
        full_train.split(trainer_config.validation_fraction, trainer_config.split_seed);

    let batch_size = trainer_config.batch_size;
    let mut trainer = Trainer::new(&model_config, trainer_config, vectors, device)?;
    trainer.train(&train_set, &val_set)?;

    let accuracy = eval::accuracy(trainer.model(), &test_set, batch_size, device);
    println!("Test Accuracy: {:.4}", accuracy);

    Ok(())
}
