pub mod config;
pub mod model;

pub use config::ModelConfig;
pub use model::LstmClassifier;
