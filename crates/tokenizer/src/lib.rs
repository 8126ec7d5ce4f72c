pub mod error;
pub mod tokenize;
pub mod vocab;

pub use error::TokenizerError;
pub use tokenize::WordTokenizer;
pub use vocab::Vocab;
