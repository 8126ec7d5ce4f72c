use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenizerError {
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, TokenizerError>;
