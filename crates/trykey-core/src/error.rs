use thiserror::Error;

pub type TrykeyResult<T> = Result<T, TrykeyError>;

#[derive(Debug, Error)]
pub enum TrykeyError {
    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
