use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid range: {0}")]
    InvalidRange(String),

    #[error("sheet store unavailable: {0}")]
    Unavailable(String),
}
