use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuotaError {
    #[error("the daily limit reduction amount must be an integer, got {0:?}")]
    InvalidAmount(String),
}
