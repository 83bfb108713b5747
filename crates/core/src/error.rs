//! Error types for core value parsing

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown income source: {0}")]
    UnknownIncomeSource(String),

    #[error("Invalid conversation step: {0}")]
    InvalidStep(String),
}

pub type Result<T> = std::result::Result<T, Error>;
