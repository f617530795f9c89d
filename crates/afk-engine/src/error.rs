//! Error types for afk-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AfkError {
    /// The extraction engine found no time expression in the phrase.
    #[error("Unparseable phrase: {0}")]
    Unparseable(String),

    #[error("Invalid UTC offset: {0}")]
    InvalidOffset(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),
}

pub type Result<T> = std::result::Result<T, AfkError>;
