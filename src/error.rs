//! Error taxonomy for the academy core.
//!
//! Every operation that can reject user input has an explicit error channel;
//! nothing fails silently. All variants are recoverable at the call site.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AcademyError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("insufficient funds: need {needed:.2}, have {available:.2}")]
    InsufficientFunds { needed: f64, available: f64 },

    #[error("insufficient shares: hold {held}, tried to sell {requested}")]
    InsufficientShares { held: u32, requested: u32 },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid state: {0}")]
    InvalidState(String),
}

pub type Result<T> = std::result::Result<T, AcademyError>;
