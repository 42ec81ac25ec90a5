//! Error types for the core crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid net policy: {0}")]
    InvalidNetPolicy(String),

    #[error("Invalid investor status: {0}")]
    InvalidInvestorStatus(String),

    #[error("Invalid compensation model: {0}")]
    InvalidCompensationModel(String),
}
