use thiserror::Error;

/// Record-level validation failures, raised before any goal is classified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid goal data: {0}")]
    InvalidGoalData(String),

    #[error("Invalid contribution data: {0}")]
    InvalidContributionData(String),
}

pub type Result<T> = std::result::Result<T, ValidationError>;
