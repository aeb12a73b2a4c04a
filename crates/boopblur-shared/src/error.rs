use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecayTableError {
    #[error("Decay table must contain at least one threshold")]
    Empty,

    #[error("Decay thresholds must be strictly ascending: {previous} then {next}")]
    NotAscending { previous: i64, next: i64 },

    #[error("Invalid decay table entry: {0}")]
    InvalidEntry(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unrecognized deletion policy: {0}")]
pub struct ParsePolicyError(pub String);
