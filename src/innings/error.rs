use thiserror::Error;

/// Rejected input. Always raised before any feature is derived.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Batting and Bowling teams must be different")]
    SameBattingAndBowling,
    #[error("Teams must be different")]
    SameChasingAndDefending,
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
        value: u32,
    },
}

/// The model collaborator could not produce a usable output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("model '{model}' has no coefficient for column '{column}'")]
    UnknownColumn { model: String, column: String },
    #[error("model '{model}' expects {column} as {kind}")]
    ColumnKind {
        model: String,
        column: String,
        kind: &'static str,
    },
    #[error("model produced a non-finite output: {0}")]
    NonFinite(f64),
    #[error("model score {0} is outside the displayable range")]
    ScoreOutOfRange(f64),
    #[error("invalid probability distribution [{0}, {1}]")]
    InvalidDistribution(f64, f64),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),
}
