use thiserror::Error;

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("at least 3 dice are required, got {0}")]
    NotEnoughDice(usize),

    #[error("invalid dice format '{spec}': {reason}")]
    InvalidDiceSpec { spec: String, reason: String },

    #[error("each die must have exactly 6 faces, '{spec}' has {found}")]
    WrongFaceCount { spec: String, found: usize },

    #[error("dice pool has no die at index {0}")]
    NoSuchDie(usize),

    #[error("commitment integrity failure: revealed value and key do not reproduce the published HMAC")]
    CommitmentIntegrity,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GameError {
    pub fn invalid_spec(spec: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDiceSpec {
            spec: spec.into(),
            reason: reason.into(),
        }
    }
}
