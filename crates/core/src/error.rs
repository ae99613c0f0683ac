use thiserror::Error;

use crate::session::{Operation, Status};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    #[error("Game not found: {0}")]
    NotFound(String),
    #[error("Not enough money! Purchase costs {cost:.2} but only {available:.2} is available")]
    InsufficientFunds { cost: f64, available: f64 },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("Unknown tool: {0}")]
    UnknownOperation(String),
    #[error("cannot {operation} while the stand is {status}")]
    IllegalTransition { operation: Operation, status: Status },
}

impl GameError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }
}

pub type GameResult<T> = Result<T, GameError>;
