use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("deck exhausted: no cards left to draw")]
    DeckExhausted,
    #[error("unknown strategy: {0}")]
    InvalidStrategy(String),
    #[error("invalid bet: {0}")]
    InvalidBet(String),
    #[error("invalid card: {0}")]
    InvalidCard(String),
}
