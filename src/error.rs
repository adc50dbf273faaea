//! Error types for the gameai crate

use thiserror::Error;

/// Everything that can go wrong while searching or driving a game.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid move: {mv} is not legal in this position")]
    InvalidMove { mv: String },

    #[error("no legal moves available")]
    NoLegalMoves,

    #[error("cache inconsistency at {key}: stored score {stored}, fresh score {fresh}")]
    CacheInconsistency {
        key: String,
        stored: i32,
        fresh: i32,
    },

    /// A search reached a state its own bookkeeping rules out.
    #[error("search invariant broken: {0}")]
    SearchInvariant(&'static str),

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("failed to read config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid_move<M: std::fmt::Debug>(mv: &M) -> Self {
        Error::InvalidMove {
            mv: format!("{:?}", mv),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfig {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_move_formats_the_move() {
        let err = Error::invalid_move(&7usize);
        assert_eq!(err.to_string(), "invalid move: 7 is not legal in this position");
    }

    #[test]
    fn cache_inconsistency_reports_both_scores() {
        let err = Error::CacheInconsistency {
            key: "25".into(),
            stored: 100,
            fresh: -100,
        };
        assert!(err.to_string().contains("stored score 100"));
        assert!(err.to_string().contains("fresh score -100"));
    }
}
