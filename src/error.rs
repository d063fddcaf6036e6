use std::error::Error;
use std::fmt;

/// Errors surfaced at the command boundary. The search itself never returns
/// these; it signals interruption through a sentinel score instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Malformed FEN or command text. Recoverable; the engine keeps running.
    ParseError(String),
    /// A requested move is not legal in the current position.
    IllegalMove(String),
    /// Corrupt internal state (Zobrist mismatch, impossible castling, ...).
    /// Fatal in debug builds, salvaged with best effort in release.
    InvariantViolation(String),
    /// Allocation failure for a table the engine cannot run without.
    ResourceExhaustion(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::ParseError(msg) => write!(f, "parse error: {msg}"),
            EngineError::IllegalMove(msg) => write!(f, "illegal move: {msg}"),
            EngineError::InvariantViolation(msg) => write!(f, "invariant violation: {msg}"),
            EngineError::ResourceExhaustion(msg) => write!(f, "resource exhaustion: {msg}"),
        }
    }
}

impl Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_detail() {
        let err = EngineError::ParseError("bad fen".into());
        assert_eq!(err.to_string(), "parse error: bad fen");
        let err = EngineError::IllegalMove("e2e5".into());
        assert!(err.to_string().contains("e2e5"));
    }
}
