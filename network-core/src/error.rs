//! Error types for parsing moves and sides from text

/// Failure to parse a `Move` or `Side` from its text form
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty move text")]
    Empty,

    #[error("unknown move kind: {0} (expected `add` or `step`)")]
    UnknownKind(String),

    #[error("`{kind}` takes {expected} coordinates, got {found}")]
    WrongArity {
        kind: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid coordinate: {0}")]
    BadCoordinate(String),

    #[error("unknown side: {0} (expected `black` or `white`)")]
    UnknownSide(String),
}
