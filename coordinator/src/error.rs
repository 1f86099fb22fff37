use std::{
    error::Error,
    fmt::{self, Display},
};

/// The coordinator's result type.
pub type Result<T> = std::result::Result<T, CoordErr>;

/// Request failures the coordinator reports back to clients.
///
/// Validation happens before any mutation: a request that fails with one of
/// these leaves the round record exactly as it was.
#[derive(Debug, PartialEq, Eq)]
pub enum CoordErr {
    /// The join code is not on the allow-list. Non-retryable without a
    /// valid code.
    InvalidJoinCode,
    /// Sync or upload arrived before any join initialized the round.
    /// Retryable after a join.
    RoundNotStarted,
    /// The submitted update disagrees with the fixed model shape. Indicates
    /// a stale contract; recovery is sync then retry.
    LengthMismatch { got: usize, expected: usize },
}

impl Display for CoordErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordErr::InvalidJoinCode => write!(f, "Invalid join code"),
            CoordErr::RoundNotStarted => {
                write!(f, "round not started: no client has joined yet")
            }
            CoordErr::LengthMismatch { got, expected } => write!(
                f,
                "model update length mismatch: got {got}, expected {expected}"
            ),
        }
    }
}

impl Error for CoordErr {}
