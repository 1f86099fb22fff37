use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

use protocol::CodecErr;

use crate::session::Phase;

/// The client's result type.
pub type Result<T> = std::result::Result<T, ClientErr>;

/// Client runtime failures.
#[derive(Debug)]
pub enum ClientErr {
    /// Transport-level failure talking to the coordinator.
    Http(reqwest::Error),
    /// The coordinator answered with a structured error.
    Server { status: u16, message: String },
    /// The operation is not valid in the session's current phase.
    InvalidState {
        operation: &'static str,
        phase: Phase,
    },
    /// No join code is known; join first.
    MissingJoinCode,
    /// No contract is loaded or persisted; join first.
    MissingContract,
    /// No training result is persisted; train first.
    MissingResult,
    /// No built-in trainer covers this model kind.
    UnsupportedModel(String),
    EmptyDataset,
    /// Dataset rows disagree with the contract's feature count.
    FeatureWidthMismatch { got: usize, expected: usize },
    /// Feature rows and targets disagree in count.
    SampleCountMismatch { rows: usize, targets: usize },
    Codec(CodecErr),
    Io(io::Error),
    Json(serde_json::Error),
}

impl Display for ClientErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientErr::Http(e) => write!(f, "http error: {e}"),
            ClientErr::Server { status, message } => {
                write!(f, "server error ({status}): {message}")
            }
            ClientErr::InvalidState { operation, phase } => {
                write!(f, "cannot {operation} while {phase}")
            }
            ClientErr::MissingJoinCode => write!(f, "no join code known, join a round first"),
            ClientErr::MissingContract => write!(f, "no contract available, join a round first"),
            ClientErr::MissingResult => write!(f, "no training result available, train first"),
            ClientErr::UnsupportedModel(kind) => {
                write!(f, "no built-in trainer for model kind '{kind}'")
            }
            ClientErr::EmptyDataset => write!(f, "dataset has no samples"),
            ClientErr::FeatureWidthMismatch { got, expected } => write!(
                f,
                "dataset feature width mismatch: got {got}, expected {expected}"
            ),
            ClientErr::SampleCountMismatch { rows, targets } => write!(
                f,
                "dataset sample count mismatch: {rows} feature rows, {targets} targets"
            ),
            ClientErr::Codec(e) => write!(f, "codec error: {e}"),
            ClientErr::Io(e) => write!(f, "io error: {e}"),
            ClientErr::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl Error for ClientErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ClientErr::Http(e) => Some(e),
            ClientErr::Codec(e) => Some(e),
            ClientErr::Io(e) => Some(e),
            ClientErr::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientErr {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

impl From<CodecErr> for ClientErr {
    fn from(value: CodecErr) -> Self {
        Self::Codec(value)
    }
}

impl From<io::Error> for ClientErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ClientErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Boundary conversion for the binary's io-flavored main.
impl From<ClientErr> for io::Error {
    fn from(value: ClientErr) -> Self {
        match value {
            ClientErr::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other.to_string()),
        }
    }
}
