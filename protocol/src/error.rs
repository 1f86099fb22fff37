use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecErr>;

/// Errors raised when a flat vector and a model shape disagree.
#[derive(Debug, PartialEq, Eq)]
pub enum CodecErr {
    /// The flat vector's length is not the shape's total length.
    ShapeMismatch { got: usize, expected: usize },
    /// The structured parameters have a different number of groups.
    GroupCountMismatch { got: usize, expected: usize },
    /// One group's element count differs from its declared length.
    GroupLenMismatch {
        group: String,
        got: usize,
        expected: usize,
    },
}

impl Display for CodecErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecErr::ShapeMismatch { got, expected } => {
                write!(f, "flat vector length mismatch: got {got}, expected {expected}")
            }
            CodecErr::GroupCountMismatch { got, expected } => {
                write!(f, "group count mismatch: got {got}, expected {expected}")
            }
            CodecErr::GroupLenMismatch {
                group,
                got,
                expected,
            } => write!(
                f,
                "group '{group}' length mismatch: got {got}, expected {expected}"
            ),
        }
    }
}

impl Error for CodecErr {}
