//! Error types shared by the grid and the growth engines.

use std::error::Error;
use std::fmt;

/// Errors from grid access and engine operations.
///
/// Every operation that returns one of these has left the grid untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GrainError {
    /// An argument was rejected before any state was mutated
    /// (zero radius or count, malformed dimensions, unknown kernel).
    InvalidArgument {
        /// What was wrong with the argument.
        reason: String,
    },
    /// A coordinate lies outside the grid. This is a programming error in
    /// the caller, not a user-facing condition.
    OutOfRange {
        /// Offending x coordinate.
        x: i64,
        /// Offending y coordinate.
        y: i64,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },
    /// More grains or nucleations were requested than there are eligible
    /// cells.
    InsufficientSpace {
        /// Number of cells requested.
        requested: usize,
        /// Number of eligible cells available.
        available: usize,
    },
}

impl GrainError {
    /// Shorthand for [`GrainError::InvalidArgument`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { reason } => write!(f, "invalid argument: {reason}"),
            Self::OutOfRange {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "coordinate ({x}, {y}) out of range: [0, {width}) x [0, {height})"
            ),
            Self::InsufficientSpace {
                requested,
                available,
            } => write!(
                f,
                "insufficient space: requested {requested} cells, {available} available"
            ),
        }
    }
}

impl Error for GrainError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            GrainError::invalid("radius must be >= 1").to_string(),
            "invalid argument: radius must be >= 1"
        );
        let oob = GrainError::OutOfRange {
            x: -1,
            y: 2,
            width: 5,
            height: 4,
        };
        assert_eq!(
            oob.to_string(),
            "coordinate (-1, 2) out of range: [0, 5) x [0, 4)"
        );
        let full = GrainError::InsufficientSpace {
            requested: 10,
            available: 3,
        };
        assert!(full.to_string().contains("requested 10"));
    }
}
