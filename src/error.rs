use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by the compression engine and the partition file reader.
#[derive(Debug, Error)]
pub enum Error {
    /// A checked access asked for a position past the end of the sequence.
    #[error("index {index} out of bounds for sequence of length {len}")]
    OutOfBounds {
        /// Requested logical position.
        index: usize,
        /// Length of the sequence at the time of the access.
        len: usize,
    },

    /// The engine configuration cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The partition file could not be opened or read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A line could not be read from an in-memory or streamed reader.
    #[error("failed to read line {line}: {source}")]
    Read {
        /// 1-based line number.
        line: usize,
        #[source]
        source: io::Error,
    },

    /// A line of the partition file is not a valid number.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        message: String,
    },
}

/// Result type for engine and reader operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_message() {
        let err = Error::OutOfBounds { index: 7, len: 3 };
        assert_eq!(
            err.to_string(),
            "index 7 out of bounds for sequence of length 3"
        );
    }

    #[test]
    fn test_parse_message() {
        let err = Error::Parse {
            line: 4,
            message: "invalid digit found in string".to_string(),
        };
        assert_eq!(err.to_string(), "line 4: invalid digit found in string");
    }

    #[test]
    fn test_read_message() {
        let err = Error::Read {
            line: 2,
            source: io::Error::new(io::ErrorKind::UnexpectedEof, "stream closed"),
        };
        assert_eq!(err.to_string(), "failed to read line 2: stream closed");
    }
}
