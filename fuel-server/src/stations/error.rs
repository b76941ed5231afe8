//! Station catalog error types.

use std::path::PathBuf;

/// Errors that can occur when loading or querying the station catalog.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// The price file could not be opened
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row of the price file could not be parsed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The backing store could not answer a query
    #[error("catalog unavailable: {message}")]
    Unavailable { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StationError::Unavailable {
            message: "connection reset".into(),
        };
        assert_eq!(err.to_string(), "catalog unavailable: connection reset");

        let err = StationError::Io {
            path: PathBuf::from("/data/prices.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "failed to open /data/prices.csv: missing");
    }
}
