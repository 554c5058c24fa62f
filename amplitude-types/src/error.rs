use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the amplitude workspace.
///
/// This wraps data-shape problems, argument validation errors, storage
/// failures, and the alignment outcome that leaves nothing to analyse.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AmplitudeError {
    /// Issues with the loaded or computed data (mismatched widths, missing fields, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A series was built from entries that repeat a key.
    #[error("duplicate key in {series}: {key}")]
    DuplicateKey {
        /// Label of the series being constructed (e.g. "INDEX_^BVSP.csv").
        series: String,
        /// Debug rendering of the repeated key.
        key: String,
    },

    /// A resource or market could not be found.
    #[error("not found: {what}")]
    NotFound {
        /// Description of missing resource, e.g. "index file for ^GSPC".
        what: String,
    },

    /// Two series that had to be analysed together share no dates.
    #[error("no common dates between {left} and {right}")]
    NoCommonDates {
        /// Label of the first series.
        left: String,
        /// Label of the second series.
        right: String,
    },

    /// Reading or writing a file failed.
    #[error("i/o failure at {path}: {msg}")]
    Io {
        /// Path that was being accessed.
        path: String,
        /// Underlying error message.
        msg: String,
    },

    /// A CSV file could not be parsed into the expected layout.
    #[error("malformed csv {path}: {msg}")]
    Csv {
        /// Path of the offending file.
        path: String,
        /// Human-readable parse failure.
        msg: String,
    },

    /// Configuration is invalid or could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl AmplitudeError {
    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build a `DuplicateKey` error from a series label and a key.
    pub fn duplicate_key(series: impl Into<String>, key: &impl std::fmt::Debug) -> Self {
        Self::DuplicateKey {
            series: series.into(),
            key: format!("{key:?}"),
        }
    }

    /// Helper: build a `NoCommonDates` error.
    pub fn no_common_dates(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::NoCommonDates {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Helper: build an `Io` error from a path and any displayable cause.
    pub fn io(path: impl AsRef<std::path::Path>, err: impl std::fmt::Display) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            msg: err.to_string(),
        }
    }

    /// Helper: build a `Csv` error from a path and a message.
    pub fn csv(path: impl AsRef<std::path::Path>, msg: impl Into<String>) -> Self {
        Self::Csv {
            path: path.as_ref().display().to_string(),
            msg: msg.into(),
        }
    }

    /// Returns true if the error points at missing input rather than a broken one.
    ///
    /// Callers iterating over many markets use this to skip markets whose files
    /// were never produced while still surfacing corrupt data.
    #[must_use]
    pub const fn is_missing_input(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::NoCommonDates { .. })
    }
}
