//! Error types for playlist conversion
//!
//! Every error belongs to one (playlist, format) operation. The pipeline
//! reports it and moves on to the next operation, so nothing here is
//! fatal except a source directory that cannot be listed.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Broad classification of a conversion failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The input exists but its content cannot be interpreted
    InputMalformed,
    /// An input file or the data expected in it is absent
    InputMissing,
    /// The destination could not be produced
    Output,
}

#[derive(Debug, Error)]
pub enum ConvertError {
    // =========================================================================
    // Malformed input
    // =========================================================================
    #[error("{path}:{line}: missing '{delimiter}' in #EXTINF entry")]
    MissingDelimiter {
        path: PathBuf,
        line: usize,
        delimiter: &'static str,
    },

    #[error("{path}:{line}: #EXTINF entry is not followed by a file location")]
    MissingLocation { path: PathBuf, line: usize },

    #[error("{path}:{line}: expected at least {expected} tab-separated fields, found {found}")]
    MalformedRow {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("date added '{date_added}' of track '{title}' is too short to contain a year")]
    DateTooShort { title: String, date_added: String },

    #[error("malformed percent-escape at byte {offset} in '{value}'")]
    MalformedEscape { value: String, offset: usize },

    #[error("percent-decoded '{value}' is not valid UTF-8")]
    InvalidUtf8 { value: String },

    #[error("{path}: text is not valid UTF-8 or UTF-16")]
    InvalidEncoding { path: PathBuf },

    // =========================================================================
    // Missing input
    // =========================================================================
    #[error("cannot read '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: metadata ran out after {filled} of {expected} tracks")]
    MetadataExhausted {
        path: PathBuf,
        expected: usize,
        filled: usize,
    },

    #[error("playlist '{playlist}' has no track entries")]
    EmptyPlaylist { playlist: String },

    #[error("cannot list source directory '{path}': {reason}")]
    SourceDir { path: PathBuf, reason: String },

    // =========================================================================
    // Output
    // =========================================================================
    #[error("cannot write output to '{path}': {reason}")]
    Output { path: PathBuf, reason: String },

    #[error("cannot encode playlist '{playlist}': {reason}")]
    Encode { playlist: String, reason: String },
}

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, ConvertError>;

impl ConvertError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConvertError::MissingDelimiter { .. }
            | ConvertError::MissingLocation { .. }
            | ConvertError::MalformedRow { .. }
            | ConvertError::DateTooShort { .. }
            | ConvertError::MalformedEscape { .. }
            | ConvertError::InvalidUtf8 { .. }
            | ConvertError::InvalidEncoding { .. } => ErrorCategory::InputMalformed,
            ConvertError::Open { .. }
            | ConvertError::MetadataExhausted { .. }
            | ConvertError::EmptyPlaylist { .. }
            | ConvertError::SourceDir { .. } => ErrorCategory::InputMissing,
            ConvertError::Output { .. } | ConvertError::Encode { .. } => ErrorCategory::Output,
        }
    }

    pub fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Open {
            path: path.into(),
            source,
        }
    }

    /// Create an output error, spelling out the common causes
    pub fn output(path: &Path, err: std::io::Error) -> Self {
        let reason = match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                format!("permission denied, check write access to {}", path.display())
            }
            std::io::ErrorKind::NotFound => format!(
                "directory does not exist: {}",
                path.parent()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            ),
            _ => err.to_string(),
        };
        ConvertError::Output {
            path: path.to_path_buf(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let err = ConvertError::MalformedRow {
            path: PathBuf::from("set.txt"),
            line: 3,
            expected: 11,
            found: 4,
        };
        assert_eq!(err.category(), ErrorCategory::InputMalformed);

        let err = ConvertError::MetadataExhausted {
            path: PathBuf::from("set.txt"),
            expected: 3,
            filled: 2,
        };
        assert_eq!(err.category(), ErrorCategory::InputMissing);

        let err = ConvertError::output(
            Path::new("/nowhere/set.xml"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert_eq!(err.category(), ErrorCategory::Output);
        assert!(err.to_string().contains("/nowhere"));
    }

    #[test]
    fn test_message_carries_location() {
        let err = ConvertError::MissingDelimiter {
            path: PathBuf::from("set.m3u8"),
            line: 7,
            delimiter: " - ",
        };
        assert_eq!(err.to_string(), "set.m3u8:7: missing ' - ' in #EXTINF entry");
    }
}
