//! Error types for the sx-core crate.
//!
//! This module provides [`ConfigError`] for configuration loading failures and
//! [`UuidError`] for malformed legacy filter UUIDs.

use camino::Utf8PathBuf;

/// Errors that can occur during configuration loading and validation.
///
/// # Examples
///
/// ```
/// use sx_core::ConfigError;
/// use camino::Utf8PathBuf;
///
/// let error = ConfigError::MissingDirectory(Utf8PathBuf::from("/some/path"));
/// assert!(error.to_string().contains("/some/path"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required directory does not exist.
    #[error("missing required directory: {0}")]
    MissingDirectory(Utf8PathBuf),

    /// A configuration option has an invalid value.
    #[error("invalid configuration option '{option}': {reason}")]
    InvalidOption {
        /// The name of the invalid option.
        option: String,
        /// Explanation of why the option is invalid.
        reason: String,
    },

    /// The configuration file could not be read.
    #[error("failed to read configuration {path}")]
    Io {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the configuration file.
    #[error("failed to parse configuration {path}")]
    Parse {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// A legacy filter UUID that is not a canonical 36-character UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid filter uuid '{raw}': {reason}")]
pub struct UuidError {
    /// The raw value as it appeared in the input.
    pub raw: String,
    /// What is wrong with it.
    pub reason: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_display() {
        let error = ConfigError::MissingDirectory(Utf8PathBuf::from("/missing/dir"));
        assert!(error.to_string().contains("/missing/dir"));
    }

    #[test]
    fn test_invalid_option_display() {
        let error = ConfigError::InvalidOption {
            option: "plugins_dir".to_owned(),
            reason: "must be relative".to_owned(),
        };
        let msg = error.to_string();
        assert!(msg.contains("plugins_dir"));
        assert!(msg.contains("must be relative"));
    }

    #[test]
    fn test_uuid_error_display() {
        let error = UuidError {
            raw: "{nope}".to_owned(),
            reason: "expected 36 characters",
        };
        assert_eq!(
            error.to_string(),
            "invalid filter uuid '{nope}': expected 36 characters"
        );
    }
}
