//! Error types for the sx-scanner crate.
//!
//! - [`SchemaError`] covers reading the JSON descriptor files.
//! - [`ResolveError`] covers plugin discovery and UUID resolution.
//!
//! # Error Recovery Strategy
//!
//! Every schema error is fatal: a generator run never continues with a
//! partially read schema. [`ResolveError::UnknownUuid`] and
//! [`ResolveError::NotInSchema`] stop the run before anything is patched.

use camino::Utf8PathBuf;
use sx_core::{LegacyUuid, UuidError};

/// Errors that can occur while reading schema files.
///
/// # Examples
///
/// ```
/// use sx_scanner::SchemaError;
///
/// let err = SchemaError::invalid("simpl_filters.json", "filter name must not be empty");
/// assert!(err.to_string().contains("simpl_filters.json"));
/// assert_eq!(err.path().map(|p| p.as_str()), Some("simpl_filters.json"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Failed to read a schema file.
    #[error("failed to read {path}")]
    Read {
        /// The path of the file that couldn't be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A schema file is not valid JSON for its expected shape.
    #[error("failed to parse {path}")]
    Json {
        /// The path of the file that couldn't be parsed.
        path: Utf8PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A UUID in a schema file is malformed.
    #[error("invalid filter uuid in {path}")]
    Uuid {
        /// The file containing the UUID.
        path: Utf8PathBuf,
        /// The UUID validation error.
        #[source]
        source: UuidError,
    },

    /// A schema file parsed but violates a structural rule.
    #[error("invalid schema {path}: {reason}")]
    Invalid {
        /// The offending file.
        path: Utf8PathBuf,
        /// What is wrong with it.
        reason: String,
    },

    /// Failed to enumerate a descriptor directory.
    #[error("failed to walk directory")]
    Walk(#[from] ignore::Error),

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),
}

impl SchemaError {
    /// Creates a new [`SchemaError::Read`] error.
    #[inline]
    pub fn read(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`SchemaError::Json`] error.
    #[inline]
    pub fn json(path: impl Into<Utf8PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`SchemaError::Invalid`] error.
    #[inline]
    pub fn invalid(path: impl Into<Utf8PathBuf>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns the file path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::Read { path, .. }
            | Self::Json { path, .. }
            | Self::Uuid { path, .. }
            | Self::Invalid { path, .. } => Some(path),
            Self::Walk(_) | Self::NonUtf8Path(_) => None,
        }
    }
}

/// Errors that can occur while building or querying plugin mappings.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The plugins directory does not exist under the source root.
    #[error("plugins directory not found: {0}")]
    MissingPluginsDir(Utf8PathBuf),

    /// Failed to enumerate the plugins directory.
    #[error("failed to walk plugins directory")]
    Walk(#[from] ignore::Error),

    /// A plugin directory name is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),

    /// A mapping file exists but could not be read.
    #[error("failed to read mapping file {path}")]
    Read {
        /// The mapping file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The mapping-row pattern could not be built for the configured namespace.
    #[error("invalid framework namespace")]
    Pattern(#[from] regex::Error),

    /// The UUID is not in the legacy filter schema.
    #[error("filter uuid {0} not found in the SIMPL schema")]
    NotInSchema(LegacyUuid),

    /// No plugin maps the UUID to a filter class.
    #[error("filter uuid {0} not found in any plugin legacy mapping")]
    UnknownUuid(LegacyUuid),
}

impl ResolveError {
    /// Returns the UUID that failed to resolve, if this is a lookup error.
    #[must_use]
    pub const fn uuid(&self) -> Option<&LegacyUuid> {
        match self {
            Self::NotInSchema(uuid) | Self::UnknownUuid(uuid) => Some(uuid),
            _ => None,
        }
    }
}
