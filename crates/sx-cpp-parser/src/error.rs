//! Error types for the sx-cpp-parser crate.
//!
//! This module provides the [`PatchError`] type for errors that can occur
//! while reading, planning and writing patches to C++ source files.

use camino::Utf8PathBuf;

use crate::patch::Anchor;

/// Errors that can occur while patching a source file.
///
/// Planning errors ([`AnchorNotFound`](Self::AnchorNotFound),
/// [`PlaceholderMissing`](Self::PlaceholderMissing)) are raised before any
/// file is written, so a failed plan leaves the tree untouched.
///
/// # Examples
///
/// ```
/// use sx_cpp_parser::{Anchor, PatchError};
/// use camino::Utf8PathBuf;
///
/// let err = PatchError::AnchorNotFound {
///     path: Utf8PathBuf::from("Filters/Foo.hpp"),
///     anchor: Anchor::LastParameterKey,
/// };
/// assert!(err.is_planning_error());
/// assert!(err.to_string().contains("Filters/Foo.hpp"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// Failed to read a file.
    #[error("failed to read {path}")]
    Read {
        /// The path of the file that couldn't be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file back.
    #[error("failed to write {path}")]
    Write {
        /// The path of the file that couldn't be written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The anchor line a patch needs does not exist in the file.
    #[error("no {anchor} found in {path}")]
    AnchorNotFound {
        /// The file that was searched.
        path: Utf8PathBuf,
        /// The anchor that was searched for.
        anchor: Anchor,
    },

    /// The anchor line exists but has no `{}` placeholder to replace.
    #[error("line {line} of {path} has no '{{}}' placeholder")]
    PlaceholderMissing {
        /// The file being patched.
        path: Utf8PathBuf,
        /// 1-indexed line number of the anchor.
        line: usize,
    },
}

impl PatchError {
    /// Creates a new [`PatchError::Read`] error.
    #[inline]
    pub fn read(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`PatchError::Write`] error.
    #[inline]
    pub fn write(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if the error was detected before anything was written.
    #[inline]
    #[must_use]
    pub const fn is_planning_error(&self) -> bool {
        matches!(
            self,
            Self::Read { .. } | Self::AnchorNotFound { .. } | Self::PlaceholderMissing { .. }
        )
    }

    /// Returns the file path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Utf8PathBuf {
        match self {
            Self::Read { path, .. }
            | Self::Write { path, .. }
            | Self::AnchorNotFound { path, .. }
            | Self::PlaceholderMissing { path, .. } => path,
        }
    }
}
