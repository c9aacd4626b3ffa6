//! Error and warning types for the sx-codegen crate.
//!
//! Emitters separate two failure classes:
//!
//! - [`EmitError`] / [`TemplateError`]: the fragment cannot be produced at all.
//! - [`EmitWarning`]: the fragment was produced but contains a visible
//!   placeholder. Warnings travel with the text in [`Emitted`] so a batch run
//!   can finish and still report them.

use std::fmt;

use camino::Utf8PathBuf;

/// Errors that stop a fragment from being emitted.
///
/// # Examples
///
/// ```
/// use sx_codegen::EmitError;
///
/// let err = EmitError::UnsupportedType {
///     filter: "FooImageFilter".to_owned(),
///     member: "Mode".to_owned(),
///     type_name: "itk::Mode".to_owned(),
/// };
/// assert!(err.to_string().contains("itk::Mode"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// A member's type tag maps to no parameter kind.
    #[error("{filter}: member '{member}' has unsupported type '{type_name}'")]
    UnsupportedType {
        /// ITK filter name.
        filter: String,
        /// Member name.
        member: String,
        /// The tag that was looked up (`itk_type` or `type`).
        type_name: String,
    },

    /// A `KernelType` member needs a `KernelRadius` member to build the
    /// structuring element from.
    #[error("{filter}: member 'KernelType' requires a 'KernelRadius' member")]
    MissingKernelRadius {
        /// ITK filter name.
        filter: String,
    },

    /// A test fixture sets a member the filter does not declare.
    #[error("{filter}: test '{tag}' sets unknown parameter '{parameter}'")]
    UnknownTestParameter {
        /// ITK filter name.
        filter: String,
        /// Test fixture tag.
        tag: String,
        /// The parameter named by the setting.
        parameter: String,
    },

    /// Template rendering failed.
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Errors raised while loading or rendering a `$NAME` template.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The template file could not be read.
    #[error("failed to read template {path}")]
    Read {
        /// Template path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The placeholder pattern failed to compile.
    #[error("failed to compile placeholder pattern")]
    Pattern(#[from] regex::Error),

    /// The template references a key that was not supplied.
    #[error("template {template} references missing key '{key}'")]
    MissingKey {
        /// Template name.
        template: String,
        /// The missing key.
        key: String,
    },
}

/// A non-fatal problem recorded while emitting a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitWarning {
    /// The pixel type list has no allowed-types mapping.
    UnknownPixelType {
        /// ITK filter name.
        filter: String,
        /// `pixel_types` as given.
        pixel_types: String,
        /// `vector_pixel_types_by_component` as given, possibly empty.
        vector_pixel_types: String,
    },
}

impl fmt::Display for EmitWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPixelType {
                filter,
                pixel_types,
                vector_pixel_types,
            } => {
                write!(f, "{filter}: unknown pixel type list '{pixel_types}'")?;
                if !vector_pixel_types.is_empty() {
                    write!(f, " with vector types '{vector_pixel_types}'")?;
                }
                Ok(())
            }
        }
    }
}

/// Generated text plus the warnings recorded while producing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Emitted {
    /// The generated text.
    pub text: String,
    /// Warnings, in the order they were found.
    pub warnings: Vec<EmitWarning>,
}

impl Emitted {
    /// Wraps text that produced no warnings.
    #[must_use]
    pub fn clean(text: String) -> Self {
        Self {
            text,
            warnings: Vec::new(),
        }
    }

    /// Returns `true` if any warning was recorded.
    #[inline]
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_pixel_type_display() {
        let warning = EmitWarning::UnknownPixelType {
            filter: "FooImageFilter".to_owned(),
            pixel_types: "OddPixelIDTypeList".to_owned(),
            vector_pixel_types: String::new(),
        };
        assert_eq!(
            warning.to_string(),
            "FooImageFilter: unknown pixel type list 'OddPixelIDTypeList'"
        );
    }

    #[test]
    fn test_template_error_converts() {
        let err: EmitError = TemplateError::MissingKey {
            template: "filter.hpp.in".to_owned(),
            key: "FILTER_NAME".to_owned(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "template filter.hpp.in references missing key 'FILTER_NAME'"
        );
    }

    #[test]
    fn test_emitted_clean_has_no_warnings() {
        let emitted = Emitted::clean("text".to_owned());
        assert!(!emitted.has_warnings());
    }
}
