//! Legacy (SIMPL) filter descriptors.
//!
//! These records are produced by the SIMPL schema reader and consumed by the
//! conversion emitter. They are never mutated after parsing.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::uuid::LegacyUuid;

/// Parameter type that only groups widgets in the SIMPL UI.
///
/// Parameters of this type carry no data and have no conversion.
pub const SEPARATOR_PARAMETER_TYPE: &str = "SeparatorFilterParameter";

/// A single legacy filter parameter.
///
/// # Examples
///
/// ```
/// use sx_core::ParameterDescriptor;
///
/// let param = ParameterDescriptor::new("Separator", "SeparatorFilterParameter");
/// assert!(param.is_separator());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Parameter name as written in the SIMPL pipeline JSON.
    pub name: String,

    /// Declared SIMPL parameter type, e.g. `BooleanFilterParameter`.
    #[serde(rename = "type")]
    pub source_type: String,
}

impl ParameterDescriptor {
    /// Creates a new parameter descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, source_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_type: source_type.into(),
        }
    }

    /// Returns `true` for UI-only separator parameters.
    #[inline]
    #[must_use]
    pub fn is_separator(&self) -> bool {
        self.source_type == SEPARATOR_PARAMETER_TYPE
    }
}

/// A legacy filter and its parameter schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    /// Human-facing SIMPL filter name.
    pub name: String,

    /// Normalized filter UUID.
    pub uuid: LegacyUuid,

    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: SmallVec<[ParameterDescriptor; 8]>,
}

impl FilterDescriptor {
    /// Returns the parameters that take part in conversion, skipping separators.
    pub fn convertible_parameters(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.parameters.iter().filter(|p| !p.is_separator())
    }
}
