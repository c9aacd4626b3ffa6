//! Pixel type list resolution.
//!
//! SimpleITK instantiates each filter for a named pixel type list. The
//! generated filter needs two things from that list: the allowed-types
//! accessor used by its input array parameter, and the `ArrayOptionsType`
//! list the execute dispatch is instantiated over.
//!
//! | `pixel_types` | `vector_pixel_types_by_component` | Options type |
//! |---------------|-----------------------------------|--------------|
//! | `BasicPixelIDTypeList` / `ScalarPixelIDTypeList` | | `ScalarPixelIdTypeList` |
//! | `IntegerPixelIDTypeList` | | `IntegerScalarPixelIdTypeList` |
//! | `SignedPixelIDTypeList` | | `SignedScalarPixelIdTypeList` |
//! | `RealPixelIDTypeList` | | `FloatingScalarPixelIdTypeList` |
//! | `NonLabelPixelIDTypeList` | | `ScalarVectorPixelIdTypeList` |
//! | `VectorPixelIDTypeList` | | `VectorPixelIdTypeList` |
//! | `RealVectorPixelIDTypeList` | | `FloatingVectorPixelIdTypeList` |
//! | `BasicPixelIDTypeList` | `VectorPixelIDTypeList` | `ScalarVectorPixelIdTypeList` |
//! | `RealPixelIDTypeList` | `RealVectorPixelIDTypeList` | `FloatingScalarVectorPixelIdTypeList` |
//!
//! Anything else resolves to [`UNKNOWN_PIXEL_TYPE`] in both slots.

use sx_core::ItkFilterDescriptor;

use super::kind::NumericType;
use crate::error::EmitWarning;

/// Placeholder written into generated code for an unmapped pixel type list.
pub const UNKNOWN_PIXEL_TYPE: &str = "UNKNOWN PIXEL TYPE";

/// A known pixel type list combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelTypeList {
    /// Every scalar type.
    Scalar,
    /// Integer scalars.
    Integer,
    /// Signed scalars.
    Signed,
    /// Floating-point scalars.
    Real,
    /// Scalars and vectors, excluding label maps.
    NonLabel,
    /// Vectors of any component type.
    Vector,
    /// Vectors of floating-point components.
    RealVector,
    /// Scalars plus vectors processed per component.
    ScalarVector,
    /// Floating scalars plus floating vectors processed per component.
    RealScalarVector,
}

impl PixelTypeList {
    /// Looks up a `pixel_types` / `vector_pixel_types_by_component` pair.
    #[must_use]
    pub fn from_names(pixel_types: &str, vector_by_component: &str) -> Option<Self> {
        let list = match (pixel_types.trim(), vector_by_component.trim()) {
            ("BasicPixelIDTypeList" | "ScalarPixelIDTypeList", "") => Self::Scalar,
            ("IntegerPixelIDTypeList", "") => Self::Integer,
            ("SignedPixelIDTypeList", "") => Self::Signed,
            ("RealPixelIDTypeList", "") => Self::Real,
            ("NonLabelPixelIDTypeList", "") => Self::NonLabel,
            ("VectorPixelIDTypeList", "") => Self::Vector,
            ("RealVectorPixelIDTypeList", "") => Self::RealVector,
            ("BasicPixelIDTypeList" | "ScalarPixelIDTypeList", "VectorPixelIDTypeList") => {
                Self::ScalarVector
            }
            ("RealPixelIDTypeList", "RealVectorPixelIDTypeList") => Self::RealScalarVector,
            _ => return None,
        };
        Some(list)
    }

    /// Returns the allowed-types accessor expression.
    #[must_use]
    pub const fn allowed_types(self) -> &'static str {
        match self {
            Self::Scalar => "ITK::GetScalarPixelAllowedTypes()",
            Self::Integer => "ITK::GetIntegerScalarPixelAllowedTypes()",
            Self::Signed => "ITK::GetSignedScalarPixelAllowedTypes()",
            Self::Real => "ITK::GetFloatingScalarPixelAllowedTypes()",
            Self::NonLabel | Self::ScalarVector => "ITK::GetScalarVectorPixelAllowedTypes()",
            Self::Vector => "ITK::GetVectorPixelAllowedTypes()",
            Self::RealVector => "ITK::GetFloatingVectorPixelAllowedTypes()",
            Self::RealScalarVector => "ITK::GetFloatingScalarVectorPixelAllowedTypes()",
        }
    }

    /// Returns the type list the execute dispatch is instantiated over.
    #[must_use]
    pub const fn array_options(self) -> &'static str {
        match self {
            Self::Scalar => "ITK::ScalarPixelIdTypeList",
            Self::Integer => "ITK::IntegerScalarPixelIdTypeList",
            Self::Signed => "ITK::SignedScalarPixelIdTypeList",
            Self::Real => "ITK::FloatingScalarPixelIdTypeList",
            Self::NonLabel | Self::ScalarVector => "ITK::ScalarVectorPixelIdTypeList",
            Self::Vector => "ITK::VectorPixelIdTypeList",
            Self::RealVector => "ITK::FloatingVectorPixelIdTypeList",
            Self::RealScalarVector => "ITK::FloatingScalarVectorPixelIdTypeList",
        }
    }
}

/// The pixel type fragments of one filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelResolution {
    /// Allowed-types accessor, or [`UNKNOWN_PIXEL_TYPE`].
    pub allowed_types: String,
    /// Array options type list, or [`UNKNOWN_PIXEL_TYPE`].
    pub array_options: String,
    /// Set when the combination is not in the table.
    pub warning: Option<EmitWarning>,
}

impl PixelResolution {
    /// Resolves a filter's pixel type list.
    #[must_use]
    pub fn resolve(filter: &ItkFilterDescriptor) -> Self {
        match PixelTypeList::from_names(&filter.pixel_types, &filter.vector_pixel_types_by_component)
        {
            Some(list) => Self {
                allowed_types: list.allowed_types().to_owned(),
                array_options: list.array_options().to_owned(),
                warning: None,
            },
            None => Self {
                allowed_types: UNKNOWN_PIXEL_TYPE.to_owned(),
                array_options: UNKNOWN_PIXEL_TYPE.to_owned(),
                warning: Some(EmitWarning::UnknownPixelType {
                    filter: filter.name.clone(),
                    pixel_types: filter.pixel_types.clone(),
                    vector_pixel_types: filter.vector_pixel_types_by_component.clone(),
                }),
            },
        }
    }
}

/// Returns the `FilterOutputType` alias target, if the filter declares one.
///
/// Known C++ spellings map to the framework alias; anything else is passed
/// through verbatim.
#[must_use]
pub fn output_type(filter: &ItkFilterDescriptor) -> Option<String> {
    let raw = filter.output_pixel_type.trim();
    if raw.is_empty() {
        return None;
    }
    let ty = NumericType::from_cpp(raw).map_or_else(|| raw.to_owned(), |t| t.value_type().to_owned());
    Some(ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(json: &str) -> ItkFilterDescriptor {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_known_list() {
        let f = filter(r#"{"name": "MedianImageFilter", "pixel_types": "BasicPixelIDTypeList"}"#);
        let pixel = PixelResolution::resolve(&f);
        assert_eq!(pixel.allowed_types, "ITK::GetScalarPixelAllowedTypes()");
        assert_eq!(pixel.array_options, "ITK::ScalarPixelIdTypeList");
        assert!(pixel.warning.is_none());
    }

    #[test]
    fn test_vector_by_component_combination() {
        let f = filter(
            r#"{"name": "F", "pixel_types": "BasicPixelIDTypeList", "vector_pixel_types_by_component": "VectorPixelIDTypeList"}"#,
        );
        let pixel = PixelResolution::resolve(&f);
        assert_eq!(pixel.array_options, "ITK::ScalarVectorPixelIdTypeList");
    }

    #[test]
    fn test_unknown_list_warns_and_uses_placeholder() {
        let f = filter(r#"{"name": "OddImageFilter", "pixel_types": "LabelPixelIDTypeList"}"#);
        let pixel = PixelResolution::resolve(&f);
        assert_eq!(pixel.allowed_types, UNKNOWN_PIXEL_TYPE);
        assert_eq!(pixel.array_options, UNKNOWN_PIXEL_TYPE);
        assert_eq!(
            pixel.warning,
            Some(EmitWarning::UnknownPixelType {
                filter: "OddImageFilter".to_owned(),
                pixel_types: "LabelPixelIDTypeList".to_owned(),
                vector_pixel_types: String::new(),
            })
        );
    }

    #[test]
    fn test_unknown_combination_with_known_base() {
        let f = filter(
            r#"{"name": "F", "pixel_types": "IntegerPixelIDTypeList", "vector_pixel_types_by_component": "VectorPixelIDTypeList"}"#,
        );
        assert!(PixelResolution::resolve(&f).warning.is_some());
    }

    #[test]
    fn test_output_type() {
        let f = filter(r#"{"name": "F", "output_pixel_type": "uint8_t"}"#);
        assert_eq!(output_type(&f).as_deref(), Some("uint8"));

        let f = filter(r#"{"name": "F", "output_pixel_type": "typename itk::NumericTraits<T>::RealType"}"#);
        assert_eq!(
            output_type(&f).as_deref(),
            Some("typename itk::NumericTraits<T>::RealType")
        );

        let f = filter(r#"{"name": "F"}"#);
        assert_eq!(output_type(&f), None);
    }
}
