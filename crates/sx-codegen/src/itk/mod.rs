//! ITK filter wrapper emission.
//!
//! | Artifact | Produced by | File |
//! |----------|-------------|------|
//! | Header | [`ItkFilter::emit_header`] | `ITK<Name>.hpp` |
//! | Source | [`ItkFilter::emit_source`] | `ITK<Name>.cpp` |
//! | Unit test | [`ItkFilter::emit_test`] | `ITK<Name>Test.cpp` |
//! | Docs | [`ItkFilter::emit_docs`] | `ITK<Name>.md` |

mod docs;
mod filter;
mod kind;
mod pixel;
mod unit_test;

pub use filter::{ItkFilter, ResolvedMember};
pub use kind::{cpp_string, NumericType, ParameterKind, KERNEL_CHOICES, KERNEL_RADIUS, KERNEL_TYPE};
pub use pixel::{output_type, PixelResolution, PixelTypeList, UNKNOWN_PIXEL_TYPE};

use sx_core::EmitterKind;

/// Returns the file name an emitter writes for a generated class.
///
/// # Examples
///
/// ```
/// use sx_codegen::itk::artifact_file_name;
/// use sx_core::EmitterKind;
///
/// assert_eq!(artifact_file_name("ITKMedianImage", EmitterKind::Test), "ITKMedianImageTest.cpp");
/// assert_eq!(artifact_file_name("ITKMedianImage", EmitterKind::Docs), "ITKMedianImage.md");
/// ```
#[must_use]
pub fn artifact_file_name(class_name: &str, kind: EmitterKind) -> String {
    match kind {
        EmitterKind::Header => format!("{class_name}.hpp"),
        EmitterKind::Source => format!("{class_name}.cpp"),
        EmitterKind::Test => format!("{class_name}Test.cpp"),
        EmitterKind::Docs => format!("{class_name}.md"),
    }
}
