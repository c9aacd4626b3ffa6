//! C++ fragment emitters for the simplnx code generators.
//!
//! Every emitter is a pure function from descriptors to text; nothing here
//! touches the filesystem except [`Template::read`].
//!
//! # Modules
//!
//! | Module | Produces |
//! |--------|----------|
//! | [`simpl`] | `FromSIMPLJson` conversions and key constants for legacy filters |
//! | [`itk`] | header, source, Catch2 test and markdown page for ITK wrappers |
//! | [`template`] | `$NAME` template rendering |
//! | [`naming`] | key and identifier naming |
//!
//! # Overview
//!
//! ```
//! use sx_codegen::itk::ItkFilter;
//! use sx_codegen::Template;
//! use sx_core::{ItkFilterDescriptor, LegacyUuid};
//!
//! let descriptor: ItkFilterDescriptor = serde_json::from_str(r#"{
//!     "name": "SigmoidImageFilter",
//!     "pixel_types": "BasicPixelIDTypeList",
//!     "members": [{"name": "Alpha", "type": "double", "default": 1.0}]
//! }"#)?;
//! let uuid = LegacyUuid::parse("e6a1d3c4-5b2f-4a8e-9c7d-1f2e3a4b5c6d")?;
//! let filter = ItkFilter::resolve(&descriptor, uuid, "ITKImageProcessing")?;
//!
//! let header = Template::new("filter.hpp.in", "class $FILTER_NAME\n{\n$PARAMETER_KEYS\n};\n");
//! let emitted = filter.emit_header(&header)?;
//! assert_eq!(
//!     emitted.text,
//!     "class ITKSigmoidImage\n{\n  static inline constexpr StringLiteral k_Alpha_Key = \"alpha\";\n};\n"
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod itk;
pub mod naming;
pub mod simpl;
pub mod template;

pub use error::{EmitError, EmitWarning, Emitted, TemplateError};
pub use naming::{generate_key_name, generate_key_var, simpl_key_var};
pub use simpl::{create_filter_conversion, FilterConversion};
pub use template::{Substitutions, Template};
