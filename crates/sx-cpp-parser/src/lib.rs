//! Line-oriented C++ source model for the simplnx code generators.
//!
//! The generators edit hand-maintained C++ files in a handful of predictable
//! places. This crate provides:
//!
//! - Classification of lines into the shapes the generators anchor on
//! - An in-memory [`SourceFile`] that keeps line endings intact
//! - Multi-file [`PatchSet`]s that validate every anchor before writing
//!
//! # Overview
//!
//! ```
//! use sx_cpp_parser::{Anchor, FilePatch, LineClassifier, PatchOp, SourceFile};
//!
//! let classifier = LineClassifier::new("complex")?;
//! let file = SourceFile::parse(
//!     "FooClass.hpp",
//!     "#include \"IFilter.hpp\"\nclass FooClass\n{\n  static inline constexpr StringLiteral k_A_Key = \"a\";\n};\n",
//!     &classifier,
//! );
//!
//! let patched = FilePatch::new("FooClass.hpp")
//!     .with(PatchOp::InsertBefore {
//!         anchor: Anchor::LastParameterKey,
//!         block: "  static inline constexpr StringLiteral k_BarKey = \"bar\";".to_owned(),
//!     })
//!     .apply_to(file, &classifier)?;
//!
//! assert_eq!(patched.find_last_parameter_key(), Some(4));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Anchors
//!
//! | Anchor | Resolves to |
//! |--------|-------------|
//! | `LastInclude` | last line starting with `#include` |
//! | `LastParameterKey` | last `  static inline constexpr StringLiteral k_` line |
//! | `Uuid(uuid)` | first line containing the UUID, case-insensitively |
//!
//! A missing anchor is an error, never a silent no-op.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod line;
pub mod patch;
pub mod source;

pub use error::PatchError;
pub use line::{
    LineClassifier, LineShape, MappingRow, DEFAULT_NAMESPACE, EMPTY_CONVERTER, INCLUDE_PREFIX,
    PARAMETER_KEY_PREFIX,
};
pub use patch::{Anchor, FilePatch, PatchOp, PatchSet, PlannedPatchSet};
pub use source::{LineEnding, SourceFile, SourceLine};
