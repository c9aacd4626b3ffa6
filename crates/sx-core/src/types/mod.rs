//! Domain types for the simplnx code generators.
//!
//! # Module Organization
//!
//! - [`uuid`] - Normalized legacy filter UUIDs
//! - [`filter`] - SIMPL filter and parameter descriptors
//! - [`itk`] - ITK filter, member, input and test fixture descriptors
//! - [`mapping`] - Legacy UUID to complex filter mappings
//!
//! All public types are re-exported at this module level and at the crate root:
//!
//! ```
//! use sx_core::{FilterDescriptor, ItkFilterDescriptor, LegacyUuid, PluginUuidMapping};
//! ```

pub mod filter;
pub mod itk;
pub mod mapping;
pub mod uuid;

pub use filter::{FilterDescriptor, ParameterDescriptor, SEPARATOR_PARAMETER_TYPE};
pub use itk::{
    value_to_string, InputDescriptor, ItkFilterDescriptor, MemberDescriptor, TestFixtureDescriptor,
    TestSetting,
};
pub use mapping::{MappingEntry, PluginUuidMapping, ResolvedFilter};
pub use uuid::LegacyUuid;
