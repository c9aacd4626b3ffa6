//! Core types, errors, and configuration for the simplnx code generators.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - Error types for configuration loading and UUID validation
//! - Configuration structures for both generators
//! - Domain types (`FilterDescriptor`, `ItkFilterDescriptor`, `LegacyUuid`, ...)
//! - Type aliases for `FxHashMap`/`FxHashSet` (faster than std)

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, EmitterKind, ItkConfig, SimplConfig};
pub use error::{ConfigError, UuidError};
pub use types::{
    value_to_string, FilterDescriptor, InputDescriptor, ItkFilterDescriptor, LegacyUuid, MappingEntry,
    MemberDescriptor, ParameterDescriptor, PluginUuidMapping, ResolvedFilter, TestFixtureDescriptor,
    TestSetting, SEPARATOR_PARAMETER_TYPE,
};

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// A [`HashSet`](std::collections::HashSet) using the Fx hash algorithm.
pub type FxHashSet<V> = rustc_hash::FxHashSet<V>;
