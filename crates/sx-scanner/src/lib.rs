//! Schema readers and legacy UUID resolution for the simplnx code generators.
//!
//! This crate turns the on-disk inputs of both generators into the value
//! types of `sx-core`:
//!
//! - SIMPL schema dumps and ITK filter descriptors ([`read_simpl_json`],
//!   [`read_filter_json`], [`read_uuid_table`])
//! - Plugin legacy mapping tables, read in parallel ([`get_plugin_mappings`])
//! - UUID resolution against the merged mapping ([`find_filter`])
//!
//! # Overview
//!
//! ```no_run
//! use camino::Utf8Path;
//! use sx_core::{LegacyUuid, SimplConfig};
//! use sx_scanner::{find_filter, get_plugin_mappings, read_simpl_json};
//!
//! let root = Utf8Path::new("/src/complex");
//! let config = SimplConfig::default();
//!
//! let schema = read_simpl_json(&root.join(&config.simpl_json))?;
//! let mappings = get_plugin_mappings(root, &config)?;
//!
//! let uuid = LegacyUuid::parse("{a8463056-3fa7-530b-847f-7f4cb78b8602}")?;
//! let filter = schema.require(&uuid)?;
//! let resolved = find_filter(&mappings, &uuid)?;
//! println!("{} -> {}::{}", filter.name, resolved.plugin, resolved.class_name);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod error;
mod mapping;
mod schema;

pub use error::{ResolveError, SchemaError};
pub use mapping::{find_filter, get_plugin_mappings, PluginLayout};
pub use schema::{
    discover_filter_jsons, filter_json_path, read_filter_json, read_simpl_json, read_uuid_table,
    SimplSchema, FILTER_JSON_SUFFIX,
};
