//! Readers for the JSON schema files that drive both generators.
//!
//! | File | Reader | Result |
//! |------|--------|--------|
//! | SIMPL filter dump | [`read_simpl_json`] | [`SimplSchema`] keyed by UUID |
//! | `<Name>Filter.json` | [`read_filter_json`] | [`ItkFilterDescriptor`] |
//! | ITK name -> UUID table | [`read_uuid_table`] | ordered name -> [`LegacyUuid`] map |
//!
//! Readers fail on the first malformed file; nothing is partially loaded.

use std::collections::BTreeMap;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;
use serde::Deserialize;
use smallvec::SmallVec;
use sx_core::{FilterDescriptor, FxHashMap, ItkFilterDescriptor, LegacyUuid, ParameterDescriptor};
use tracing::{debug, warn};

use crate::error::{ResolveError, SchemaError};

/// Suffix shared by every ITK filter descriptor file.
pub const FILTER_JSON_SUFFIX: &str = "Filter.json";

#[derive(Debug, Deserialize)]
struct SimplDocument {
    #[serde(default)]
    plugins: Vec<SimplPluginEntry>,
}

#[derive(Debug, Deserialize)]
struct SimplPluginEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    filters: Vec<SimplFilterEntry>,
}

#[derive(Debug, Deserialize)]
struct SimplFilterEntry {
    name: String,
    uuid: String,
    #[serde(default)]
    parameters: SmallVec<[ParameterDescriptor; 8]>,
}

/// Every legacy filter in a SIMPL schema dump, keyed by normalized UUID.
#[derive(Debug, Clone, Default)]
pub struct SimplSchema {
    filters: FxHashMap<LegacyUuid, FilterDescriptor>,
}

impl SimplSchema {
    /// Looks up a filter by UUID.
    #[must_use]
    pub fn get(&self, uuid: &LegacyUuid) -> Option<&FilterDescriptor> {
        self.filters.get(uuid)
    }

    /// Looks up a filter by UUID, failing if the schema does not know it.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotInSchema`] for an unknown UUID.
    pub fn require(&self, uuid: &LegacyUuid) -> Result<&FilterDescriptor, ResolveError> {
        self.get(uuid)
            .ok_or_else(|| ResolveError::NotInSchema(uuid.clone()))
    }

    /// Returns the number of filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns `true` if the schema holds no filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

/// Loads the SIMPL filter schema dump.
///
/// The document has the shape
/// `{"plugins": [{"name", "filters": [{"name", "uuid", "parameters": [...]}]}]}`.
/// UUIDs are normalized; when two plugins list the same UUID the first one
/// read is kept.
///
/// # Errors
///
/// Returns [`SchemaError`] if the file is missing, is not valid JSON, holds a
/// malformed UUID, or has a filter or parameter with an empty name.
pub fn read_simpl_json(path: &Utf8Path) -> Result<SimplSchema, SchemaError> {
    let contents = fs::read_to_string(path).map_err(|e| SchemaError::read(path, e))?;
    let document: SimplDocument =
        serde_json::from_str(&contents).map_err(|e| SchemaError::json(path, e))?;

    let mut filters = FxHashMap::default();
    for plugin in document.plugins {
        debug!(plugin = %plugin.name, filters = plugin.filters.len(), "Reading SIMPL plugin");
        for entry in plugin.filters {
            let filter = validate_filter(path, entry)?;
            if filters.contains_key(&filter.uuid) {
                warn!(uuid = %filter.uuid, name = %filter.name, "Duplicate SIMPL filter uuid, keeping first");
                continue;
            }
            filters.insert(filter.uuid.clone(), filter);
        }
    }

    debug!(path = %path, filters = filters.len(), "Loaded SIMPL schema");
    Ok(SimplSchema { filters })
}

fn validate_filter(path: &Utf8Path, entry: SimplFilterEntry) -> Result<FilterDescriptor, SchemaError> {
    if entry.name.trim().is_empty() {
        return Err(SchemaError::invalid(path, "filter name must not be empty"));
    }
    if let Some(param) = entry.parameters.iter().find(|p| p.name.trim().is_empty()) {
        return Err(SchemaError::invalid(
            path,
            format!(
                "filter '{}' has a '{}' parameter with an empty name",
                entry.name, param.source_type
            ),
        ));
    }
    let uuid = LegacyUuid::parse(&entry.uuid).map_err(|source| SchemaError::Uuid {
        path: path.to_owned(),
        source,
    })?;

    Ok(FilterDescriptor {
        name: entry.name,
        uuid,
        parameters: entry.parameters,
    })
}

/// Returns the descriptor path for an ITK filter name.
#[must_use]
pub fn filter_json_path(dir: &Utf8Path, filter_name: &str) -> Utf8PathBuf {
    dir.join(format!("{filter_name}{FILTER_JSON_SUFFIX}"))
}

/// Loads `<dir>/<filter_name>Filter.json`.
///
/// Absent optional fields are filled with empty values; only a missing
/// `name` is an error.
///
/// # Errors
///
/// Returns [`SchemaError`] if the file is missing or is not valid JSON.
pub fn read_filter_json(dir: &Utf8Path, filter_name: &str) -> Result<ItkFilterDescriptor, SchemaError> {
    let path = filter_json_path(dir, filter_name);
    let contents = fs::read_to_string(&path).map_err(|e| SchemaError::read(&path, e))?;
    serde_json::from_str(&contents).map_err(|e| SchemaError::json(&path, e))
}

/// Loads the ITK filter name -> UUID table.
///
/// # Errors
///
/// Returns [`SchemaError`] if the file is missing, is not a JSON object of
/// strings, or holds a malformed UUID.
pub fn read_uuid_table(path: &Utf8Path) -> Result<BTreeMap<String, LegacyUuid>, SchemaError> {
    let contents = fs::read_to_string(path).map_err(|e| SchemaError::read(path, e))?;
    let raw: BTreeMap<String, String> =
        serde_json::from_str(&contents).map_err(|e| SchemaError::json(path, e))?;

    raw.into_iter()
        .map(|(name, uuid)| {
            LegacyUuid::parse(&uuid)
                .map(|uuid| (name, uuid))
                .map_err(|source| SchemaError::Uuid {
                    path: path.to_owned(),
                    source,
                })
        })
        .collect()
}

/// Lists the filter names that have a `<Name>Filter.json` descriptor in `dir`.
///
/// Only the directory itself is searched. Names are returned sorted.
///
/// # Errors
///
/// Returns [`SchemaError::Walk`] if the directory cannot be enumerated.
pub fn discover_filter_jsons(dir: &Utf8Path) -> Result<Vec<String>, SchemaError> {
    let walker = WalkBuilder::new(dir)
        .standard_filters(true)
        .require_git(false)
        .max_depth(Some(1))
        .build();

    let mut names = Vec::new();
    for result in walker {
        let entry = result?;
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.path();
        let utf8_path =
            Utf8Path::from_path(path).ok_or_else(|| SchemaError::NonUtf8Path(path.to_owned()))?;
        if let Some(name) = utf8_path
            .file_name()
            .and_then(|f| f.strip_suffix(FILTER_JSON_SUFFIX))
            .filter(|n| !n.is_empty())
        {
            names.push(name.to_owned());
        }
    }

    names.sort();
    Ok(names)
}
