//! Legacy UUID to complex filter mappings.
//!
//! Each complex plugin declares, in its `<Plugin>LegacyUUIDMapping.hpp`, which
//! of its filters replace which SIMPL filters. [`PluginUuidMapping`] is the
//! merged view of all those tables, rebuilt on every generator run.

use std::collections::BTreeMap;

use serde::Serialize;

use super::uuid::LegacyUuid;

/// One row of a plugin's legacy mapping table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingEntry {
    /// The complex filter class that replaces the legacy filter.
    pub class_name: String,

    /// Whether the row already references a `FromSIMPLJson` converter.
    pub converted: bool,
}

/// A legacy UUID resolved to the plugin and class that implement it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedFilter {
    /// The legacy filter UUID.
    pub uuid: LegacyUuid,

    /// Plugin directory name.
    pub plugin: String,

    /// Complex filter class name.
    pub class_name: String,

    /// Whether the mapping row already references a converter.
    pub converted: bool,
}

/// All plugins' legacy mapping tables, keyed by plugin name then UUID.
///
/// `BTreeMap` keeps iteration order stable so lookups across plugins are
/// deterministic when two plugins claim the same UUID.
///
/// # Examples
///
/// ```
/// use sx_core::{LegacyUuid, MappingEntry, PluginUuidMapping};
///
/// let uuid = LegacyUuid::parse("11111111-1111-1111-1111-111111111111").unwrap();
/// let mut mapping = PluginUuidMapping::default();
/// mapping.insert("ComplexCore", uuid.clone(), MappingEntry {
///     class_name: "FooClass".to_owned(),
///     converted: false,
/// });
///
/// let resolved = mapping.find(&uuid).unwrap();
/// assert_eq!(resolved.plugin, "ComplexCore");
/// assert_eq!(resolved.class_name, "FooClass");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PluginUuidMapping {
    plugins: BTreeMap<String, BTreeMap<LegacyUuid, MappingEntry>>,
}

impl PluginUuidMapping {
    /// Records one mapping row for a plugin.
    pub fn insert(&mut self, plugin: impl Into<String>, uuid: LegacyUuid, entry: MappingEntry) {
        self.plugins
            .entry(plugin.into())
            .or_default()
            .insert(uuid, entry);
    }

    /// Replaces a plugin's table wholesale.
    pub fn insert_plugin(
        &mut self,
        plugin: impl Into<String>,
        entries: BTreeMap<LegacyUuid, MappingEntry>,
    ) {
        self.plugins.insert(plugin.into(), entries);
    }

    /// Finds the plugin and class that implement a legacy UUID.
    ///
    /// Scans plugins in name order and returns the first match.
    #[must_use]
    pub fn find(&self, uuid: &LegacyUuid) -> Option<ResolvedFilter> {
        self.plugins.iter().find_map(|(plugin, entries)| {
            entries.get(uuid).map(|entry| ResolvedFilter {
                uuid: uuid.clone(),
                plugin: plugin.clone(),
                class_name: entry.class_name.clone(),
                converted: entry.converted,
            })
        })
    }

    /// Returns the mapping table of one plugin.
    #[must_use]
    pub fn plugin(&self, plugin: &str) -> Option<&BTreeMap<LegacyUuid, MappingEntry>> {
        self.plugins.get(plugin)
    }

    /// Iterates over plugin names in order.
    pub fn plugin_names(&self) -> impl Iterator<Item = &str> {
        self.plugins.keys().map(String::as_str)
    }

    /// Returns the number of plugins with a mapping table.
    #[must_use]
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Returns the total number of mapping rows across all plugins.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.plugins.values().map(BTreeMap::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uuid(s: &str) -> LegacyUuid {
        LegacyUuid::parse(s).unwrap()
    }

    #[test]
    fn test_find_scans_all_plugins() {
        let mut mapping = PluginUuidMapping::default();
        mapping.insert(
            "ComplexCore",
            uuid("11111111-1111-1111-1111-111111111111"),
            MappingEntry {
                class_name: "A".to_owned(),
                converted: false,
            },
        );
        mapping.insert(
            "OrientationAnalysis",
            uuid("22222222-2222-2222-2222-222222222222"),
            MappingEntry {
                class_name: "B".to_owned(),
                converted: true,
            },
        );

        let resolved = mapping
            .find(&uuid("22222222-2222-2222-2222-222222222222"))
            .unwrap();
        assert_eq!(resolved.plugin, "OrientationAnalysis");
        assert_eq!(resolved.class_name, "B");
        assert!(resolved.converted);

        assert!(mapping
            .find(&uuid("33333333-3333-3333-3333-333333333333"))
            .is_none());
        assert_eq!(mapping.plugin_count(), 2);
        assert_eq!(mapping.entry_count(), 2);
    }

    #[test]
    fn test_first_plugin_in_name_order_wins() {
        let shared = uuid("11111111-1111-1111-1111-111111111111");
        let mut mapping = PluginUuidMapping::default();
        mapping.insert(
            "Zeta",
            shared.clone(),
            MappingEntry {
                class_name: "Z".to_owned(),
                converted: false,
            },
        );
        mapping.insert(
            "Alpha",
            shared.clone(),
            MappingEntry {
                class_name: "A".to_owned(),
                converted: false,
            },
        );

        assert_eq!(mapping.find(&shared).unwrap().plugin, "Alpha");
        let names: Vec<_> = mapping.plugin_names().collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }
}
