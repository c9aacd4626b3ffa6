//! Discovery of plugin legacy UUID mapping tables.
//!
//! Each plugin under `<root>/src/Plugins` may carry a
//! `<Plugin>/src/<Plugin>/<Plugin>LegacyUUIDMapping.hpp` whose rows map SIMPL
//! UUIDs to complex filter classes. [`get_plugin_mappings`] reads all of
//! them into one [`PluginUuidMapping`].
//!
//! # Design
//!
//! Plugin directories are enumerated single-threaded, then the mapping files
//! are read and matched in parallel with rayon. The merged result is an
//! ordered map, so the outcome does not depend on thread scheduling.

use std::collections::BTreeMap;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;
use rayon::prelude::*;
use sx_core::{LegacyUuid, MappingEntry, PluginUuidMapping, ResolvedFilter, SimplConfig};
use sx_cpp_parser::LineClassifier;
use tracing::{debug, info, warn};

use crate::error::ResolveError;

/// Path layout of the plugins inside a complex source tree.
///
/// # Examples
///
/// ```
/// use sx_scanner::PluginLayout;
///
/// let layout = PluginLayout::new("/src/complex/src/Plugins");
/// assert_eq!(
///     layout.mapping_file("ComplexCore").as_str(),
///     "/src/complex/src/Plugins/ComplexCore/src/ComplexCore/ComplexCoreLegacyUUIDMapping.hpp"
/// );
/// assert_eq!(
///     layout.filter_header("ComplexCore", "FooClass").as_str(),
///     "/src/complex/src/Plugins/ComplexCore/src/ComplexCore/Filters/FooClass.hpp"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginLayout {
    plugins_dir: Utf8PathBuf,
}

impl PluginLayout {
    /// Creates a layout rooted at a plugins directory.
    #[must_use]
    pub fn new(plugins_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            plugins_dir: plugins_dir.into(),
        }
    }

    /// Creates the layout for a complex source root and configuration.
    #[must_use]
    pub fn from_root(root: &Utf8Path, config: &SimplConfig) -> Self {
        Self::new(root.join(&config.plugins_dir))
    }

    /// Returns the plugins directory.
    #[inline]
    #[must_use]
    pub fn plugins_dir(&self) -> &Utf8Path {
        &self.plugins_dir
    }

    fn plugin_src(&self, plugin: &str) -> Utf8PathBuf {
        self.plugins_dir.join(plugin).join("src").join(plugin)
    }

    /// Returns the legacy UUID mapping header of a plugin.
    #[must_use]
    pub fn mapping_file(&self, plugin: &str) -> Utf8PathBuf {
        self.plugin_src(plugin)
            .join(format!("{plugin}LegacyUUIDMapping.hpp"))
    }

    /// Returns the header of a filter class.
    #[must_use]
    pub fn filter_header(&self, plugin: &str, class_name: &str) -> Utf8PathBuf {
        self.plugin_src(plugin)
            .join("Filters")
            .join(format!("{class_name}.hpp"))
    }

    /// Returns the implementation file of a filter class.
    #[must_use]
    pub fn filter_source(&self, plugin: &str, class_name: &str) -> Utf8PathBuf {
        self.plugin_src(plugin)
            .join("Filters")
            .join(format!("{class_name}.cpp"))
    }
}

/// Builds the merged legacy mapping of every non-ignored plugin.
///
/// Plugins without a mapping file are skipped. A mapping file that yields no
/// rows is logged as a warning, since it usually means the row formatting
/// drifted from the expected pattern.
///
/// # Errors
///
/// Returns [`ResolveError`] if the plugins directory is missing, cannot be
/// enumerated, or a mapping file cannot be read.
pub fn get_plugin_mappings(
    root: &Utf8Path,
    config: &SimplConfig,
) -> Result<PluginUuidMapping, ResolveError> {
    let layout = PluginLayout::from_root(root, config);
    if !layout.plugins_dir().is_dir() {
        return Err(ResolveError::MissingPluginsDir(layout.plugins_dir().to_owned()));
    }

    let classifier = LineClassifier::new(&config.framework_namespace)?;
    let plugins = list_plugins(layout.plugins_dir(), config)?;

    let tables = plugins
        .par_iter()
        .map(|plugin| read_plugin_table(&layout, plugin, &classifier))
        .collect::<Result<Vec<_>, _>>()?;

    let mut mapping = PluginUuidMapping::default();
    for (plugin, entries) in plugins.into_iter().zip(tables) {
        if let Some(entries) = entries {
            mapping.insert_plugin(plugin, entries);
        }
    }

    info!(
        plugins = mapping.plugin_count(),
        entries = mapping.entry_count(),
        "Loaded legacy UUID mappings"
    );
    Ok(mapping)
}

/// Lists plugin directory names, minus the ignored ones, sorted.
fn list_plugins(plugins_dir: &Utf8Path, config: &SimplConfig) -> Result<Vec<String>, ResolveError> {
    let walker = WalkBuilder::new(plugins_dir)
        .standard_filters(true)
        .require_git(false)
        .max_depth(Some(1))
        .build();

    let mut plugins = Vec::new();
    for result in walker {
        let entry = result?;
        if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_dir()) {
            continue;
        }
        let path = entry.path();
        let name = Utf8Path::from_path(path)
            .and_then(Utf8Path::file_name)
            .ok_or_else(|| ResolveError::NonUtf8Path(path.to_owned()))?;

        if config.is_ignored(name) {
            debug!(plugin = name, "Skipping ignored plugin");
            continue;
        }
        plugins.push(name.to_owned());
    }

    plugins.sort();
    Ok(plugins)
}

fn read_plugin_table(
    layout: &PluginLayout,
    plugin: &str,
    classifier: &LineClassifier,
) -> Result<Option<BTreeMap<LegacyUuid, MappingEntry>>, ResolveError> {
    let path = layout.mapping_file(plugin);
    if !path.is_file() {
        debug!(plugin, "No legacy mapping file");
        return Ok(None);
    }

    let contents = fs::read_to_string(&path).map_err(|source| ResolveError::Read {
        path: path.clone(),
        source,
    })?;
    let rows = classifier.mapping_rows(&contents);
    if rows.is_empty() {
        warn!(plugin, path = %path, "Legacy mapping file has no recognizable rows");
    }

    let mut entries = BTreeMap::new();
    for row in rows {
        match LegacyUuid::parse(&row.uuid) {
            Ok(uuid) => {
                let converted = row.is_converted();
                entries.insert(
                    uuid,
                    MappingEntry {
                        class_name: row.class_name,
                        converted,
                    },
                );
            }
            Err(e) => warn!(plugin, error = %e, "Skipping mapping row"),
        }
    }

    debug!(plugin, rows = entries.len(), "Read legacy mapping");
    Ok(Some(entries))
}

/// Resolves a legacy UUID to the plugin and class that implement it.
///
/// # Errors
///
/// Returns [`ResolveError::UnknownUuid`] if no plugin maps the UUID.
pub fn find_filter(
    mappings: &PluginUuidMapping,
    uuid: &LegacyUuid,
) -> Result<ResolvedFilter, ResolveError> {
    mappings
        .find(uuid)
        .ok_or_else(|| ResolveError::UnknownUuid(uuid.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOO_UUID: &str = "11111111-1111-1111-1111-111111111111";
    const BAR_UUID: &str = "22222222-2222-2222-2222-222222222222";

    fn row(uuid: &str, class: &str, converter: &str) -> String {
        format!(
            "  {{complex::Uuid::FromString(\"{uuid}\").value(), {{complex::FilterTraits<{class}>::uuid, {converter}}}}}, // {class}\n"
        )
    }

    fn write_mapping(plugins: &Utf8Path, plugin: &str, body: &str) {
        let layout = PluginLayout::new(plugins);
        let path = layout.mapping_file(plugin);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, format!("#pragma once\nstatic const AbstractPlugin::SIMPLMapType k_SIMPL_to_{plugin}\n{{\n{body}}};\n")).unwrap();
    }

    fn source_tree() -> (tempfile::TempDir, Utf8PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(tmp.path().to_owned()).unwrap();
        let plugins = root.join("src/Plugins");
        fs::create_dir_all(&plugins).unwrap();

        write_mapping(&plugins, "ComplexCore", &row(FOO_UUID, "FooClass", "{}"));
        write_mapping(
            &plugins,
            "OrientationAnalysis",
            &row(BAR_UUID, "BarClass", "&BarClass::FromSIMPLJson"),
        );
        write_mapping(&plugins, "TestOne", &row("33333333-3333-3333-3333-333333333333", "T", "{}"));
        write_mapping(&plugins, "Empty", "  // reformatted by hand\n");
        fs::create_dir_all(plugins.join("NoMapping/src")).unwrap();

        (tmp, root)
    }

    #[test]
    fn test_get_plugin_mappings() {
        let (_tmp, root) = source_tree();
        let mapping = get_plugin_mappings(&root, &SimplConfig::default()).unwrap();

        let names: Vec<_> = mapping.plugin_names().collect();
        assert_eq!(names, vec!["ComplexCore", "Empty", "OrientationAnalysis"]);
        assert_eq!(mapping.entry_count(), 2);

        let foo = find_filter(&mapping, &LegacyUuid::parse(FOO_UUID).unwrap()).unwrap();
        assert_eq!(foo.plugin, "ComplexCore");
        assert_eq!(foo.class_name, "FooClass");
        assert!(!foo.converted);

        let bar = find_filter(&mapping, &LegacyUuid::parse(BAR_UUID).unwrap()).unwrap();
        assert!(bar.converted);
    }

    #[test]
    fn test_ignored_plugins_are_not_scanned() {
        let (_tmp, root) = source_tree();
        let mapping = get_plugin_mappings(&root, &SimplConfig::default()).unwrap();
        assert!(mapping.plugin("TestOne").is_none());

        let uuid = LegacyUuid::parse("33333333-3333-3333-3333-333333333333").unwrap();
        let err = find_filter(&mapping, &uuid).unwrap_err();
        assert!(matches!(err, ResolveError::UnknownUuid(u) if u == uuid));
    }

    #[test]
    fn test_missing_plugins_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(tmp.path().to_owned()).unwrap();
        let err = get_plugin_mappings(&root, &SimplConfig::default()).unwrap_err();
        assert!(matches!(err, ResolveError::MissingPluginsDir(_)));
    }

    #[test]
    fn test_custom_plugins_dir() {
        let (_tmp, root) = source_tree();
        let config = SimplConfig {
            plugins_dir: Utf8PathBuf::from("src"),
            ..SimplConfig::default()
        };
        let mapping = get_plugin_mappings(&root, &config).unwrap();
        assert_eq!(mapping.plugin_count(), 0);
        assert_eq!(mapping.entry_count(), 0);
    }
}
