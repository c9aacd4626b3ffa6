//! The `simpl` subcommand: splice `FromSIMPLJson` conversions into complex
//! filter sources.
//!
//! Every requested UUID is resolved before any file is read for patching.
//! All edits of the batch are then planned together and written only if
//! every anchor in every file was found.

use camino::{Utf8Path, Utf8PathBuf};
use color_eyre::eyre::{eyre, WrapErr};
use serde::Serialize;
use sx_codegen::{create_filter_conversion, FilterConversion};
use sx_core::{FxHashMap, FxHashSet, LegacyUuid, ResolvedFilter, SimplConfig};
use sx_cpp_parser::{Anchor, FilePatch, LineClassifier, PatchOp, PatchSet};
use sx_scanner::{find_filter, get_plugin_mappings, read_simpl_json, PluginLayout};
use tracing::{debug, info, warn};

/// Inputs of one `simpl` run.
#[derive(Debug, Clone)]
pub struct SimplRequest {
    /// Root of the complex source tree.
    pub complex_dir: Utf8PathBuf,
    /// Legacy schema JSON; defaults to the configured path, which resolves
    /// against the working directory when relative.
    pub simpl_json: Option<Utf8PathBuf>,
    /// Legacy filter UUIDs, braced or bare.
    pub uuids: Vec<String>,
    /// Plan and validate without writing.
    pub dry_run: bool,
}

/// A filter that was (or would be) converted.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertedFilter {
    /// Legacy filter name.
    pub name: String,
    /// Resolution of its UUID.
    pub resolved: ResolvedFilter,
    /// Number of parameters converted.
    pub parameters: usize,
}

/// What a `simpl` run did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimplOutcome {
    /// Filters converted in this run.
    pub converted: Vec<ConvertedFilter>,
    /// Filters skipped because their mapping row already has a converter.
    pub skipped: Vec<ResolvedFilter>,
    /// Files written, or that would be written on a dry run.
    pub files: Vec<Utf8PathBuf>,
    /// Whether the run wrote nothing.
    pub dry_run: bool,
}

/// Parses the UUID arguments, dropping repeats.
fn parse_uuids(raw: &[String]) -> color_eyre::Result<Vec<LegacyUuid>> {
    let mut seen = FxHashSet::default();
    let mut uuids = Vec::with_capacity(raw.len());
    for value in raw {
        let uuid = LegacyUuid::parse(value).wrap_err_with(|| format!("invalid --simpl-filters value '{value}'"))?;
        if seen.insert(uuid.clone()) {
            uuids.push(uuid);
        } else {
            debug!(uuid = %uuid, "Ignoring repeated UUID");
        }
    }
    if uuids.is_empty() {
        return Err(eyre!("no SIMPL filter UUIDs given"));
    }
    Ok(uuids)
}

fn schema_path(request: &SimplRequest, config: &SimplConfig) -> Utf8PathBuf {
    request
        .simpl_json
        .clone()
        .unwrap_or_else(|| config.simpl_json.clone())
}

/// Collects file patches, merging edits that target the same file so every
/// file is read and written once per batch.
#[derive(Debug, Default)]
struct PatchCollector {
    patches: Vec<FilePatch>,
    index: FxHashMap<Utf8PathBuf, usize>,
}

impl PatchCollector {
    fn add(&mut self, path: Utf8PathBuf, op: PatchOp) {
        if let Some(&i) = self.index.get(&path) {
            self.patches[i].ops.push(op);
        } else {
            self.index.insert(path.clone(), self.patches.len());
            self.patches.push(FilePatch::new(path).with(op));
        }
    }

    fn into_patch_set(self) -> PatchSet {
        let mut set = PatchSet::new();
        for patch in self.patches {
            set.push(patch);
        }
        set
    }
}

/// Queues the header, source and mapping edits of one filter, in that order.
fn queue_filter(
    collector: &mut PatchCollector,
    layout: &PluginLayout,
    resolved: &ResolvedFilter,
    conversion: FilterConversion,
) {
    let plugin = &resolved.plugin;
    let class = &resolved.class_name;

    if conversion.parameter_count > 0 {
        collector.add(
            layout.filter_header(plugin, class),
            PatchOp::InsertBefore {
                anchor: Anchor::LastParameterKey,
                block: conversion.header_keys,
            },
        );
        collector.add(
            layout.filter_source(plugin, class),
            PatchOp::InsertBefore {
                anchor: Anchor::LastInclude,
                block: conversion.simpl_keys,
            },
        );
    }
    collector.add(
        layout.filter_source(plugin, class),
        PatchOp::Append {
            block: conversion.function,
        },
    );
    collector.add(
        layout.mapping_file(plugin),
        PatchOp::ReplacePlaceholder {
            anchor: Anchor::Uuid(resolved.uuid.clone()),
            replacement: FilterConversion::converter_reference(class),
        },
    );
}

/// Runs the SIMPL conversion generator.
///
/// # Errors
///
/// Fails before writing anything if a UUID is malformed, absent from the
/// schema or from every plugin mapping, or if any anchor is missing.
pub fn run(config: &SimplConfig, request: &SimplRequest) -> color_eyre::Result<SimplOutcome> {
    let root = request.complex_dir.as_path();
    if !root.is_dir() {
        return Err(eyre!("complex source directory does not exist: {root}"));
    }

    let uuids = parse_uuids(&request.uuids)?;
    let schema = read_simpl_json(&schema_path(request, config))?;
    let mappings = get_plugin_mappings(root, config)?;

    // Resolve everything up front; any miss is fatal before any file is touched.
    let mut targets = Vec::with_capacity(uuids.len());
    for uuid in &uuids {
        let filter = schema.require(uuid)?;
        let resolved = find_filter(&mappings, uuid)?;
        debug!(
            uuid = %uuid,
            filter = %filter.name,
            plugin = %resolved.plugin,
            class = %resolved.class_name,
            "Resolved legacy filter"
        );
        targets.push((filter, resolved));
    }

    let layout = PluginLayout::from_root(root, config);
    let mut collector = PatchCollector::default();
    let mut outcome = SimplOutcome {
        dry_run: request.dry_run,
        ..SimplOutcome::default()
    };

    for (filter, resolved) in targets {
        if resolved.converted {
            warn!(
                filter = %filter.name,
                class = %resolved.class_name,
                "Mapping row already references FromSIMPLJson, skipping"
            );
            outcome.skipped.push(resolved);
            continue;
        }

        let conversion =
            create_filter_conversion(filter, &resolved.class_name, &config.framework_namespace);
        info!(
            filter = %filter.name,
            class = %resolved.class_name,
            parameters = conversion.parameter_count,
            "Generated conversion"
        );
        outcome.converted.push(ConvertedFilter {
            name: filter.name.clone(),
            parameters: conversion.parameter_count,
            resolved: resolved.clone(),
        });
        queue_filter(&mut collector, &layout, &resolved, conversion);
    }

    let set = collector.into_patch_set();
    if set.is_empty() {
        info!("Nothing to patch");
        return Ok(outcome);
    }

    let classifier = LineClassifier::new(&config.framework_namespace)?;
    let planned = set.plan(&classifier)?;

    if request.dry_run {
        outcome.files = planned.paths().map(Utf8Path::to_path_buf).collect();
        info!(files = outcome.files.len(), "Dry run, nothing written");
    } else {
        outcome.files = planned.commit()?;
        info!(files = outcome.files.len(), "Patched files");
    }
    Ok(outcome)
}
