//! The `itk` subcommand: generate ITK filter wrappers from JSON descriptors.

use std::collections::BTreeMap;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use color_eyre::eyre::{eyre, WrapErr};
use serde::Serialize;
use sx_codegen::itk::{artifact_file_name, ItkFilter};
use sx_codegen::{EmitWarning, Emitted, Template};
use sx_core::{EmitterKind, ItkConfig, LegacyUuid};
use sx_scanner::{discover_filter_jsons, read_filter_json, read_uuid_table};
use tracing::{debug, info, warn};

/// Inputs of one `itk` run.
#[derive(Debug, Clone)]
pub struct ItkRequest {
    /// Directory holding the header and source templates.
    pub template_dir: Utf8PathBuf,
    /// Directory holding `<Name>Filter.json` descriptors and the UUID table.
    pub json_dir: Utf8PathBuf,
    /// Output directory for headers and sources.
    pub filter_output_dir: Utf8PathBuf,
    /// Output directory for unit tests.
    pub test_output_dir: Utf8PathBuf,
    /// Output directory for documentation pages.
    pub docs_output_dir: Utf8PathBuf,
    /// UUID table; defaults to the configured name inside `json_dir`.
    pub uuid_table: Option<Utf8PathBuf>,
    /// Filters to generate; empty means the configured list.
    pub filters: Vec<String>,
    /// Generate every filter in the UUID table.
    pub all: bool,
    /// Emitters to run; empty means the configured set.
    pub emitters: Vec<EmitterKind>,
}

impl ItkRequest {
    fn output_dir(&self, kind: EmitterKind) -> &Utf8Path {
        match kind {
            EmitterKind::Header | EmitterKind::Source => &self.filter_output_dir,
            EmitterKind::Test => &self.test_output_dir,
            EmitterKind::Docs => &self.docs_output_dir,
        }
    }
}

/// What an `itk` run did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ItkOutcome {
    /// Filters that were generated.
    pub generated: Vec<String>,
    /// Filters skipped because the UUID table has no entry for them.
    pub skipped: Vec<String>,
    /// Files written.
    pub files: Vec<Utf8PathBuf>,
    /// Emit warnings, as display strings.
    pub warnings: Vec<String>,
}

impl ItkOutcome {
    /// Returns `true` if any artifact was emitted with a warning.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// The two templates, read once per run.
struct Templates {
    header: Template,
    source: Template,
}

impl Templates {
    fn read(dir: &Utf8Path, config: &ItkConfig) -> color_eyre::Result<Self> {
        let header = Template::read(&dir.join(&config.header_template))?;
        let source = Template::read(&dir.join(&config.source_template))?;
        Ok(Self { header, source })
    }
}

/// Picks the filter names to process.
fn select_filters(
    request: &ItkRequest,
    config: &ItkConfig,
    table: &BTreeMap<String, LegacyUuid>,
) -> Vec<String> {
    if request.all {
        table.keys().cloned().collect()
    } else if !request.filters.is_empty() {
        request.filters.clone()
    } else {
        config.filters.clone()
    }
}

fn emit(
    filter: &ItkFilter<'_>,
    kind: EmitterKind,
    templates: &Templates,
) -> color_eyre::Result<Emitted> {
    let emitted = match kind {
        EmitterKind::Header => filter.emit_header(&templates.header)?,
        EmitterKind::Source => filter.emit_source(&templates.source)?,
        EmitterKind::Test => filter.emit_test()?,
        EmitterKind::Docs => filter.emit_docs(),
    };
    Ok(emitted)
}

fn write_artifact(path: &Utf8Path, text: &str) -> color_eyre::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).wrap_err_with(|| format!("failed to create {parent}"))?;
    }
    fs::write(path, text).wrap_err_with(|| format!("failed to write {path}"))
}

/// Runs the ITK wrapper generator.
///
/// # Errors
///
/// Fails on a missing template, UUID table or descriptor, malformed JSON,
/// an unsupported member type, or a write failure.
pub fn run(config: &ItkConfig, request: &ItkRequest) -> color_eyre::Result<ItkOutcome> {
    if !request.json_dir.is_dir() {
        return Err(eyre!("JSON directory does not exist: {}", request.json_dir));
    }

    let templates = Templates::read(&request.template_dir, config)?;
    let table_path = request
        .uuid_table
        .clone()
        .unwrap_or_else(|| request.json_dir.join(&config.uuid_table));
    let table = read_uuid_table(&table_path)?;

    if request.all {
        for name in discover_filter_jsons(&request.json_dir)? {
            if !table.contains_key(&name) {
                warn!(filter = %name, "Descriptor has no entry in the UUID table");
            }
        }
    }

    let emitters = if request.emitters.is_empty() {
        config.emitters.clone()
    } else {
        request.emitters.clone()
    };

    let mut outcome = ItkOutcome::default();
    for name in select_filters(request, config, &table) {
        let Some(uuid) = table.get(&name) else {
            warn!(filter = %name, "Filter missing from the UUID table, skipping");
            outcome.skipped.push(name);
            continue;
        };

        let descriptor = read_filter_json(&request.json_dir, &name)?;
        let filter = ItkFilter::resolve(&descriptor, uuid.clone(), &config.plugin_name)?;
        let class = filter.class_name();

        for &kind in &emitters {
            let emitted = emit(&filter, kind, &templates)?;
            let path = request.output_dir(kind).join(artifact_file_name(&class, kind));
            write_artifact(&path, &emitted.text)?;
            for warning in &emitted.warnings {
                report_warning(warning, kind);
                outcome.warnings.push(warning.to_string());
            }
            debug!(filter = %name, emitter = kind.label(), path = %path, "Wrote artifact");
            outcome.files.push(path);
        }

        info!(filter = %name, class = %class, "Generated ITK filter");
        outcome.generated.push(name);
    }

    Ok(outcome)
}

fn report_warning(warning: &EmitWarning, kind: EmitterKind) {
    warn!(emitter = kind.label(), "{warning}");
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER_TEMPLATE: &str = "#pragma once\n$PARAMETER_INCLUDES\nclass $FILTER_NAME\n{\n$PARAMETER_KEYS\n};\n";
    const SOURCE_TEMPLATE: &str = "// $HUMAN_NAME\nauto types = $ALLOWED_TYPES;\n$ITK_FILTER_STRUCT\n";

    struct Fixture {
        _dir: tempfile::TempDir,
        root: Utf8PathBuf,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        fs::create_dir_all(root.join("templates")).unwrap();
        fs::create_dir_all(root.join("json")).unwrap();
        fs::write(root.join("templates/filter.hpp.in"), HEADER_TEMPLATE).unwrap();
        fs::write(root.join("templates/filter.cpp.in"), SOURCE_TEMPLATE).unwrap();
        fs::write(
            root.join("json/filter_uuids.json"),
            r#"{"MedianImage": "{aaaaaaaa-0000-4000-8000-000000000001}", "OddImage": "aaaaaaaa-0000-4000-8000-000000000002"}"#,
        )
        .unwrap();
        fs::write(
            root.join("json/MedianImageFilter.json"),
            r#"{"name": "MedianImageFilter", "pixel_types": "BasicPixelIDTypeList",
                "members": [{"name": "Radius", "type": "unsigned int", "itk_type": "typename FilterType::RadiusType", "default": 1}],
                "tests": [{"tag": "defaults", "inputs": ["Input/RA-Float.nrrd"], "md5hash": "abc"}]}"#,
        )
        .unwrap();
        fs::write(
            root.join("json/OddImageFilter.json"),
            r#"{"name": "OddImageFilter", "pixel_types": "LabelPixelIDTypeList"}"#,
        )
        .unwrap();
        fs::write(root.join("json/StrayImageFilter.json"), r#"{"name": "StrayImageFilter"}"#).unwrap();
        Fixture { _dir: dir, root }
    }

    fn request(root: &Utf8Path) -> ItkRequest {
        ItkRequest {
            template_dir: root.join("templates"),
            json_dir: root.join("json"),
            filter_output_dir: root.join("out/filters"),
            test_output_dir: root.join("out/test"),
            docs_output_dir: root.join("out/docs"),
            uuid_table: None,
            filters: Vec::new(),
            all: false,
            emitters: Vec::new(),
        }
    }

    #[test]
    fn test_default_emitter_is_docs() {
        let fx = fixture();
        let mut req = request(&fx.root);
        req.filters = vec!["MedianImage".to_owned()];

        let outcome = run(&ItkConfig::default(), &req).unwrap();
        assert_eq!(outcome.generated, vec!["MedianImage"]);
        assert_eq!(outcome.files, vec![fx.root.join("out/docs/ITKMedianImage.md")]);
        assert!(!outcome.has_warnings());
    }

    #[test]
    fn test_all_emitters() {
        let fx = fixture();
        let mut req = request(&fx.root);
        req.filters = vec!["MedianImage".to_owned()];
        req.emitters = EmitterKind::ALL.to_vec();

        let outcome = run(&ItkConfig::default(), &req).unwrap();
        assert_eq!(outcome.files.len(), 4);

        let header = fs::read_to_string(fx.root.join("out/filters/ITKMedianImage.hpp")).unwrap();
        assert_eq!(
            header,
            "#pragma once\n#include \"complex/Parameters/VectorParameter.hpp\"\nclass ITKMedianImage\n{\n  static inline constexpr StringLiteral k_Radius_Key = \"radius\";\n};\n"
        );
        let test = fs::read_to_string(fx.root.join("out/test/ITKMedianImageTest.cpp")).unwrap();
        assert!(test.contains("REQUIRE(md5Hash == \"abc\");"));
    }

    #[test]
    fn test_unknown_pixel_type_is_a_warning() {
        let fx = fixture();
        let mut req = request(&fx.root);
        req.filters = vec!["OddImage".to_owned()];
        req.emitters = vec![EmitterKind::Source, EmitterKind::Docs];

        let outcome = run(&ItkConfig::default(), &req).unwrap();
        assert_eq!(outcome.generated, vec!["OddImage"]);
        assert_eq!(outcome.warnings.len(), 2);
        let source = fs::read_to_string(fx.root.join("out/filters/ITKOddImage.cpp")).unwrap();
        assert!(source.contains("auto types = UNKNOWN PIXEL TYPE;"));
    }

    #[test]
    fn test_missing_table_entry_is_skipped() {
        let fx = fixture();
        let mut req = request(&fx.root);
        req.filters = vec!["StrayImage".to_owned(), "MedianImage".to_owned()];

        let outcome = run(&ItkConfig::default(), &req).unwrap();
        assert_eq!(outcome.skipped, vec!["StrayImage"]);
        assert_eq!(outcome.generated, vec!["MedianImage"]);
    }

    #[test]
    fn test_all_uses_every_table_entry() {
        let fx = fixture();
        let mut req = request(&fx.root);
        req.all = true;
        req.filters = vec!["Ignored".to_owned()];

        let outcome = run(&ItkConfig::default(), &req).unwrap();
        assert_eq!(outcome.generated, vec!["MedianImage", "OddImage"]);
    }

    #[test]
    fn test_missing_template_is_fatal() {
        let fx = fixture();
        fs::remove_file(fx.root.join("templates/filter.cpp.in")).unwrap();
        let mut req = request(&fx.root);
        req.filters = vec!["MedianImage".to_owned()];
        assert!(run(&ItkConfig::default(), &req).is_err());
        assert!(!fx.root.join("out").exists());
    }
}
