//! Configuration structures for the simplnx code generators.
//!
//! This module provides configuration types for both generators:
//!
//! - [`SimplConfig`] - SIMPL conversion generator settings (plugin layout, ignore list)
//! - [`ItkConfig`] - ITK wrapper generator settings (filter list, templates, emitters)
//! - [`Config`] - Root configuration combining all settings
//!
//! All configuration types implement [`Default`] with values matching the
//! `complex` source tree layout, so a configuration file only needs to list
//! what differs.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Plugins that only exist to exercise the plugin loader in unit tests.
const DEFAULT_IGNORED_PLUGINS: &[&str] = &["TestOne", "TestTwo"];

/// Hand-maintained list of ITK filters processed when no explicit list is given.
const DEFAULT_ITK_FILTERS: &[&str] = &[
    "AbsImage",
    "AcosImage",
    "ApproximateSignedDistanceMapImage",
    "AsinImage",
    "AtanImage",
    "BinaryContourImage",
    "BinaryDilateImage",
    "BinaryErodeImage",
    "BinaryThresholdImage",
    "BinomialBlurImage",
    "CosImage",
    "CurvatureAnisotropicDiffusionImage",
    "DiscreteGaussianImage",
    "ExpImage",
    "GrayscaleDilateImage",
    "MedianImage",
    "OtsuMultipleThresholdsImage",
    "RescaleIntensityImage",
    "SigmoidImage",
    "SqrtImage",
    "ThresholdImage",
];

/// The artifacts the ITK generator can produce for one filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmitterKind {
    /// `ITK<Name>.hpp` from the header template.
    Header,
    /// `ITK<Name>.cpp` from the source template.
    Source,
    /// `ITK<Name>Test.cpp` Catch2 unit test.
    Test,
    /// `ITK<Name>.md` documentation page.
    Docs,
}

impl EmitterKind {
    /// Every emitter, in the order they run for a filter.
    pub const ALL: [Self; 4] = [Self::Header, Self::Source, Self::Test, Self::Docs];

    /// Returns a lowercase label for logging.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Source => "source",
            Self::Test => "test",
            Self::Docs => "docs",
        }
    }
}

/// Configuration for the SIMPL conversion generator.
///
/// # Examples
///
/// ```
/// use sx_core::SimplConfig;
///
/// let config = SimplConfig::default();
/// assert_eq!(config.plugins_dir, "src/Plugins");
/// assert!(config.ignored_plugins.iter().any(|p| p == "TestOne"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplConfig {
    /// Plugins directory, relative to the complex source root.
    pub plugins_dir: Utf8PathBuf,

    /// Plugin directory names that are never scanned for legacy mappings.
    pub ignored_plugins: Vec<String>,

    /// Default location of the legacy filter schema JSON. A relative path
    /// resolves against the working directory.
    pub simpl_json: Utf8PathBuf,

    /// C++ namespace of the target framework, as it appears in mapping rows.
    pub framework_namespace: String,
}

impl Default for SimplConfig {
    fn default() -> Self {
        Self {
            plugins_dir: Utf8PathBuf::from("src/Plugins"),
            ignored_plugins: DEFAULT_IGNORED_PLUGINS
                .iter()
                .map(|p| (*p).to_owned())
                .collect(),
            simpl_json: Utf8PathBuf::from("simpl_filters.json"),
            framework_namespace: "complex".to_owned(),
        }
    }
}

impl SimplConfig {
    /// Returns `true` if the named plugin must be skipped during mapping discovery.
    #[must_use]
    pub fn is_ignored(&self, plugin: &str) -> bool {
        self.ignored_plugins.iter().any(|p| p == plugin)
    }
}

/// Configuration for the ITK wrapper generator.
///
/// # Examples
///
/// ```
/// use sx_core::{EmitterKind, ItkConfig};
///
/// let config = ItkConfig::default();
/// assert_eq!(config.emitters, vec![EmitterKind::Docs]);
/// assert_eq!(config.header_template, "filter.hpp.in");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItkConfig {
    /// Filters to process, named as in `<Name>Filter.json`.
    pub filters: Vec<String>,

    /// Plugin that owns the generated filters (used in test tags and docs).
    pub plugin_name: String,

    /// File name of the header template inside the template directory.
    pub header_template: String,

    /// File name of the source template inside the template directory.
    pub source_template: String,

    /// File name of the name -> UUID table inside the JSON directory.
    pub uuid_table: String,

    /// Emitters that run for each filter.
    pub emitters: Vec<EmitterKind>,
}

impl Default for ItkConfig {
    fn default() -> Self {
        Self {
            filters: DEFAULT_ITK_FILTERS.iter().map(|f| (*f).to_owned()).collect(),
            plugin_name: "ITKImageProcessing".to_owned(),
            header_template: "filter.hpp.in".to_owned(),
            source_template: "filter.cpp.in".to_owned(),
            uuid_table: "filter_uuids.json".to_owned(),
            emitters: vec![EmitterKind::Docs],
        }
    }
}

/// Root configuration for the generators.
///
/// # Examples
///
/// ```
/// use sx_core::Config;
///
/// let config: Config = serde_json::from_str(r#"{"itk": {"plugin_name": "ITKFoo"}}"#).unwrap();
/// assert_eq!(config.itk.plugin_name, "ITKFoo");
/// assert_eq!(config.simpl.framework_namespace, "complex");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SIMPL conversion generator configuration.
    pub simpl: SimplConfig,

    /// ITK wrapper generator configuration.
    pub itk: ItkConfig,
}

impl Config {
    /// Loads a configuration file, filling absent fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid JSON.
    pub fn from_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks option values that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] for an absolute plugins directory
    /// or an empty template name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simpl.plugins_dir.is_absolute() {
            return Err(ConfigError::InvalidOption {
                option: "simpl.plugins_dir".to_owned(),
                reason: "must be relative to the complex source directory".to_owned(),
            });
        }
        if self.itk.header_template.is_empty() || self.itk.source_template.is_empty() {
            return Err(ConfigError::InvalidOption {
                option: "itk.header_template/itk.source_template".to_owned(),
                reason: "template file names must not be empty".to_owned(),
            });
        }
        Ok(())
    }
}
