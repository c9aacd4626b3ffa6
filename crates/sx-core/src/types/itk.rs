//! ITK filter descriptors.
//!
//! One [`ItkFilterDescriptor`] is read from each `<Name>Filter.json` file.
//! The JSON files are maintained by hand and are loose about value types
//! (a default may be `1`, `"1"` or `true`), so scalar-ish fields are read
//! leniently into strings. Every optional field defaults to an empty value.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use smallvec::SmallVec;

/// Reads any scalar JSON value as a string; `null` becomes the empty string.
///
/// Arrays are rendered as comma-separated elements so that vector defaults
/// such as `[1, 1, 1]` survive as `"1, 1, 1"`.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(&value))
}

/// Renders a JSON value the way it should appear in generated C++.
#[must_use]
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// A configurable member of an ITK filter (one setter on the ITK class).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDescriptor {
    /// Member name, which is also the ITK setter suffix (`Set<Name>`).
    pub name: String,

    /// General C++ type of the member.
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub member_type: String,

    /// Default value as a C++ expression.
    #[serde(default, deserialize_with = "lenient_string")]
    pub default: String,

    /// ITK-specific type tag; takes precedence over `member_type` when set.
    #[serde(default, deserialize_with = "lenient_string")]
    pub itk_type: String,

    /// One-line description of the setter.
    #[serde(rename = "briefdescriptionSet", default, deserialize_with = "lenient_string")]
    pub brief_description: String,

    /// Long description of the setter.
    #[serde(rename = "detaileddescriptionSet", default, deserialize_with = "lenient_string")]
    pub detailed_description: String,
}

/// An image input of a multi-input ITK filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDescriptor {
    /// Input name, e.g. `Image1`.
    pub name: String,

    /// Input type, e.g. `Image`.
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub input_type: String,

    /// Default value, if the JSON declares one.
    #[serde(default, deserialize_with = "lenient_string")]
    pub default: String,
}

/// One parameter assignment inside a test fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSetting {
    /// Name of the member being set.
    pub parameter: String,

    /// Raw JSON value; shaped into a C++ literal by the member's kind.
    #[serde(default)]
    pub value: Value,
}

/// A test fixture that drives generation of one test case.
///
/// If [`expected_hash`](Self::expected_hash) is empty the test compares
/// against a baseline image instead of an MD5 hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestFixtureDescriptor {
    /// Short tag, unique within the filter, used in the test name.
    pub tag: String,

    /// Human description of the test.
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,

    /// Parameter assignments.
    #[serde(default)]
    pub settings: Vec<TestSetting>,

    /// Expected MD5 of the output array; empty selects baseline comparison.
    #[serde(rename = "md5hash", default, deserialize_with = "lenient_string")]
    pub expected_hash: String,

    /// Input image paths relative to the test data directory.
    #[serde(rename = "inputs", default)]
    pub input_images: SmallVec<[String; 2]>,

    /// Baseline comparison tolerance; empty means exact.
    #[serde(default, deserialize_with = "lenient_string")]
    pub tolerance: String,
}

impl TestFixtureDescriptor {
    /// Returns the expected MD5 hash, or `None` for baseline comparison mode.
    #[inline]
    #[must_use]
    pub fn expected_hash(&self) -> Option<&str> {
        Some(self.expected_hash.as_str()).filter(|h| !h.is_empty())
    }

    /// Returns the comparison tolerance, or `None` when the JSON gave none.
    #[inline]
    #[must_use]
    pub fn tolerance(&self) -> Option<&str> {
        Some(self.tolerance.as_str()).filter(|t| !t.is_empty())
    }
}

/// An ITK filter description read from `<Name>Filter.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItkFilterDescriptor {
    /// ITK class name, e.g. `BinaryThresholdImageFilter`.
    pub name: String,

    /// One-line description.
    #[serde(rename = "briefdescription", default, deserialize_with = "lenient_string")]
    pub brief_description: String,

    /// Long description.
    #[serde(rename = "detaileddescription", default, deserialize_with = "lenient_string")]
    pub detailed_description: String,

    /// ITK module that provides the filter.
    #[serde(default, deserialize_with = "lenient_string")]
    pub itk_module: String,

    /// ITK group the filter belongs to.
    #[serde(default, deserialize_with = "lenient_string")]
    pub itk_group: String,

    /// SimpleITK pixel type list the filter is instantiated for.
    #[serde(default, deserialize_with = "lenient_string")]
    pub pixel_types: String,

    /// Configurable members.
    #[serde(default)]
    pub members: Vec<MemberDescriptor>,

    /// Named image inputs (multi-input filters only).
    #[serde(default)]
    pub inputs: SmallVec<[InputDescriptor; 2]>,

    /// Test fixtures.
    #[serde(default)]
    pub tests: Vec<TestFixtureDescriptor>,

    /// Explicit ITK filter type expression; empty means `itk::<name>`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub filter_type: String,

    /// Output pixel type when it differs from the input pixel type.
    #[serde(default, deserialize_with = "lenient_string")]
    pub output_pixel_type: String,

    /// Vector pixel type list applied per component, if any.
    #[serde(default, deserialize_with = "lenient_string")]
    pub vector_pixel_types_by_component: String,
}

impl ItkFilterDescriptor {
    /// Returns the ITK class name without the `Filter` suffix.
    ///
    /// # Examples
    ///
    /// ```
    /// use sx_core::ItkFilterDescriptor;
    ///
    /// let filter: ItkFilterDescriptor =
    ///     serde_json::from_str(r#"{"name": "BinaryThresholdImageFilter"}"#).unwrap();
    /// assert_eq!(filter.base_name(), "BinaryThresholdImage");
    /// assert_eq!(filter.class_name(), "ITKBinaryThresholdImage");
    /// ```
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.name.strip_suffix("Filter").unwrap_or(&self.name)
    }

    /// Returns the name of the generated complex filter class.
    #[must_use]
    pub fn class_name(&self) -> String {
        format!("ITK{}", self.base_name())
    }

    /// Returns `true` if the filter writes a different pixel type than it reads.
    #[inline]
    #[must_use]
    pub fn has_output_pixel_type(&self) -> bool {
        !self.output_pixel_type.is_empty()
    }

    /// Looks up a member by name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.name == name)
    }
}
