//! Line-shape classification for generated C++ sources.
//!
//! The generators never need a real C++ parser: every edit is anchored on one
//! of a handful of recognizable line shapes. [`LineClassifier`] sorts each line
//! of a file into a [`LineShape`] once, so anchor lookups are plain scans over
//! the classified lines.
//!
//! # Recognized Shapes
//!
//! | Shape | Example |
//! |-------|---------|
//! | `Include` | `#include "complex/Filter/IFilter.hpp"` |
//! | `ParameterKeyDecl` | `  static inline constexpr StringLiteral k_Foo_Key = "foo";` |
//! | `MappingRow` | `{complex::Uuid::FromString("...").value(), {complex::FilterTraits<Foo>::uuid, {}}},` |
//! | `Other` | anything else |
//!
//! The mapping-row pattern is tied to the exact formatting of the mapping
//! tables. If that formatting changes, rows silently stop matching.

use regex::Regex;

/// Prefix of a parameter key declaration inside a filter class body.
///
/// The two-space indentation is part of the pattern: keys declared at any
/// other depth are not anchors.
pub const PARAMETER_KEY_PREFIX: &str = "  static inline constexpr StringLiteral k_";

/// Prefix of an include directive.
pub const INCLUDE_PREFIX: &str = "#include";

/// Namespace of the target framework in the mapping tables.
pub const DEFAULT_NAMESPACE: &str = "complex";

/// The converter slot of a mapping row that has no conversion function yet.
pub const EMPTY_CONVERTER: &str = "{}";

/// A parsed row of a plugin's legacy UUID mapping table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRow {
    /// The legacy UUID exactly as written in the row.
    pub uuid: String,

    /// The complex filter class named in `FilterTraits<...>`.
    pub class_name: String,

    /// The converter expression, or `None` for the `{}` placeholder.
    pub converter: Option<String>,
}

impl MappingRow {
    /// Returns `true` if the row already references a conversion function.
    #[inline]
    #[must_use]
    pub const fn is_converted(&self) -> bool {
        self.converter.is_some()
    }
}

/// The recognized shape of one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineShape {
    /// An `#include` directive.
    Include,
    /// A `static inline constexpr StringLiteral k_...` parameter key.
    ParameterKeyDecl,
    /// A row of the legacy UUID mapping table.
    MappingRow(MappingRow),
    /// Any other line.
    Other,
}

impl LineShape {
    /// Returns `true` for include directives.
    #[inline]
    #[must_use]
    pub const fn is_include(&self) -> bool {
        matches!(self, Self::Include)
    }

    /// Returns `true` for parameter key declarations.
    #[inline]
    #[must_use]
    pub const fn is_parameter_key(&self) -> bool {
        matches!(self, Self::ParameterKeyDecl)
    }

    /// Returns the mapping row, if this line is one.
    #[inline]
    #[must_use]
    pub const fn as_mapping_row(&self) -> Option<&MappingRow> {
        match self {
            Self::MappingRow(row) => Some(row),
            _ => None,
        }
    }
}

/// Classifies lines into [`LineShape`]s.
///
/// The mapping-row pattern embeds the framework namespace (`complex` by
/// default), so the classifier is built once per run and shared.
///
/// # Examples
///
/// ```
/// use sx_cpp_parser::{LineClassifier, LineShape};
///
/// let classifier = LineClassifier::new("complex")?;
/// assert_eq!(classifier.classify("#include <vector>"), LineShape::Include);
/// assert_eq!(
///     classifier.classify("  static inline constexpr StringLiteral k_Foo_Key = \"foo\";"),
///     LineShape::ParameterKeyDecl
/// );
/// assert_eq!(classifier.classify("int main() {}"), LineShape::Other);
/// # Ok::<(), regex::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct LineClassifier {
    mapping_row: Regex,
}

impl LineClassifier {
    /// Builds a classifier for mapping rows written against `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`regex::Error`] if the assembled pattern does not compile,
    /// which can only happen for pathological namespace strings.
    pub fn new(namespace: &str) -> Result<Self, regex::Error> {
        let ns = regex::escape(namespace);
        let pattern = format!(
            r#"\{{{ns}::Uuid::FromString\("(?P<uuid>[^"]+)"\)\.value\(\), \{{{ns}::FilterTraits<(?P<class>\w+)>::uuid, (?P<converter>\{{\}}|&[\w:]+::FromSIMPLJson)\}}\}},"#
        );
        Ok(Self {
            mapping_row: Regex::new(&pattern)?,
        })
    }

    /// Classifies a single line.
    #[must_use]
    pub fn classify(&self, line: &str) -> LineShape {
        if line.starts_with(INCLUDE_PREFIX) {
            return LineShape::Include;
        }
        if line.starts_with(PARAMETER_KEY_PREFIX) {
            return LineShape::ParameterKeyDecl;
        }
        if let Some(row) = self.parse_mapping_row(line) {
            return LineShape::MappingRow(row);
        }
        LineShape::Other
    }

    /// Extracts every mapping row from a whole file's contents.
    ///
    /// Matches are returned in file order.
    #[must_use]
    pub fn mapping_rows(&self, contents: &str) -> Vec<MappingRow> {
        self.mapping_row
            .captures_iter(contents)
            .filter_map(|caps| Self::row_from_captures(&caps))
            .collect()
    }

    fn parse_mapping_row(&self, line: &str) -> Option<MappingRow> {
        self.mapping_row
            .captures(line)
            .and_then(|caps| Self::row_from_captures(&caps))
    }

    fn row_from_captures(caps: &regex::Captures<'_>) -> Option<MappingRow> {
        let uuid = caps.name("uuid")?.as_str().to_owned();
        let class_name = caps.name("class")?.as_str().to_owned();
        let converter = caps
            .name("converter")
            .map(|m| m.as_str())
            .filter(|c| *c != EMPTY_CONVERTER)
            .map(ToOwned::to_owned);
        Some(MappingRow {
            uuid,
            class_name,
            converter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW: &str = r#"    {complex::Uuid::FromString("11111111-1111-1111-1111-111111111111").value(), {complex::FilterTraits<FooClass>::uuid, {}}}, // Foo"#;
    const CONVERTED_ROW: &str = r#"    {complex::Uuid::FromString("22222222-2222-2222-2222-222222222222").value(), {complex::FilterTraits<BarClass>::uuid, &BarClass::FromSIMPLJson}}, // Bar"#;

    fn complex() -> LineClassifier {
        LineClassifier::new(DEFAULT_NAMESPACE).unwrap()
    }

    #[test]
    fn test_classify_include() {
        let classifier = complex();
        assert!(classifier.classify("#include \"Foo.hpp\"").is_include());
        assert!(!classifier.classify("  #include \"Foo.hpp\"").is_include());
        assert!(!classifier.classify("// #include \"Foo.hpp\"").is_include());
    }

    #[test]
    fn test_parameter_key_requires_exact_indentation() {
        let classifier = complex();
        let two = "  static inline constexpr StringLiteral k_Bar_Key = \"bar\";";
        let four = "    static inline constexpr StringLiteral k_Bar_Key = \"bar\";";
        assert!(classifier.classify(two).is_parameter_key());
        assert!(!classifier.classify(four).is_parameter_key());
    }

    #[test]
    fn test_classify_mapping_row() {
        let classifier = complex();
        let shape = classifier.classify(ROW);
        let row = shape.as_mapping_row().unwrap();
        assert_eq!(row.uuid, "11111111-1111-1111-1111-111111111111");
        assert_eq!(row.class_name, "FooClass");
        assert!(!row.is_converted());
    }

    #[test]
    fn test_classify_converted_mapping_row() {
        let classifier = complex();
        let shape = classifier.classify(CONVERTED_ROW);
        let row = shape.as_mapping_row().unwrap();
        assert_eq!(row.class_name, "BarClass");
        assert_eq!(row.converter.as_deref(), Some("&BarClass::FromSIMPLJson"));
    }

    #[test]
    fn test_reformatted_row_does_not_match() {
        let classifier = complex();
        let spaced = r#"{ complex::Uuid::FromString("11111111-1111-1111-1111-111111111111").value(), {complex::FilterTraits<FooClass>::uuid, {}}},"#;
        assert_eq!(classifier.classify(spaced), LineShape::Other);
    }

    #[test]
    fn test_custom_namespace() {
        let classifier = LineClassifier::new("nx::core").unwrap();
        let row = r#"{nx::core::Uuid::FromString("11111111-1111-1111-1111-111111111111").value(), {nx::core::FilterTraits<FooClass>::uuid, {}}},"#;
        assert!(classifier.classify(row).as_mapping_row().is_some());
        assert_eq!(complex().classify(row), LineShape::Other);
    }

    #[test]
    fn test_mapping_rows_in_file_order() {
        let classifier = complex();
        let contents = format!("#pragma once\n{ROW}\n{CONVERTED_ROW}\n");
        let rows = classifier.mapping_rows(&contents);
        let classes: Vec<_> = rows.iter().map(|r| r.class_name.as_str()).collect();
        assert_eq!(classes, vec!["FooClass", "BarClass"]);
    }
}
