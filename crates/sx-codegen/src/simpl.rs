//! SIMPL to complex conversion emitter.
//!
//! For one legacy filter, [`create_filter_conversion`] produces the three
//! fragments the patcher splices into the filter's sources:
//!
//! ```text
//! FooClass.hpp   <- header_keys    one k_<Name>Key per parameter
//! FooClass.cpp   <- simpl_keys     SIMPL::k_<Name>Key legacy names
//!                <- function       FooClass::FromSIMPLJson(...)
//! ```
//!
//! Separator parameters produce nothing. The generated converter names
//! (`SIMPLConversion::<Type>`) are not checked here; the C++ compiler is the
//! judge of whether a converter exists for a type.

use sx_core::FilterDescriptor;

use crate::naming::{simpl_key_name, simpl_key_var};

/// Indentation of a parameter key declaration inside a filter class body.
const CLASS_MEMBER_INDENT: &str = "  ";

/// The generated pieces of one filter's conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConversion {
    /// Key declarations for the class body in the header.
    pub header_keys: String,
    /// The `SIMPL` namespace block with the legacy key names.
    pub simpl_keys: String,
    /// The `FromSIMPLJson` definition, wrapped in the framework namespace.
    pub function: String,
    /// Number of parameters that were converted.
    pub parameter_count: usize,
}

impl FilterConversion {
    /// Returns the converter reference written into the mapping table.
    #[must_use]
    pub fn converter_reference(class_name: &str) -> String {
        format!("&{class_name}::FromSIMPLJson")
    }
}

/// Builds the conversion fragments for one legacy filter.
///
/// # Examples
///
/// ```
/// use sx_codegen::create_filter_conversion;
/// use sx_core::FilterDescriptor;
///
/// let filter: FilterDescriptor = serde_json::from_str(r#"{
///     "name": "Foo",
///     "uuid": "{11111111-1111-1111-1111-111111111111}",
///     "parameters": [{"name": "Bar", "type": "BoolConverter"}]
/// }"#)?;
///
/// let conversion = create_filter_conversion(&filter, "FooClass", "complex");
/// assert_eq!(
///     conversion.header_keys,
///     "  static inline constexpr StringLiteral k_BarKey = \"bar\";"
/// );
/// assert!(conversion.function.contains("Result<Arguments> FooClass::FromSIMPLJson(const nlohmann::json& json)"));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[must_use]
pub fn create_filter_conversion(
    filter: &FilterDescriptor,
    class_name: &str,
    namespace: &str,
) -> FilterConversion {
    let params: Vec<_> = filter.convertible_parameters().collect();

    let header_keys = params
        .iter()
        .map(|p| {
            format!(
                "{CLASS_MEMBER_INDENT}static inline constexpr StringLiteral {} = \"{}\";",
                simpl_key_var(&p.name),
                simpl_key_name(&p.name)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let mut simpl_keys = String::from("namespace SIMPL\n{\n");
    for p in &params {
        simpl_keys.push_str(&format!(
            "constexpr StringLiteral {} = \"{}\";\n",
            simpl_key_var(&p.name),
            p.name
        ));
    }
    simpl_keys.push_str("} // namespace SIMPL\n");

    let mut function = format!("\nnamespace {namespace}\n{{\n");
    function.push_str(&format!(
        "Result<Arguments> {class_name}::FromSIMPLJson(const nlohmann::json& json)\n{{\n"
    ));
    function.push_str(&format!(
        "  Arguments args = {class_name}().getDefaultArguments();\n\n"
    ));
    function.push_str("  std::vector<Result<>> results;\n\n");
    for p in &params {
        let key = simpl_key_var(&p.name);
        function.push_str(&format!(
            "  results.push_back(SIMPLConversion::ConvertParameter<SIMPLConversion::{}>(args, json, SIMPL::{key}, {key}));\n",
            p.source_type
        ));
    }
    if !params.is_empty() {
        function.push('\n');
    }
    function.push_str("  Result<> conversionResult = MergeResults(std::move(results));\n\n");
    function.push_str(
        "  return ConvertResultTo<Arguments>(std::move(conversionResult), std::move(args));\n",
    );
    function.push_str("}\n");
    function.push_str(&format!("}} // namespace {namespace}"));

    FilterConversion {
        header_keys,
        simpl_keys,
        function,
        parameter_count: params.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(json: &str) -> FilterDescriptor {
        serde_json::from_str(json).unwrap()
    }

    const FOO: &str = r#"{
        "name": "Foo",
        "uuid": "{11111111-1111-1111-1111-111111111111}",
        "parameters": [
            {"name": "Required Input", "type": "SeparatorFilterParameter"},
            {"name": "Bar", "type": "BoolConverter"},
            {"name": "CellAttributeMatrixPath", "type": "DataArrayPathFilterParamConverter"}
        ]
    }"#;

    #[test]
    fn test_separator_parameters_emit_nothing() {
        let conversion = create_filter_conversion(&filter(FOO), "FooClass", "complex");
        assert_eq!(conversion.parameter_count, 2);
        for text in [
            &conversion.header_keys,
            &conversion.simpl_keys,
            &conversion.function,
        ] {
            assert!(!text.contains("Required"), "{text}");
            assert!(!text.contains("Separator"), "{text}");
        }
    }

    #[test]
    fn test_header_keys() {
        let conversion = create_filter_conversion(&filter(FOO), "FooClass", "complex");
        let lines: Vec<_> = conversion.header_keys.lines().collect();
        assert_eq!(
            lines,
            vec![
                "  static inline constexpr StringLiteral k_BarKey = \"bar\";",
                "  static inline constexpr StringLiteral k_CellAttributeMatrixPathKey = \"cell_attribute_matrix_path\";",
            ]
        );
    }

    #[test]
    fn test_function_body() {
        let conversion = create_filter_conversion(&filter(FOO), "FooClass", "complex");
        let expected = "
namespace complex
{
Result<Arguments> FooClass::FromSIMPLJson(const nlohmann::json& json)
{
  Arguments args = FooClass().getDefaultArguments();

  std::vector<Result<>> results;

  results.push_back(SIMPLConversion::ConvertParameter<SIMPLConversion::BoolConverter>(args, json, SIMPL::k_BarKey, k_BarKey));
  results.push_back(SIMPLConversion::ConvertParameter<SIMPLConversion::DataArrayPathFilterParamConverter>(args, json, SIMPL::k_CellAttributeMatrixPathKey, k_CellAttributeMatrixPathKey));

  Result<> conversionResult = MergeResults(std::move(results));

  return ConvertResultTo<Arguments>(std::move(conversionResult), std::move(args));
}
} // namespace complex";
        assert_eq!(conversion.function, expected);
    }

    #[test]
    fn test_simpl_keys_keep_legacy_names() {
        let conversion = create_filter_conversion(&filter(FOO), "FooClass", "complex");
        assert_eq!(
            conversion.simpl_keys,
            "namespace SIMPL\n{\nconstexpr StringLiteral k_BarKey = \"Bar\";\nconstexpr StringLiteral k_CellAttributeMatrixPathKey = \"CellAttributeMatrixPath\";\n} // namespace SIMPL\n"
        );
    }

    #[test]
    fn test_braces_balance() {
        let conversion = create_filter_conversion(&filter(FOO), "FooClass", "nx::core");
        for text in [&conversion.simpl_keys, &conversion.function] {
            let open = text.matches('{').count();
            let close = text.matches('}').count();
            assert_eq!(open, close, "{text}");
        }
        assert!(conversion.function.contains("namespace nx::core\n"));
    }

    #[test]
    fn test_no_parameters() {
        let conversion = create_filter_conversion(
            &filter(r#"{"name": "Empty", "uuid": "22222222-2222-2222-2222-222222222222"}"#),
            "EmptyFilter",
            "complex",
        );
        assert_eq!(conversion.header_keys, "");
        assert!(!conversion.function.contains("push_back"));
        assert_eq!(
            FilterConversion::converter_reference("EmptyFilter"),
            "&EmptyFilter::FromSIMPLJson"
        );
    }
}
