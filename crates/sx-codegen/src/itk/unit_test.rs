//! Catch2 unit test emission.
//!
//! One `TEST_CASE` per fixture. A fixture with an `md5hash` checks the output
//! array's hash; a fixture without one compares against a baseline image.
//! The two checks never appear in the same test case.

use sx_core::TestFixtureDescriptor;

use super::filter::ItkFilter;
use crate::error::{EmitError, Emitted};
use crate::naming::{generate_key_var, local_var};

/// Directory under the test data root that holds fixture images.
const TEST_DATA_DIR: &str = "JSONFilters";

impl ItkFilter<'_> {
    /// Emits the Catch2 test source for every fixture.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::UnknownTestParameter`] if a fixture sets a member
    /// the filter does not declare.
    pub fn emit_test(&self) -> Result<Emitted, EmitError> {
        let class = self.class_name();
        let mut out = String::from("#include <catch2/catch.hpp>\n\n");
        out.push_str(&format!("#include \"{}/Filters/{class}.hpp\"\n", self.plugin()));
        out.push_str(&format!("#include \"{}/{}_test_dirs.hpp\"\n", self.plugin(), self.plugin()));
        out.push_str("#include \"ITKTestBase.hpp\"\n\n");
        out.push_str("#include \"complex/Parameters/ArraySelectionParameter.hpp\"\n");
        out.push_str("#include \"complex/Parameters/DataObjectNameParameter.hpp\"\n");
        out.push_str("#include \"complex/Parameters/GeometrySelectionParameter.hpp\"\n");
        for include in self.includes() {
            out.push_str(include);
            out.push('\n');
        }
        out.push_str("#include \"complex/UnitTest/UnitTestCommon.hpp\"\n\n");
        out.push_str("#include <filesystem>\n\n");
        out.push_str("namespace fs = std::filesystem;\n\n");
        out.push_str("using namespace complex;\n");

        for fixture in &self.descriptor().tests {
            out.push('\n');
            out.push_str(&self.test_case(fixture)?);
        }

        Ok(self.with_pixel_warning(out))
    }

    fn test_case(&self, fixture: &TestFixtureDescriptor) -> Result<String, EmitError> {
        let class = self.class_name();
        let plugin = self.plugin();
        let tag = &fixture.tag;

        let mut out = format!(
            "TEST_CASE(\"{plugin}::{class}({tag})\", \"[{plugin}][{class}][{tag}]\")\n{{\n"
        );
        if !fixture.description.trim().is_empty() {
            out.push_str(&format!("  // {}\n", fixture.description.trim()));
        }
        out.push_str("  DataStructure dataStructure;\n");
        out.push_str(&format!("  const {class} filter;\n\n"));
        out.push_str("  const DataPath inputGeometryPath({ITKTestBase::k_ImageGeometryPath});\n");
        out.push_str(
            "  const DataPath cellDataPath = inputGeometryPath.createChildPath(ITKTestBase::k_ImageCellDataPath);\n",
        );
        out.push_str(
            "  const DataPath inputDataPath = cellDataPath.createChildPath(ITKTestBase::k_InputDataPath);\n",
        );
        out.push_str(
            "  const DataObjectNameParameter::ValueType outputArrayName = ITKTestBase::k_OutputDataPath;\n",
        );

        let extra = self.extra_inputs();
        for (index, image) in fixture.input_images.iter().enumerate() {
            let data_path = match index {
                0 => "inputDataPath".to_owned(),
                n => {
                    let name = extra
                        .get(n - 1)
                        .map_or_else(|| format!("Input{}", n + 1), |i| i.name.clone());
                    let var = format!("{}Path", local_var(&name));
                    out.push_str(&format!(
                        "  const DataPath {var} = cellDataPath.createChildPath(\"{name}\");\n"
                    ));
                    var
                }
            };
            out.push_str("  {\n");
            out.push_str(&format!(
                "    const fs::path inputFilePath = fs::path(unit_test::k_SourceDir.view()) / unit_test::k_DataDir.view() / \"{TEST_DATA_DIR}\" / \"{image}\";\n"
            ));
            out.push_str(&format!(
                "    Result<> imageReadResult = ITKTestBase::ReadImage(dataStructure, inputFilePath, inputGeometryPath, cellDataPath, {data_path});\n"
            ));
            out.push_str("    COMPLEX_RESULT_REQUIRE_VALID(imageReadResult)\n");
            out.push_str("  }\n");
        }

        out.push_str("\n  Arguments args;\n");
        out.push_str(&format!(
            "  args.insertOrAssign({class}::k_SelectedImageGeomPath_Key, std::make_any<DataPath>(inputGeometryPath));\n"
        ));
        out.push_str(&format!(
            "  args.insertOrAssign({class}::k_SelectedImageDataPath_Key, std::make_any<DataPath>(inputDataPath));\n"
        ));
        out.push_str(&format!(
            "  args.insertOrAssign({class}::k_OutputImageDataPath_Key, std::make_any<DataObjectNameParameter::ValueType>(outputArrayName));\n"
        ));
        for input in extra.iter().take(fixture.input_images.len().saturating_sub(1)) {
            out.push_str(&format!(
                "  args.insertOrAssign({class}::{}, std::make_any<DataPath>({}Path));\n",
                generate_key_var(&input.name, true),
                local_var(&input.name)
            ));
        }
        for setting in &fixture.settings {
            let kind = self.member_kind(&setting.parameter).ok_or_else(|| {
                EmitError::UnknownTestParameter {
                    filter: self.descriptor().name.clone(),
                    tag: tag.clone(),
                    parameter: setting.parameter.clone(),
                }
            })?;
            if let Some(literal) = kind.test_literal(&setting.value) {
                out.push_str(&format!(
                    "  args.insertOrAssign({class}::{}, {literal});\n",
                    generate_key_var(&setting.parameter, false)
                ));
            }
        }

        out.push_str("\n  auto preflightResult = filter.preflight(dataStructure, args);\n");
        out.push_str("  COMPLEX_RESULT_REQUIRE_VALID(preflightResult.outputActions)\n");
        out.push_str("  auto executeResult = filter.execute(dataStructure, args);\n");
        out.push_str("  COMPLEX_RESULT_REQUIRE_VALID(executeResult.result)\n\n");

        match fixture.expected_hash() {
            Some(hash) => {
                out.push_str(
                    "  const std::string md5Hash = ITKTestBase::ComputeMd5Hash(dataStructure, cellDataPath.createChildPath(outputArrayName));\n",
                );
                out.push_str(&format!("  REQUIRE(md5Hash == \"{hash}\");\n"));
            }
            None => out.push_str(&self.baseline_check(fixture)),
        }

        out.push_str("}\n");
        Ok(out)
    }

    fn baseline_check(&self, fixture: &TestFixtureDescriptor) -> String {
        let baseline = format!(
            "Baseline/BasicFilters_{}_{}.nrrd",
            self.descriptor().name,
            fixture.tag
        );
        let tolerance = fixture.tolerance().unwrap_or("0");

        let mut out = format!(
            "  const fs::path baselineFilePath = fs::path(unit_test::k_SourceDir.view()) / unit_test::k_DataDir.view() / \"{TEST_DATA_DIR}\" / \"{baseline}\";\n"
        );
        out.push_str("  const DataPath baselineGeometryPath({ITKTestBase::k_BaselineGeometryPath});\n");
        out.push_str(
            "  const DataPath baselineCellDataPath = baselineGeometryPath.createChildPath(ITKTestBase::k_ImageCellDataPath);\n",
        );
        out.push_str(
            "  const DataPath baselineDataPath = baselineCellDataPath.createChildPath(ITKTestBase::k_BaselineDataPath);\n",
        );
        out.push_str(
            "  const Result<> readBaselineResult = ITKTestBase::ReadImage(dataStructure, baselineFilePath, baselineGeometryPath, baselineCellDataPath, baselineDataPath);\n",
        );
        out.push_str("  COMPLEX_RESULT_REQUIRE_VALID(readBaselineResult)\n");
        out.push_str(&format!(
            "  const Result<> compareResult = ITKTestBase::CompareImages(dataStructure, baselineGeometryPath, baselineDataPath, inputGeometryPath, cellDataPath.createChildPath(outputArrayName), {tolerance});\n"
        ));
        out.push_str("  REQUIRE(compareResult.valid());\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use sx_core::{ItkFilterDescriptor, LegacyUuid};

    use super::*;

    const THRESHOLD: &str = r#"{
        "name": "BinaryThresholdImageFilter",
        "pixel_types": "BasicPixelIDTypeList",
        "members": [
            {"name": "LowerThreshold", "type": "double", "default": 0.0},
            {"name": "InsideValue", "type": "uint8_t", "default": 1},
            {"name": "OutputPixelType", "type": "PixelIDValueEnum"}
        ],
        "tests": [
            {"tag": "hashed", "description": "Hash check", "inputs": ["Input/RA-Short.nrrd"],
             "settings": [{"parameter": "LowerThreshold", "value": 10.5}, {"parameter": "OutputPixelType", "value": "sitkUInt8"}],
             "md5hash": "0f6e2c5b2e7c4d4e8f3b1a2c3d4e5f60"},
            {"tag": "baseline", "inputs": ["Input/RA-Float.nrrd"],
             "settings": [{"parameter": "InsideValue", "value": 255}],
             "tolerance": 0.01}
        ]
    }"#;

    fn descriptor(json: &str) -> ItkFilterDescriptor {
        serde_json::from_str(json).unwrap()
    }

    fn emit(json: &str) -> Result<Emitted, EmitError> {
        let d = descriptor(json);
        let uuid = LegacyUuid::parse("11111111-2222-3333-4444-555555555555").unwrap();
        ItkFilter::resolve(&d, uuid, "ITKImageProcessing")
            .unwrap()
            .emit_test()
    }

    fn test_cases(text: &str) -> Vec<&str> {
        text.split("TEST_CASE(").skip(1).collect()
    }

    #[test]
    fn test_one_case_per_fixture() {
        let text = emit(THRESHOLD).unwrap().text;
        assert_eq!(test_cases(&text).len(), 2);
        assert!(text.contains(
            "TEST_CASE(\"ITKImageProcessing::ITKBinaryThresholdImage(hashed)\", \"[ITKImageProcessing][ITKBinaryThresholdImage][hashed]\")"
        ));
    }

    #[test]
    fn test_md5_and_baseline_are_exclusive() {
        let text = emit(THRESHOLD).unwrap().text;
        let cases = test_cases(&text);

        let hashed = cases[0];
        assert!(hashed.contains("REQUIRE(md5Hash == \"0f6e2c5b2e7c4d4e8f3b1a2c3d4e5f60\");"));
        assert!(!hashed.contains("CompareImages"));

        let baseline = cases[1];
        assert!(!baseline.contains("md5Hash"));
        assert!(baseline.contains("Baseline/BasicFilters_BinaryThresholdImageFilter_baseline.nrrd"));
        assert!(baseline.contains("cellDataPath.createChildPath(outputArrayName), 0.01);"));
        assert!(baseline.contains("REQUIRE(compareResult.valid());"));
    }

    #[test]
    fn test_settings_use_kind_literals() {
        let text = emit(THRESHOLD).unwrap().text;
        let cases = test_cases(&text);
        assert!(cases[0].contains(
            "args.insertOrAssign(ITKBinaryThresholdImage::k_LowerThreshold_Key, std::make_any<float64>(10.5));"
        ));
        assert!(!cases[0].contains("OutputPixelType"));
        assert!(cases[1].contains(
            "args.insertOrAssign(ITKBinaryThresholdImage::k_InsideValue_Key, std::make_any<uint8>(255));"
        ));
    }

    #[test]
    fn test_input_images_are_read() {
        let text = emit(THRESHOLD).unwrap().text;
        assert!(text.contains("/ \"JSONFilters\" / \"Input/RA-Short.nrrd\";"));
        assert_eq!(text.matches("COMPLEX_RESULT_REQUIRE_VALID(imageReadResult)").count(), 2);
    }

    #[test]
    fn test_second_input_image() {
        let json = r#"{
            "name": "AddImageFilter",
            "pixel_types": "BasicPixelIDTypeList",
            "inputs": [{"name": "Image1", "type": "Image"}, {"name": "Image2", "type": "Image"}],
            "tests": [{"tag": "2d", "inputs": ["Input/A.nrrd", "Input/B.nrrd"], "md5hash": "abc"}]
        }"#;
        let text = emit(json).unwrap().text;
        assert!(text.contains("const DataPath image2Path = cellDataPath.createChildPath(\"Image2\");"));
        assert!(text.contains("cellDataPath, image2Path);"));
        assert!(text.contains(
            "args.insertOrAssign(ITKAddImage::k_Image2Path_Key, std::make_any<DataPath>(image2Path));"
        ));
    }

    #[test]
    fn test_unknown_setting_is_error() {
        let json = r#"{
            "name": "SqrtImageFilter",
            "tests": [{"tag": "bad", "settings": [{"parameter": "Missing", "value": 1}], "md5hash": "abc"}]
        }"#;
        let err = emit(json).unwrap_err();
        assert!(matches!(
            err,
            EmitError::UnknownTestParameter { ref tag, ref parameter, .. }
                if tag == "bad" && parameter == "Missing"
        ));
    }
}
