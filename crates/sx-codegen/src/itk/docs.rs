//! Markdown documentation page emission.

use super::filter::ItkFilter;
use crate::error::Emitted;
use crate::naming::human_name;

const LICENSE_FOOTER: &str = "## License & Copyright

Please see the description file distributed with this plugin.

## DREAM3D-NX Help

If you need help, need to file a bug report or want to request a new feature, please head over to the [DREAM3DNX-Issues](https://github.com/BlueQuartzSoftware/DREAM3DNX-Issues/discussions) GitHub site where the community of DREAM3D-NX users can help answer your questions.
";

/// Collapses whitespace so a description fits one table cell.
fn table_cell(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}

impl ItkFilter<'_> {
    /// Emits the markdown documentation page.
    ///
    /// The page carries the unknown pixel type warning when the required
    /// objects table shows the placeholder.
    #[must_use]
    pub fn emit_docs(&self) -> Emitted {
        let d = self.descriptor();
        let group = if d.itk_group.trim().is_empty() {
            d.itk_module.trim()
        } else {
            d.itk_group.trim()
        };

        let mut out = format!("# ITK {} ({})\n\n", human_name(d.base_name()), d.name);
        out.push_str("## Group (Subgroup)\n\n");
        out.push_str(&format!("{} ({group})\n\n", self.plugin()));

        out.push_str("## Description\n\n");
        let description = d.detailed_description.trim();
        let description = if description.is_empty() {
            d.brief_description.trim()
        } else {
            description
        };
        if !description.is_empty() {
            out.push_str(description);
            out.push_str("\n\n");
        }

        out.push_str("## Parameters\n\n");
        out.push_str("| Name | Type | Description |\n");
        out.push_str("|------|------|-------------|\n");
        for resolved in self.members().iter().filter(|m| !m.kind.is_noop()) {
            let member = resolved.member;
            let ty = resolved.kind.value_type().unwrap_or_default();
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                human_name(&member.name),
                ty,
                table_cell(&member.brief_description)
            ));
        }
        out.push('\n');

        out.push_str("## Required Geometry\n\n");
        out.push_str("Image\n\n");

        out.push_str("## Required Objects\n\n");
        out.push_str("| Name | Type | Comment |\n");
        out.push_str("|------|------|---------|\n");
        out.push_str(&format!(
            "| Input Image Data | Array | Allowed types: {} |\n",
            self.pixel().allowed_types
        ));
        for input in self.extra_inputs() {
            out.push_str(&format!(
                "| {} | Array | Allowed types: {} |\n",
                human_name(&input.name),
                self.pixel().allowed_types
            ));
        }
        out.push('\n');

        out.push_str("## Created Objects\n\n");
        out.push_str("| Name | Type | Comment |\n");
        out.push_str("|------|------|---------|\n");
        out.push_str("| Output Image Data | Array | |\n\n");

        out.push_str(LICENSE_FOOTER);
        self.with_pixel_warning(out)
    }
}

#[cfg(test)]
mod tests {
    use sx_core::{ItkFilterDescriptor, LegacyUuid};

    use super::*;

    fn docs(json: &str) -> Emitted {
        let d: ItkFilterDescriptor = serde_json::from_str(json).unwrap();
        let uuid = LegacyUuid::parse("11111111-2222-3333-4444-555555555555").unwrap();
        ItkFilter::resolve(&d, uuid, "ITKImageProcessing")
            .unwrap()
            .emit_docs()
    }

    #[test]
    fn test_docs_page_sections() {
        let page = docs(
            r#"{
                "name": "MedianImageFilter",
                "briefdescription": "Applies a median filter.",
                "detaileddescription": "Computes an image where a given pixel is the median value of the pixels in a neighborhood.",
                "itk_group": "Smoothing",
                "pixel_types": "BasicPixelIDTypeList",
                "members": [{"name": "Radius", "type": "unsigned int", "itk_type": "typename FilterType::RadiusType",
                             "briefdescriptionSet": "Set the radius | of the neighborhood."}]
            }"#,
        );
        assert!(!page.has_warnings());
        let text = page.text;
        assert!(text.starts_with("# ITK Median Image (MedianImageFilter)\n\n## Group (Subgroup)\n\nITKImageProcessing (Smoothing)\n"));
        assert!(text.contains("Computes an image where a given pixel is the median"));
        assert!(text.contains(
            "| Radius | VectorUInt32Parameter::ValueType | Set the radius \\| of the neighborhood. |"
        ));
        assert!(text.contains("Allowed types: ITK::GetScalarPixelAllowedTypes()"));
        assert!(text.ends_with(LICENSE_FOOTER));
    }

    #[test]
    fn test_docs_unknown_pixel_type() {
        let page = docs(r#"{"name": "OddImageFilter", "pixel_types": "LabelPixelIDTypeList"}"#);
        assert!(page.text.contains("Allowed types: UNKNOWN PIXEL TYPE"));
        assert_eq!(page.warnings.len(), 1);
    }

    #[test]
    fn test_docs_fall_back_to_brief_description() {
        let page = docs(
            r#"{"name": "SqrtImageFilter", "briefdescription": "Square root.", "itk_module": "ITKImageIntensity", "pixel_types": "BasicPixelIDTypeList"}"#,
        );
        assert!(page.text.contains("## Description\n\nSquare root.\n"));
        assert!(page.text.contains("ITKImageProcessing (ITKImageIntensity)"));
    }
}
