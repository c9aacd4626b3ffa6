//! Per-filter ITK wrapper generation.
//!
//! [`ItkFilter::resolve`] classifies every member once; the emitters then
//! read the resolved kinds. Header and source text come from the two
//! on-disk templates, rendered with [`ItkFilter::substitutions`].

use std::collections::BTreeSet;

use sx_core::{InputDescriptor, ItkFilterDescriptor, LegacyUuid, MemberDescriptor};
use tracing::debug;

use super::kind::{cpp_string, ParameterKind};
use super::pixel::{output_type, PixelResolution, UNKNOWN_PIXEL_TYPE};
use crate::error::{EmitError, Emitted};
use crate::naming::{generate_key_name, generate_key_var, human_name, local_var};
use crate::template::{Substitutions, Template};

/// Include for the parameter used by extra image inputs.
const ARRAY_SELECTION_INCLUDE: &str = "#include \"complex/Parameters/ArraySelectionParameter.hpp\"";

/// Separator line that opens the generated parameter declarations.
const PARAMETER_SEPARATOR: &str =
    "params.insertSeparator(Parameters::Separator{\"Input Parameter(s)\"});";

/// Indentation of statements in a function body.
const BODY_INDENT: &str = "  ";

/// A member together with its resolved kind.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedMember<'a> {
    /// The member as described in the JSON.
    pub member: &'a MemberDescriptor,
    /// Its kind.
    pub kind: ParameterKind,
}

/// An ITK filter ready for emission.
///
/// # Examples
///
/// ```
/// use sx_codegen::itk::ItkFilter;
/// use sx_core::{ItkFilterDescriptor, LegacyUuid};
///
/// let descriptor: ItkFilterDescriptor = serde_json::from_str(r#"{
///     "name": "SqrtImageFilter",
///     "pixel_types": "BasicPixelIDTypeList"
/// }"#)?;
/// let uuid = LegacyUuid::parse("{f8ca3f31-3d2b-4a13-9ad1-c8cd4e5bd8a7}")?;
///
/// let filter = ItkFilter::resolve(&descriptor, uuid, "ITKImageProcessing")?;
/// let values = filter.substitutions();
/// assert_eq!(values["FILTER_NAME"], "ITKSqrtImage");
/// assert_eq!(values["ALLOWED_TYPES"], "ITK::GetScalarPixelAllowedTypes()");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct ItkFilter<'a> {
    descriptor: &'a ItkFilterDescriptor,
    uuid: LegacyUuid,
    plugin: String,
    members: Vec<ResolvedMember<'a>>,
    pixel: PixelResolution,
}

impl<'a> ItkFilter<'a> {
    /// Resolves every member's kind and the pixel type list.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::UnsupportedType`] for the first member whose
    /// type maps to no kind, and [`EmitError::MissingKernelRadius`] when a
    /// `KernelType` member has no `KernelRadius` beside it.
    pub fn resolve(
        descriptor: &'a ItkFilterDescriptor,
        uuid: LegacyUuid,
        plugin: impl Into<String>,
    ) -> Result<Self, EmitError> {
        let members = descriptor
            .members
            .iter()
            .map(|member| {
                ParameterKind::resolve(&descriptor.name, member)
                    .map(|kind| ResolvedMember { member, kind })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let has_kind = |kind: ParameterKind| members.iter().any(|m| m.kind == kind);
        if has_kind(ParameterKind::KernelType) && !has_kind(ParameterKind::KernelRadius) {
            return Err(EmitError::MissingKernelRadius {
                filter: descriptor.name.clone(),
            });
        }

        debug!(
            filter = %descriptor.name,
            members = members.len(),
            "Resolved ITK filter members"
        );

        Ok(Self {
            descriptor,
            uuid,
            plugin: plugin.into(),
            members,
            pixel: PixelResolution::resolve(descriptor),
        })
    }

    /// Returns the descriptor.
    #[inline]
    #[must_use]
    pub fn descriptor(&self) -> &'a ItkFilterDescriptor {
        self.descriptor
    }

    /// Returns the generated class name, e.g. `ITKMedianImage`.
    #[must_use]
    pub fn class_name(&self) -> String {
        self.descriptor.class_name()
    }

    /// Returns the filter UUID.
    #[inline]
    #[must_use]
    pub fn uuid(&self) -> &LegacyUuid {
        &self.uuid
    }

    /// Returns the owning plugin name.
    #[inline]
    #[must_use]
    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    /// Returns the resolved members, in declaration order.
    #[inline]
    #[must_use]
    pub fn members(&self) -> &[ResolvedMember<'a>] {
        &self.members
    }

    /// Returns the kind of the named member.
    #[must_use]
    pub fn member_kind(&self, name: &str) -> Option<ParameterKind> {
        self.members
            .iter()
            .find(|m| m.member.name == name)
            .map(|m| m.kind)
    }

    /// Returns the pixel type resolution.
    #[inline]
    #[must_use]
    pub fn pixel(&self) -> &PixelResolution {
        &self.pixel
    }

    /// Returns the image inputs beyond the primary one.
    #[must_use]
    pub fn extra_inputs(&self) -> &'a [InputDescriptor] {
        self.descriptor.inputs.get(1..).unwrap_or_default()
    }

    /// Returns the `namespace` that holds the functor and type aliases.
    #[must_use]
    pub fn detail_namespace(&self) -> String {
        format!("cx{}", self.class_name())
    }

    /// Returns the deduplicated, sorted include statements.
    #[must_use]
    pub fn includes(&self) -> Vec<&'static str> {
        let mut includes: BTreeSet<&'static str> = self
            .members
            .iter()
            .filter_map(|m| m.kind.include_statement())
            .collect();
        if !self.extra_inputs().is_empty() {
            includes.insert(ARRAY_SELECTION_INCLUDE);
        }
        includes.into_iter().collect()
    }

    fn active_members(&self) -> impl Iterator<Item = &ResolvedMember<'a>> {
        self.members.iter().filter(|m| !m.kind.is_noop())
    }

    fn parameter_keys(&self) -> String {
        let members = self.active_members().map(|m| (&m.member.name, false));
        let inputs = self.extra_inputs().iter().map(|i| (&i.name, true));
        members
            .chain(inputs)
            .map(|(name, is_image)| {
                format!(
                    "{BODY_INDENT}static inline constexpr StringLiteral {} = \"{}\";",
                    generate_key_var(name, is_image),
                    generate_key_name(name, is_image)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn parameter_defs(&self) -> String {
        let mut defs: Vec<String> = self
            .members
            .iter()
            .filter_map(|m| m.kind.parameter_declaration(m.member))
            .collect();
        defs.extend(self.extra_inputs().iter().map(|input| {
            format!(
                "params.insert(std::make_unique<ArraySelectionParameter>({}, \"{}\", \"The {} input image\", DataPath{{}}, {}));",
                generate_key_var(&input.name, true),
                human_name(&input.name),
                input.name,
                self.pixel.allowed_types
            )
        }));
        if defs.is_empty() {
            return String::new();
        }
        std::iter::once(PARAMETER_SEPARATOR.to_owned())
            .chain(defs)
            .map(|line| format!("{BODY_INDENT}{line}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn bindings(&self) -> String {
        let members = self
            .members
            .iter()
            .filter_map(|m| m.kind.preflight_binding(m.member));
        let inputs = self.extra_inputs().iter().map(|input| {
            format!(
                "auto {}Path = filterArgs.value<DataPath>({});",
                local_var(&input.name),
                generate_key_var(&input.name, true)
            )
        });
        members
            .chain(inputs)
            .map(|line| format!("{BODY_INDENT}{line}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn execute_type_args(&self) -> String {
        let ns = self.detail_namespace();
        if self.descriptor.has_output_pixel_type() {
            format!("{ns}::ArrayOptionsType, {ns}::FilterOutputType")
        } else {
            format!("{ns}::ArrayOptionsType")
        }
    }

    fn filter_struct(&self) -> String {
        let class = self.class_name();
        let ns = self.detail_namespace();
        let mut out = format!("namespace {ns}\n{{\n");
        out.push_str(&format!(
            "using ArrayOptionsType = {};\n",
            self.pixel.array_options
        ));
        if let Some(output) = output_type(self.descriptor) {
            out.push_str(&format!("using FilterOutputType = {output};\n"));
        }
        out.push_str(&format!("\nstruct {class}Functor\n{{\n"));

        let fields: Vec<String> = self
            .members
            .iter()
            .filter_map(|m| m.kind.functor_member(m.member))
            .collect();
        for field in &fields {
            out.push_str(&format!("  {field}\n"));
        }
        if !fields.is_empty() {
            out.push('\n');
        }

        out.push_str("  template <class InputImageT, class OutputImageT, uint32 Dimension>\n");
        out.push_str("  auto createFilter() const\n  {\n");
        if self.descriptor.filter_type.trim().is_empty() {
            out.push_str(&format!(
                "    using FilterT = itk::{}<InputImageT, OutputImageT>;\n",
                self.descriptor.name
            ));
        } else {
            out.push_str(&format!(
                "    using FilterT = {};\n",
                self.descriptor.filter_type.trim()
            ));
        }
        out.push_str("    auto filter = FilterT::New();\n");
        for setter in self
            .members
            .iter()
            .filter_map(|m| m.kind.functor_setter(m.member))
        {
            for line in setter.lines() {
                out.push_str(&format!("    {line}\n"));
            }
        }
        out.push_str("    return filter;\n  }\n};\n");
        out.push_str(&format!("}} // namespace {ns}"));
        out
    }

    fn functor_inst(&self) -> String {
        let vars: Vec<String> = self
            .active_members()
            .map(|m| local_var(&m.member.name))
            .collect();
        format!(
            "const {}::{}Functor itkFunctor = {{{}}};",
            self.detail_namespace(),
            self.class_name(),
            vars.join(", ")
        )
    }

    fn default_tags(&self) -> String {
        let d = self.descriptor;
        let class = self.class_name();
        let mut tags: Vec<String> = Vec::new();
        for tag in [
            self.plugin.as_str(),
            class.as_str(),
            d.itk_module.as_str(),
            d.itk_group.as_str(),
        ] {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_owned());
            }
        }
        tags.iter()
            .map(|t| format!("\"{t}\""))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Builds the values for every template key.
    #[must_use]
    pub fn substitutions(&self) -> Substitutions {
        let d = self.descriptor;
        let ns = self.detail_namespace();
        let type_args = self.execute_type_args();
        let bindings = self.bindings();

        let mut values = Substitutions::default();
        values.insert("FILTER_NAME", self.class_name());
        values.insert("FILTER_UUID", self.uuid.as_str().to_owned());
        values.insert("BRIEF_DESCRIPTION", cpp_string(&d.brief_description));
        values.insert("HUMAN_NAME", format!("ITK {}", human_name(&d.name)));
        values.insert("DEFAULT_TAGS", self.default_tags());
        values.insert("ITK_MODULE", d.itk_module.clone());
        values.insert("PARAMETER_KEYS", self.parameter_keys());
        values.insert("PARAMETER_INCLUDES", self.includes().join("\n"));
        values.insert("PARAMETER_DEFS", self.parameter_defs());
        values.insert("ITK_FILTER_STRUCT", self.filter_struct());
        values.insert("ALLOWED_TYPES", self.pixel.allowed_types.clone());
        values.insert("PREFLIGHT_DEFS", bindings.clone());
        values.insert("EXECUTE_DEFS", bindings);
        values.insert("FUNCTOR_INST", self.functor_inst());
        values.insert(
            "DATA_CHECK_DECL",
            format!(
                "Result<OutputActions> resultOutputActions = ITK::DataCheck<{type_args}>(dataStructure, selectedInputArray, imageGeomPath, outputArrayPath);"
            ),
        );
        values.insert(
            "ITK_FILTER_EXECUTE",
            format!(
                "return ITK::Execute<{type_args}>(dataStructure, selectedInputArray, imageGeomPath, outputArrayPath, itkFunctor, shouldCancel);"
            ),
        );
        debug!(filter = %d.name, namespace = %ns, keys = values.len(), "Built substitutions");
        values
    }

    /// Renders the header template.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::Template`] if the template references an unknown key.
    pub fn emit_header(&self, template: &Template) -> Result<Emitted, EmitError> {
        self.render(template)
    }

    /// Renders the source template.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::Template`] if the template references an unknown key.
    pub fn emit_source(&self, template: &Template) -> Result<Emitted, EmitError> {
        self.render(template)
    }

    fn render(&self, template: &Template) -> Result<Emitted, EmitError> {
        let text = template.render(&self.substitutions())?;
        Ok(self.with_pixel_warning(text))
    }

    /// Wraps text, attaching the pixel warning if the placeholder made it in.
    pub(crate) fn with_pixel_warning(&self, text: String) -> Emitted {
        let mut emitted = Emitted::clean(text);
        if let Some(warning) = &self.pixel.warning {
            if emitted.text.contains(UNKNOWN_PIXEL_TYPE) {
                emitted.warnings.push(warning.clone());
            }
        }
        emitted
    }
}
