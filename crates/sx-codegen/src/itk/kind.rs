//! Parameter kinds of ITK filter members.
//!
//! Every member of an ITK filter descriptor resolves to exactly one
//! [`ParameterKind`]. The kind decides every C++ fragment generated for the
//! member:
//!
//! | Operation | Where it lands |
//! |-----------|----------------|
//! | [`include_statement`](ParameterKind::include_statement) | `PARAMETER_INCLUDES` |
//! | [`parameter_declaration`](ParameterKind::parameter_declaration) | `PARAMETER_DEFS` |
//! | [`preflight_binding`](ParameterKind::preflight_binding) | `PREFLIGHT_DEFS`, `EXECUTE_DEFS` |
//! | [`functor_member`](ParameterKind::functor_member) | functor struct fields |
//! | [`functor_setter`](ParameterKind::functor_setter) | functor `createFilter()` body |
//! | [`test_literal`](ParameterKind::test_literal) | `args.insertOrAssign(...)` in tests |
//!
//! # Dispatch
//!
//! 1. A member named `KernelRadius` or `KernelType` always gets the kernel
//!    kinds; the two are coupled in the functor.
//! 2. Otherwise a non-empty `itk_type` tag decides.
//! 3. Otherwise the general `type` tag decides.

use serde_json::Value;
use sx_core::{value_to_string, MemberDescriptor};

use crate::error::EmitError;
use crate::naming::{generate_key_var, human_name, local_var};

/// Member name that always resolves to [`ParameterKind::KernelRadius`].
pub const KERNEL_RADIUS: &str = "KernelRadius";

/// Member name that always resolves to [`ParameterKind::KernelType`].
pub const KERNEL_TYPE: &str = "KernelType";

/// Structuring element shapes, in choice-index order.
pub const KERNEL_CHOICES: [&str; 4] = ["Annulus", "Ball", "Box", "Cross"];

/// Choice index used when a kernel default names no known shape (`Ball`).
const DEFAULT_KERNEL_INDEX: usize = 1;

/// A fixed-width numeric C++ type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericType {
    /// `int8`
    Int8,
    /// `uint8`
    UInt8,
    /// `int16`
    Int16,
    /// `uint16`
    UInt16,
    /// `int32`
    Int32,
    /// `uint32`
    UInt32,
    /// `int64`
    Int64,
    /// `uint64`
    UInt64,
    /// `float32`
    Float32,
    /// `float64`
    Float64,
}

impl NumericType {
    /// Parses a C++ spelling such as `uint32_t`, `unsigned int` or `double`.
    #[must_use]
    pub fn from_cpp(tag: &str) -> Option<Self> {
        let ty = match tag.trim() {
            "int8_t" | "int8" | "signed char" => Self::Int8,
            "uint8_t" | "uint8" | "unsigned char" => Self::UInt8,
            "int16_t" | "int16" | "short" => Self::Int16,
            "uint16_t" | "uint16" | "unsigned short" => Self::UInt16,
            "int32_t" | "int32" | "int" => Self::Int32,
            "uint32_t" | "uint32" | "unsigned int" | "unsigned" => Self::UInt32,
            "int64_t" | "int64" | "long" | "long long" => Self::Int64,
            "uint64_t" | "uint64" | "unsigned long" | "unsigned long long" | "size_t" => {
                Self::UInt64
            }
            "float" | "float32" => Self::Float32,
            "double" | "float64" => Self::Float64,
            _ => return None,
        };
        Some(ty)
    }

    /// Returns the capitalized name used in parameter class names.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int8 => "Int8",
            Self::UInt8 => "UInt8",
            Self::Int16 => "Int16",
            Self::UInt16 => "UInt16",
            Self::Int32 => "Int32",
            Self::UInt32 => "UInt32",
            Self::Int64 => "Int64",
            Self::UInt64 => "UInt64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
        }
    }

    /// Returns the framework's alias for the type.
    #[inline]
    #[must_use]
    pub const fn value_type(self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::UInt8 => "uint8",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }

    /// Returns `true` for the floating-point types.
    #[inline]
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Returns the literal used when no default is given.
    #[inline]
    #[must_use]
    pub const fn zero(self) -> &'static str {
        if self.is_float() { "0.0" } else { "0" }
    }

    /// Returns the scalar parameter class, e.g. `Float64Parameter`.
    #[must_use]
    pub fn number_parameter(self) -> String {
        format!("{}Parameter", self.name())
    }

    /// Returns the vector parameter class, e.g. `VectorFloat64Parameter`.
    #[must_use]
    pub fn vector_parameter(self) -> String {
        format!("Vector{}Parameter", self.name())
    }
}

/// How one ITK filter member is exposed as a complex parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// A boolean flag.
    Bool,
    /// A scalar number.
    Numeric(NumericType),
    /// Kernel radius, a 3-vector consumed by the kernel setter.
    KernelRadius,
    /// Kernel shape, a choice among [`KERNEL_CHOICES`].
    KernelType,
    /// `FilterType::RadiusType`, a 3-vector cast through a local alias.
    RadiusType,
    /// A numeric array passed to ITK by pointer.
    ArrayType(NumericType),
    /// A string value.
    StringValue,
    /// Pixel ID enum; no generated parameter.
    PixelIdValue,
    /// Noise model enum; no generated parameter.
    NoiseModel,
}

impl ParameterKind {
    /// Resolves a member's kind.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::UnsupportedType`] if the deciding tag maps to no kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use sx_codegen::itk::ParameterKind;
    /// use sx_core::MemberDescriptor;
    ///
    /// let member: MemberDescriptor = serde_json::from_str(
    ///     r#"{"name": "KernelRadius", "type": "double", "itk_type": "typename FilterType::RadiusType"}"#,
    /// )?;
    /// let kind = ParameterKind::resolve("GrayscaleDilateImageFilter", &member)?;
    /// assert_eq!(kind, ParameterKind::KernelRadius);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn resolve(filter: &str, member: &MemberDescriptor) -> Result<Self, EmitError> {
        match member.name.as_str() {
            KERNEL_RADIUS => return Ok(Self::KernelRadius),
            KERNEL_TYPE => return Ok(Self::KernelType),
            _ => {}
        }

        let tag = if member.itk_type.trim().is_empty() {
            &member.member_type
        } else {
            &member.itk_type
        };
        Self::from_tag(tag).ok_or_else(|| EmitError::UnsupportedType {
            filter: filter.to_owned(),
            member: member.name.clone(),
            type_name: tag.clone(),
        })
    }

    /// Maps a C++ or ITK type tag to a kind.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        let kind = match tag {
            "bool" => Self::Bool,
            "std::string" => Self::StringValue,
            "typename FilterType::RadiusType" | "RadiusType" => Self::RadiusType,
            "typename FilterType::ArrayType" | "ArrayType" => Self::ArrayType(NumericType::Float64),
            "KernelEnum" | "itk::simple::KernelEnum" => Self::KernelType,
            "PixelIDValueEnum" | "PixelIDValueType" | "itk::simple::PixelIDValueEnum" => {
                Self::PixelIdValue
            }
            _ if tag.contains("NoiseModel") => Self::NoiseModel,
            _ => {
                if let Some(inner) = tag
                    .strip_prefix("std::vector<")
                    .and_then(|t| t.strip_suffix('>'))
                {
                    return NumericType::from_cpp(inner).map(Self::ArrayType);
                }
                return NumericType::from_cpp(tag).map(Self::Numeric);
            }
        };
        Some(kind)
    }

    /// Returns `true` for kinds that generate no parameter at all.
    #[inline]
    #[must_use]
    pub const fn is_noop(self) -> bool {
        matches!(self, Self::PixelIdValue | Self::NoiseModel)
    }

    /// Returns the include that declares the parameter class.
    #[must_use]
    pub const fn include_statement(self) -> Option<&'static str> {
        match self {
            Self::Bool => Some("#include \"complex/Parameters/BoolParameter.hpp\""),
            Self::Numeric(_) => Some("#include \"complex/Parameters/NumberParameter.hpp\""),
            Self::KernelRadius | Self::RadiusType | Self::ArrayType(_) => {
                Some("#include \"complex/Parameters/VectorParameter.hpp\"")
            }
            Self::KernelType => Some("#include \"complex/Parameters/ChoicesParameter.hpp\""),
            Self::StringValue => Some("#include \"complex/Parameters/StringParameter.hpp\""),
            Self::PixelIdValue | Self::NoiseModel => None,
        }
    }

    /// Returns the C++ type a bound parameter value has.
    #[must_use]
    pub fn value_type(self) -> Option<String> {
        let ty = match self {
            Self::Bool => "bool".to_owned(),
            Self::Numeric(t) => t.value_type().to_owned(),
            Self::KernelRadius | Self::RadiusType => "VectorUInt32Parameter::ValueType".to_owned(),
            Self::ArrayType(t) => format!("{}::ValueType", t.vector_parameter()),
            Self::KernelType => "ChoicesParameter::ValueType".to_owned(),
            Self::StringValue => "StringParameter::ValueType".to_owned(),
            Self::PixelIdValue | Self::NoiseModel => return None,
        };
        Some(ty)
    }

    /// Returns the `params.insert(...)` statement.
    #[must_use]
    pub fn parameter_declaration(self, member: &MemberDescriptor) -> Option<String> {
        let key = generate_key_var(&member.name, false);
        let label = human_name(&member.name);
        let desc = cpp_string(&member.brief_description);

        let decl = match self {
            Self::Bool => format!(
                "params.insert(std::make_unique<BoolParameter>({key}, \"{label}\", \"{desc}\", {}));",
                bool_literal(&member.default)
            ),
            Self::Numeric(t) => format!(
                "params.insert(std::make_unique<{}>({key}, \"{label}\", \"{desc}\", {}));",
                t.number_parameter(),
                scalar_literal(&member.default, t)
            ),
            Self::KernelRadius | Self::RadiusType => format!(
                "params.insert(std::make_unique<VectorUInt32Parameter>({key}, \"{label}\", \"{desc}\", std::vector<uint32>{{{}}}, std::vector<std::string>{{\"X\", \"Y\", \"Z\"}}));",
                vec3(&member.default, "1")
            ),
            Self::ArrayType(t) => format!(
                "params.insert(std::make_unique<{}>({key}, \"{label}\", \"{desc}\", std::vector<{}>{{{}}}, std::vector<std::string>{{\"X\", \"Y\", \"Z\"}}));",
                t.vector_parameter(),
                t.value_type(),
                vec3(&member.default, t.zero())
            ),
            Self::KernelType => format!(
                "params.insert(std::make_unique<ChoicesParameter>({key}, \"{label}\", \"{desc}\", {}, ChoicesParameter::Choices{{{}}}));",
                kernel_index(&member.default),
                KERNEL_CHOICES
                    .iter()
                    .map(|c| format!("\"{c}\""))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Self::StringValue => format!(
                "params.insert(std::make_unique<StringParameter>({key}, \"{label}\", \"{desc}\", {}));",
                string_literal(&member.default)
            ),
            Self::PixelIdValue | Self::NoiseModel => return None,
        };
        Some(decl)
    }

    /// Returns the statement that reads the parameter in preflight/execute.
    #[must_use]
    pub fn preflight_binding(self, member: &MemberDescriptor) -> Option<String> {
        let key = generate_key_var(&member.name, false);
        let var = local_var(&member.name);
        let value_type = self.value_type()?;

        let binding = if self == Self::KernelType {
            format!(
                "auto {var} = static_cast<itk::simple::KernelEnum>(filterArgs.value<{value_type}>({key}));"
            )
        } else {
            format!("auto {var} = filterArgs.value<{value_type}>({key});")
        };
        Some(binding)
    }

    /// Returns the functor field declaration, with its default.
    #[must_use]
    pub fn functor_member(self, member: &MemberDescriptor) -> Option<String> {
        let var = local_var(&member.name);
        let field = match self {
            Self::Bool => format!("bool {var} = {};", bool_literal(&member.default)),
            Self::Numeric(t) => format!(
                "{} {var} = {};",
                t.value_type(),
                scalar_literal(&member.default, t)
            ),
            Self::KernelRadius | Self::RadiusType => {
                format!("std::vector<uint32> {var} = {{{}}};", vec3(&member.default, "1"))
            }
            Self::ArrayType(t) => format!(
                "std::vector<{}> {var} = {{{}}};",
                t.value_type(),
                vec3(&member.default, t.zero())
            ),
            Self::KernelType => format!(
                "itk::simple::KernelEnum {var} = itk::simple::sitk{};",
                KERNEL_CHOICES[kernel_index(&member.default)]
            ),
            Self::StringValue => {
                format!("std::string {var} = {};", string_literal(&member.default))
            }
            Self::PixelIdValue | Self::NoiseModel => return None,
        };
        Some(field)
    }

    /// Returns the statements that push the value into the ITK filter.
    ///
    /// `KernelRadius` has no setter of its own: the `KernelType` setter
    /// builds the structuring element from both.
    #[must_use]
    pub fn functor_setter(self, member: &MemberDescriptor) -> Option<String> {
        let name = &member.name;
        let var = local_var(name);
        let setter = match self {
            Self::Bool | Self::Numeric(_) | Self::StringValue => {
                format!("filter->Set{name}({var});")
            }
            Self::KernelType => format!(
                "auto kernel = ITK::CreateKernel<Dimension>({var}, {});\nfilter->SetKernel(kernel);",
                local_var(KERNEL_RADIUS)
            ),
            Self::RadiusType => format!(
                "using RadiusType = typename FilterT::RadiusType;\nauto converted{name} = ITK::CastVec3ToITK<RadiusType, typename RadiusType::SizeValueType>({var}, RadiusType::Dimension);\nfilter->Set{name}(converted{name});"
            ),
            Self::ArrayType(_) => format!("filter->Set{name}({var}.data());"),
            Self::KernelRadius | Self::PixelIdValue | Self::NoiseModel => return None,
        };
        Some(setter)
    }

    /// Returns the `std::make_any` expression for a test setting value.
    #[must_use]
    pub fn test_literal(self, value: &Value) -> Option<String> {
        let raw = value_to_string(value);
        let literal = match self {
            Self::Bool => format!("std::make_any<bool>({})", bool_literal(&raw)),
            Self::Numeric(t) => format!(
                "std::make_any<{}>({})",
                t.value_type(),
                scalar_literal(&raw, t)
            ),
            Self::KernelRadius | Self::RadiusType | Self::ArrayType(_) => {
                let fallback = match self {
                    Self::ArrayType(t) => t.zero(),
                    _ => "1",
                };
                let value_type = self.value_type()?;
                format!(
                    "std::make_any<{value_type}>({value_type}{{{}}})",
                    vec3(&raw, fallback)
                )
            }
            Self::KernelType => format!(
                "std::make_any<ChoicesParameter::ValueType>({})",
                kernel_index(&raw)
            ),
            Self::StringValue => format!(
                "std::make_any<StringParameter::ValueType>({})",
                string_literal(&raw)
            ),
            Self::PixelIdValue | Self::NoiseModel => return None,
        };
        Some(literal)
    }
}

/// Escapes text for a C++ string literal body, folding newlines to spaces.
#[must_use]
pub fn cpp_string(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
}

fn bool_literal(raw: &str) -> &'static str {
    match raw.trim() {
        "true" | "1" | "True" => "true",
        _ => "false",
    }
}

fn scalar_literal(raw: &str, ty: NumericType) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        ty.zero().to_owned()
    } else {
        raw.to_owned()
    }
}

fn string_literal(raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with('"') && raw.ends_with('"') && raw.len() >= 2 {
        raw.to_owned()
    } else {
        format!("\"{}\"", cpp_string(raw))
    }
}

/// Splits a vector default into its elements.
///
/// Accepts `1, 2, 3`, `{1, 2, 3}` and `std::vector<T>(N, V)`. The fill
/// form never yields more than three elements.
fn vector_elements(raw: &str) -> Vec<String> {
    let raw = raw.trim();

    if let Some(args) = raw
        .strip_prefix("std::vector<")
        .and_then(|rest| rest.split_once(">("))
        .and_then(|(_, args)| args.strip_suffix(')'))
    {
        if let Some((count, value)) = args.split_once(',') {
            if let Ok(count) = count.trim().parse::<usize>() {
                return vec![value.trim().to_owned(); count.min(3)];
            }
        }
    }

    raw.trim_start_matches('{')
        .trim_end_matches('}')
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Renders exactly three comma-separated elements, padding with the last
/// element (or `fallback` when there is none).
fn vec3(raw: &str, fallback: &str) -> String {
    let mut elements = vector_elements(raw);
    elements.truncate(3);
    let pad = elements
        .last()
        .cloned()
        .unwrap_or_else(|| fallback.to_owned());
    elements.resize(3, pad);
    elements.join(", ")
}

fn kernel_index(raw: &str) -> usize {
    let raw = raw.trim();
    if let Ok(index) = raw.parse::<usize>() {
        if index < KERNEL_CHOICES.len() {
            return index;
        }
    }
    KERNEL_CHOICES
        .iter()
        .position(|c| raw.ends_with(c))
        .unwrap_or(DEFAULT_KERNEL_INDEX)
}
