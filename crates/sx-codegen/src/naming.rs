//! Identifier and key naming shared by the emitters.
//!
//! Every function here is a pure function of its arguments.

use heck::{ToLowerCamelCase, ToSnakeCase, ToTitleCase};

/// Returns the string value of an ITK parameter key.
///
/// Image keys get a `_path` suffix.
///
/// # Examples
///
/// ```
/// use sx_codegen::generate_key_name;
///
/// assert_eq!(generate_key_name("KernelRadius", false), "kernel_radius");
/// assert_eq!(generate_key_name("Image2", true), "image2_path");
/// ```
#[must_use]
pub fn generate_key_name(name: &str, is_image: bool) -> String {
    let snake = name.to_snake_case();
    if is_image {
        format!("{snake}_path")
    } else {
        snake
    }
}

/// Returns the C++ constant name of an ITK parameter key.
///
/// # Examples
///
/// ```
/// use sx_codegen::generate_key_var;
///
/// assert_eq!(generate_key_var("KernelRadius", false), "k_KernelRadius_Key");
/// assert_eq!(generate_key_var("Image2", true), "k_Image2Path_Key");
/// ```
#[must_use]
pub fn generate_key_var(name: &str, is_image: bool) -> String {
    if is_image {
        format!("k_{name}Path_Key")
    } else {
        format!("k_{name}_Key")
    }
}

/// Returns the local variable that holds a member's value in generated code.
#[must_use]
pub fn local_var(name: &str) -> String {
    name.to_lower_camel_case()
}

/// Splits a CamelCase identifier into words for display.
///
/// `"MedianImageFilter"` becomes `"Median Image Filter"`.
#[must_use]
pub fn human_name(name: &str) -> String {
    name.to_title_case()
}

/// Strips everything but ASCII alphanumerics and `_` from a legacy name.
///
/// SIMPL parameter names are usually already identifiers; this keeps the
/// generated constant valid when one is not.
#[must_use]
pub fn identifier_fragment(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Returns the C++ constant name of a converted SIMPL parameter key.
///
/// # Examples
///
/// ```
/// use sx_codegen::simpl_key_var;
///
/// assert_eq!(simpl_key_var("Bar"), "k_BarKey");
/// assert_eq!(simpl_key_var("Use Mask"), "k_UseMaskKey");
/// ```
#[must_use]
pub fn simpl_key_var(name: &str) -> String {
    format!("k_{}Key", identifier_fragment(name))
}

/// Returns the string value of a converted SIMPL parameter key.
#[must_use]
pub fn simpl_key_name(name: &str) -> String {
    identifier_fragment(name).to_snake_case()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_naming_is_pure() {
        for (name, is_image) in [("KernelRadius", false), ("Image2", true), ("Sigma", false)] {
            assert_eq!(
                generate_key_name(name, is_image),
                generate_key_name(name, is_image)
            );
            assert_eq!(
                generate_key_var(name, is_image),
                generate_key_var(name, is_image)
            );
        }
    }

    #[test]
    fn test_generate_key_name() {
        assert_eq!(generate_key_name("NumberOfIterations", false), "number_of_iterations");
        assert_eq!(generate_key_name("Sigma", false), "sigma");
        assert_eq!(generate_key_name("Mask", true), "mask_path");
    }

    #[test]
    fn test_local_and_human_names() {
        assert_eq!(local_var("KernelRadius"), "kernelRadius");
        assert_eq!(local_var("Sigma"), "sigma");
        assert_eq!(human_name("MedianImageFilter"), "Median Image Filter");
    }

    #[test]
    fn test_simpl_keys() {
        assert_eq!(simpl_key_var("Bar"), "k_BarKey");
        assert_eq!(simpl_key_name("Bar"), "bar");
        assert_eq!(simpl_key_name("UseMask"), "use_mask");
        assert_eq!(identifier_fragment("Cell Attribute-Matrix"), "CellAttributeMatrix");
    }
}
