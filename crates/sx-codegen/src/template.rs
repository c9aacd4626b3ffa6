//! `$NAME` string templates.
//!
//! | Syntax | Meaning |
//! |--------|---------|
//! | `$NAME` | value of `NAME` |
//! | `${NAME}` | value of `NAME`, for use next to identifier characters |
//! | `$$` | a literal `$` |
//!
//! A `$` followed by anything else is copied through unchanged. Keys that
//! the template references but the caller did not supply are an error; keys
//! the caller supplies but the template never uses are ignored.

use std::fs;
use std::sync::OnceLock;

use camino::Utf8Path;
use regex::Regex;
use sx_core::FxHashMap;

use crate::error::TemplateError;

const PLACEHOLDER_PATTERN: &str =
    r"\$(?:(?P<escaped>\$)|\{(?P<braced>[_A-Za-z][_A-Za-z0-9]*)\}|(?P<named>[_A-Za-z][_A-Za-z0-9]*))";

/// Global cache for the compiled placeholder pattern.
static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();

/// Returns the compiled placeholder pattern, compiling it on first use.
fn placeholder() -> Result<&'static Regex, TemplateError> {
    if let Some(regex) = PLACEHOLDER.get() {
        return Ok(regex);
    }
    let regex = Regex::new(PLACEHOLDER_PATTERN)?;
    Ok(PLACEHOLDER.get_or_init(|| regex))
}

/// Substitution values keyed by placeholder name.
pub type Substitutions = FxHashMap<&'static str, String>;

/// A loaded template.
///
/// # Examples
///
/// ```
/// use sx_codegen::{Substitutions, Template};
///
/// let template = Template::new("greeting", "class $NAME { int ${NAME}Count; }; // $$1");
/// let mut values = Substitutions::default();
/// values.insert("NAME", "Foo".to_owned());
///
/// assert_eq!(template.render(&values)?, "class Foo { int FooCount; }; // $1");
/// # Ok::<(), sx_codegen::TemplateError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    text: String,
}

impl Template {
    /// Creates a template from text.
    #[must_use]
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Reads a template file; the file name becomes the template name.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Read`] if the file cannot be read.
    pub fn read(path: &Utf8Path) -> Result<Self, TemplateError> {
        let text = fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_owned(),
            source,
        })?;
        let name = path.file_name().unwrap_or(path.as_str());
        Ok(Self::new(name, text))
    }

    /// Returns the template name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the placeholder names the template references, in order of
    /// first appearance.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Pattern`] if the placeholder pattern fails to compile.
    pub fn keys(&self) -> Result<Vec<&str>, TemplateError> {
        let mut keys: Vec<&str> = Vec::new();
        for caps in placeholder()?.captures_iter(&self.text) {
            if let Some(key) = caps.name("braced").or_else(|| caps.name("named")) {
                if !keys.contains(&key.as_str()) {
                    keys.push(key.as_str());
                }
            }
        }
        Ok(keys)
    }

    /// Substitutes every placeholder.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingKey`] for the first referenced key
    /// absent from `values`.
    pub fn render(&self, values: &Substitutions) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.text.len());
        let mut last = 0;

        for caps in placeholder()?.captures_iter(&self.text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            out.push_str(&self.text[last..whole.start()]);
            last = whole.end();

            if caps.name("escaped").is_some() {
                out.push('$');
                continue;
            }
            let Some(key) = caps.name("braced").or_else(|| caps.name("named")) else {
                continue;
            };
            let value = values
                .get(key.as_str())
                .ok_or_else(|| TemplateError::MissingKey {
                    template: self.name.clone(),
                    key: key.as_str().to_owned(),
                })?;
            out.push_str(value);
        }

        out.push_str(&self.text[last..]);
        Ok(out)
    }
}
