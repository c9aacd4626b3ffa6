//! In-memory line model of a C++ source file.
//!
//! A [`SourceFile`] is read once, classified into [`LineShape`]s, mutated by
//! patch operations, and written back whole to the path it came from. Each
//! line keeps its own terminator (LF or CRLF) and the presence of a final
//! newline is kept as found, so untouched lines round-trip byte for byte,
//! even in files that mix terminators. Inserted lines take the terminator
//! of the file's first line.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use sx_core::LegacyUuid;

use crate::error::PatchError;
use crate::line::{LineClassifier, LineShape, EMPTY_CONVERTER};

/// One classified line of a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// Line text without its terminator.
    pub text: String,
    /// Recognized shape of the line.
    pub shape: LineShape,
    /// Terminator written after the line.
    pub ending: LineEnding,
}

/// Line terminator style of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    /// Returns the terminator as a string.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// A source file held as classified lines.
///
/// # Examples
///
/// ```
/// use sx_cpp_parser::{LineClassifier, SourceFile};
///
/// let classifier = LineClassifier::new("complex")?;
/// let file = SourceFile::parse(
///     "Foo.cpp",
///     "#include \"Foo.hpp\"\n#include <vector>\n\nint x;\n",
///     &classifier,
/// );
/// assert_eq!(file.find_last_include(), Some(1));
/// assert_eq!(file.find_last_parameter_key(), None);
/// # Ok::<(), regex::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: Utf8PathBuf,
    lines: Vec<SourceLine>,
    line_ending: LineEnding,
    trailing_newline: bool,
}

impl SourceFile {
    /// Reads and classifies a file.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::Read`] if the file cannot be read as UTF-8.
    pub fn read(path: &Utf8Path, classifier: &LineClassifier) -> Result<Self, PatchError> {
        let contents = fs::read_to_string(path).map_err(|e| PatchError::read(path, e))?;
        Ok(Self::parse(path, &contents, classifier))
    }

    /// Classifies already-loaded contents.
    #[must_use]
    pub fn parse(
        path: impl Into<Utf8PathBuf>,
        contents: &str,
        classifier: &LineClassifier,
    ) -> Self {
        let mut lines = Vec::new();
        for piece in contents.split_inclusive('\n') {
            let (text, ending) = match piece.strip_suffix('\n') {
                Some(rest) => match rest.strip_suffix('\r') {
                    Some(text) => (text, Some(LineEnding::CrLf)),
                    None => (rest, Some(LineEnding::Lf)),
                },
                None => (piece, None),
            };
            lines.push((text, ending));
        }
        let line_ending = lines
            .iter()
            .find_map(|(_, ending)| *ending)
            .unwrap_or_default();
        let lines = lines
            .into_iter()
            .map(|(text, ending)| SourceLine {
                text: text.to_owned(),
                shape: classifier.classify(text),
                ending: ending.unwrap_or(line_ending),
            })
            .collect();

        Self {
            path: path.into(),
            lines,
            line_ending,
            trailing_newline: contents.ends_with('\n'),
        }
    }

    /// Returns the path the file was read from.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Returns the classified lines.
    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[SourceLine] {
        &self.lines
    }

    /// Returns the number of lines.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if the file has no lines.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the index of the last `#include` line.
    #[must_use]
    pub fn find_last_include(&self) -> Option<usize> {
        self.lines.iter().rposition(|l| l.shape.is_include())
    }

    /// Returns the index of the last parameter key declaration.
    #[must_use]
    pub fn find_last_parameter_key(&self) -> Option<usize> {
        self.lines.iter().rposition(|l| l.shape.is_parameter_key())
    }

    /// Returns the index of the first line mentioning `uuid`, ignoring case.
    #[must_use]
    pub fn find_uuid_line(&self, uuid: &LegacyUuid) -> Option<usize> {
        self.lines
            .iter()
            .position(|l| l.text.to_ascii_lowercase().contains(uuid.as_str()))
    }

    /// Inserts `block` so that its first line lands at `index`.
    ///
    /// The line previously at `index` (and everything after it) moves down.
    pub fn insert_block(&mut self, index: usize, block: &str, classifier: &LineClassifier) {
        let index = index.min(self.lines.len());
        let ending = self.line_ending;
        let new_lines = block.lines().map(|text| SourceLine {
            text: text.to_owned(),
            shape: classifier.classify(text),
            ending,
        });
        self.lines.splice(index..index, new_lines);
    }

    /// Appends `block` after the last line.
    pub fn append_block(&mut self, block: &str, classifier: &LineClassifier) {
        self.insert_block(self.lines.len(), block, classifier);
        self.trailing_newline = true;
    }

    /// Replaces the last `{}` on line `index` with `replacement`.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::PlaceholderMissing`] if the line has no `{}`.
    pub fn replace_placeholder(
        &mut self,
        index: usize,
        replacement: &str,
        classifier: &LineClassifier,
    ) -> Result<(), PatchError> {
        let missing = || PatchError::PlaceholderMissing {
            path: self.path.clone(),
            line: index + 1,
        };
        let line = self.lines.get(index).ok_or_else(missing)?;
        let at = line.text.rfind(EMPTY_CONVERTER).ok_or_else(missing)?;

        let mut text = line.text.clone();
        text.replace_range(at..at + EMPTY_CONVERTER.len(), replacement);
        let shape = classifier.classify(&text);
        let ending = line.ending;
        self.lines[index] = SourceLine { text, shape, ending };
        Ok(())
    }

    /// Renders the file back to text with each line's terminator.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let last = self.lines.len().saturating_sub(1);
        for (i, line) in self.lines.iter().enumerate() {
            out.push_str(&line.text);
            if i < last || self.trailing_newline {
                out.push_str(line.ending.as_str());
            }
        }
        out
    }

    /// Overwrites the file on disk with the current contents.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::Write`] if the file cannot be written.
    pub fn write(&self) -> Result<(), PatchError> {
        fs::write(&self.path, self.to_text()).map_err(|e| PatchError::write(&self.path, e))
    }
}
