//! Multi-file patch plans with a validate-then-write commit.
//!
//! Patching happens in two phases:
//!
//! 1. [`PatchSet::plan`] reads every target file, resolves every anchor and
//!    applies every operation in memory. Any missing anchor or placeholder
//!    aborts the plan with nothing written.
//! 2. [`PlannedPatchSet::commit`] writes the patched files back in the order
//!    they were added.
//!
//! Only planning is all-or-nothing. A write failure during commit stops at
//! the failing file; files written before it keep their new contents.
//!
//! ```text
//! PatchSet ──plan()──> PlannedPatchSet ──commit()──> files on disk
//!    │                      │
//!    └─ FilePatch[]         └─ SourceFile[] (patched, unwritten)
//! ```

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use sx_core::LegacyUuid;
use tracing::debug;

use crate::error::PatchError;
use crate::line::LineClassifier;
use crate::source::SourceFile;

/// A rule that selects the line a patch operation is anchored on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// The last `#include` line.
    LastInclude,
    /// The last parameter key declaration.
    LastParameterKey,
    /// The first line mentioning a UUID.
    Uuid(LegacyUuid),
}

impl Anchor {
    /// Resolves the anchor against a file.
    #[must_use]
    pub fn find(&self, file: &SourceFile) -> Option<usize> {
        match self {
            Self::LastInclude => file.find_last_include(),
            Self::LastParameterKey => file.find_last_parameter_key(),
            Self::Uuid(uuid) => file.find_uuid_line(uuid),
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LastInclude => f.write_str("#include line"),
            Self::LastParameterKey => f.write_str("parameter key declaration"),
            Self::Uuid(uuid) => write!(f, "line containing uuid {uuid}"),
        }
    }
}

/// One edit to a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOp {
    /// Insert a block immediately before the anchor line.
    InsertBefore {
        /// Where to insert.
        anchor: Anchor,
        /// Lines to insert.
        block: String,
    },
    /// Append a block at end of file.
    Append {
        /// Lines to append.
        block: String,
    },
    /// Replace the `{}` placeholder on the anchor line.
    ReplacePlaceholder {
        /// Line to edit.
        anchor: Anchor,
        /// Text that replaces `{}`.
        replacement: String,
    },
}

impl PatchOp {
    fn apply(&self, file: &mut SourceFile, classifier: &LineClassifier) -> Result<(), PatchError> {
        match self {
            Self::InsertBefore { anchor, block } => {
                let index = resolve(anchor, file)?;
                file.insert_block(index, block, classifier);
            }
            Self::Append { block } => file.append_block(block, classifier),
            Self::ReplacePlaceholder {
                anchor,
                replacement,
            } => {
                let index = resolve(anchor, file)?;
                file.replace_placeholder(index, replacement, classifier)?;
            }
        }
        Ok(())
    }
}

fn resolve(anchor: &Anchor, file: &SourceFile) -> Result<usize, PatchError> {
    anchor.find(file).ok_or_else(|| PatchError::AnchorNotFound {
        path: file.path().to_owned(),
        anchor: anchor.clone(),
    })
}

/// The edits to apply to one file, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePatch {
    /// File to patch.
    pub path: Utf8PathBuf,
    /// Operations, applied in order against the progressively patched file.
    pub ops: Vec<PatchOp>,
}

impl FilePatch {
    /// Creates an empty patch for `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            ops: Vec::new(),
        }
    }

    /// Adds an operation.
    #[must_use]
    pub fn with(mut self, op: PatchOp) -> Self {
        self.ops.push(op);
        self
    }

    /// Applies the operations to an already-loaded file.
    ///
    /// # Errors
    ///
    /// Returns the first anchor or placeholder failure.
    pub fn apply_to(
        &self,
        mut file: SourceFile,
        classifier: &LineClassifier,
    ) -> Result<SourceFile, PatchError> {
        for op in &self.ops {
            op.apply(&mut file, classifier)?;
        }
        Ok(file)
    }
}

/// A group of file patches committed together.
///
/// # Examples
///
/// ```no_run
/// use sx_cpp_parser::{Anchor, FilePatch, LineClassifier, PatchOp, PatchSet};
///
/// let classifier = LineClassifier::new("complex")?;
/// let mut set = PatchSet::new();
/// set.push(FilePatch::new("Filters/Foo.hpp").with(PatchOp::InsertBefore {
///     anchor: Anchor::LastParameterKey,
///     block: "  static inline constexpr StringLiteral k_BarKey = \"bar\";".to_owned(),
/// }));
///
/// let planned = set.plan(&classifier)?;
/// planned.commit()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchSet {
    files: Vec<FilePatch>,
}

impl PatchSet {
    /// Creates an empty patch set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file patch; files are written in the order they are added.
    pub fn push(&mut self, patch: FilePatch) {
        self.files.push(patch);
    }

    /// Returns the number of files in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if the set has no file patches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Reads every file and applies every operation in memory.
    ///
    /// # Errors
    ///
    /// Returns the first read, anchor or placeholder failure. Nothing has
    /// been written when this returns an error.
    pub fn plan(&self, classifier: &LineClassifier) -> Result<PlannedPatchSet, PatchError> {
        let mut planned = Vec::with_capacity(self.files.len());
        for patch in &self.files {
            let file = SourceFile::read(&patch.path, classifier)?;
            let patched = patch.apply_to(file, classifier)?;
            debug!(path = %patch.path, ops = patch.ops.len(), "Planned patch");
            planned.push(patched);
        }
        Ok(PlannedPatchSet { files: planned })
    }
}

/// Patched files that passed validation and are ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPatchSet {
    files: Vec<SourceFile>,
}

impl PlannedPatchSet {
    /// Returns the patched files.
    #[must_use]
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Returns the paths that would be written.
    pub fn paths(&self) -> impl Iterator<Item = &Utf8Path> {
        self.files.iter().map(SourceFile::path)
    }

    /// Writes every file back to disk, in order.
    ///
    /// Writes are not rolled back: if a write fails, the files before it
    /// are already on disk and the files after it are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::Write`] for the first file that cannot be written.
    pub fn commit(self) -> Result<Vec<Utf8PathBuf>, PatchError> {
        let mut written = Vec::with_capacity(self.files.len());
        for file in self.files {
            file.write()?;
            debug!(path = %file.path(), "Wrote patched file");
            written.push(file.path().to_owned());
        }
        Ok(written)
    }
}
